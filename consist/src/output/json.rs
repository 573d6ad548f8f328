use failure::Error;
use serde_json::{json, Value};
use std::io;

use crate::formation::{WagonReference, LeadLocomotiveChoices, Direction};

fn choices_value(choices :&LeadLocomotiveChoices) -> Value {
    match *choices {
        LeadLocomotiveChoices::Empty => json!({ "kind": "empty" }),
        LeadLocomotiveChoices::NoLocomotiveSet => json!({ "kind": "no_locomotive" }),
        LeadLocomotiveChoices::Candidates(_) => json!({
            "kind": "candidates",
            "locomotives": choices.candidates().iter()
                .map(|c| c.path.to_string_lossy().into_owned())
                .collect::<Vec<_>>(),
        }),
    }
}

fn wagons_value(wagons :&[WagonReference]) -> Value {
    Value::Array(wagons.iter().map(|w| json!({
        "path": w.path.to_string_lossy(),
        "flip": w.flip,
        "index": w.index,
    })).collect())
}

/// Writes the lead choices and wagon list of one resolved direction.
pub fn json_consist<W: io::Write>(name :&str,
                                  direction :Direction,
                                  choices :&LeadLocomotiveChoices,
                                  wagons :&[WagonReference],
                                  f :&mut W) -> Result<(), Error> {
    let doc = json!({
        "train": name,
        "direction": if direction.is_reverse() { "reverse" } else { "forward" },
        "lead": choices_value(choices),
        "wagons": wagons_value(wagons),
    });
    serde_json::to_writer_pretty(&mut *f, &doc)?;
    writeln!(f)?;
    Ok(())
}
