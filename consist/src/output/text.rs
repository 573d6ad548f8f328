use std::fmt::Write;

use crate::formation::{WagonReference, LeadLocomotiveChoices};

pub fn wagon_list(wagons :&[WagonReference]) -> String {
    let mut s = String::new();
    for w in wagons {
        let _ = writeln!(s, "{:>4} {} {}", w.index, if w.flip { "<" } else { ">" }, w.path.display());
    }
    s
}

pub fn lead_choices(choices :&LeadLocomotiveChoices) -> String {
    match *choices {
        LeadLocomotiveChoices::Empty => "no rolling stock\n".to_string(),
        LeadLocomotiveChoices::NoLocomotiveSet => "no locomotive (unpowered consist)\n".to_string(),
        LeadLocomotiveChoices::Candidates(_) => {
            let mut s = String::new();
            for c in choices.candidates() {
                let _ = writeln!(s, "  * {}", c.path.display());
            }
            s
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::PreferredLocomotive;

    #[test]
    fn render() {
        let wagons = vec![
            WagonReference::new("/t/a.eng", false, 0),
            WagonReference::new("/t/b.wag", true, 1),
        ];
        assert_eq!(wagon_list(&wagons), "   0 > /t/a.eng\n   1 < /t/b.wag\n");
        assert_eq!(lead_choices(&LeadLocomotiveChoices::single(PreferredLocomotive::new("/t/a.eng"))),
                   "  * /t/a.eng\n");
        assert!(lead_choices(&LeadLocomotiveChoices::NoLocomotiveSet).contains("unpowered"));
    }
}
