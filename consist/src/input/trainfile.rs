use serde::{de, Deserialize, Deserializer, Serialize};
use std::io;

use crate::ConsistError;

/// A list-type train definition, as stored in a `.train-or` file.
///
/// ```json
/// { "DisplayName": "Freight", "PlayerDrivable": true,
///   "List": [ { "Engine": "class66" },
///             { "Wagon": "boxcar", "Count": 3 },
///             { "Train": "helpers", "Flip": true } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainDefinition {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub player_drivable: bool,
    #[serde(rename = "List", default)]
    pub items: Vec<TrainListItem>,
}

/// One entry of a train list. The kind is given by which of the `Engine`,
/// `Wagon` or `Train` keys is present; exactly one of them must be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TrainListItem {
    Engine {
        #[serde(rename = "Engine")]
        name: String,
        #[serde(rename = "Flip", default, skip_serializing_if = "is_false")]
        flip: bool,
    },
    Wagon {
        #[serde(rename = "Wagon")]
        name: String,
        #[serde(rename = "Flip", default, skip_serializing_if = "is_false")]
        flip: bool,
        #[serde(rename = "Count", skip_serializing_if = "is_single")]
        count: u32,
    },
    Reference {
        #[serde(rename = "Train")]
        train: String,
        #[serde(rename = "Flip", default, skip_serializing_if = "is_false")]
        flip: bool,
    },
}

fn is_false(x :&bool) -> bool { !*x }
fn is_single(x :&u32) -> bool { *x == 1 }

/// All keys a list entry may carry, before the kind is decided.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEntry {
    engine: Option<String>,
    wagon: Option<String>,
    train: Option<String>,
    #[serde(default)]
    flip: bool,
    count: Option<u32>,
}

impl<'de> Deserialize<'de> for TrainListItem {
    fn deserialize<D: Deserializer<'de>>(d :D) -> Result<TrainListItem, D::Error> {
        let e = ListEntry::deserialize(d)?;
        match (e.engine, e.wagon, e.train, e.count) {
            (Some(name), None, None, None) => Ok(TrainListItem::Engine { name, flip: e.flip }),
            (None, Some(name), None, count) =>
                Ok(TrainListItem::Wagon { name, flip: e.flip, count: count.unwrap_or(1) }),
            (None, None, Some(train), None) => Ok(TrainListItem::Reference { train, flip: e.flip }),
            (None, None, None, _) =>
                Err(de::Error::custom("list entry has none of Engine, Wagon or Train")),
            (engine, wagon, train, _) if [engine.is_some(), wagon.is_some(), train.is_some()]
                .iter().filter(|x| **x).count() > 1 =>
                Err(de::Error::custom("list entry has more than one of Engine, Wagon or Train")),
            _ => Err(de::Error::custom("Count is only allowed on a Wagon entry")),
        }
    }
}

impl TrainDefinition {
    pub fn new<S: Into<String>>(display_name :S, items :Vec<TrainListItem>) -> TrainDefinition {
        TrainDefinition {
            display_name: display_name.into(),
            player_drivable: true,
            items: items,
        }
    }

    pub fn unpowered<S: Into<String>>(display_name :S, items :Vec<TrainListItem>) -> TrainDefinition {
        TrainDefinition { player_drivable: false, ..TrainDefinition::new(display_name, items) }
    }

    /// Names of the train definitions this one refers to directly.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match *item {
            TrainListItem::Reference { ref train, .. } => Some(train.as_str()),
            _ => None,
        })
    }
}

impl TrainListItem {
    pub fn engine<S: Into<String>>(name :S) -> TrainListItem {
        TrainListItem::Engine { name: name.into(), flip: false }
    }

    pub fn wagon<S: Into<String>>(name :S) -> TrainListItem {
        TrainListItem::wagons(name, 1)
    }

    pub fn wagons<S: Into<String>>(name :S, count :u32) -> TrainListItem {
        TrainListItem::Wagon { name: name.into(), flip: false, count: count }
    }

    pub fn reference<S: Into<String>>(train :S) -> TrainListItem {
        TrainListItem::Reference { train: train.into(), flip: false }
    }

    /// The same item, turned around.
    pub fn flipped(self) -> TrainListItem {
        match self {
            TrainListItem::Engine { name, flip } => TrainListItem::Engine { name, flip: !flip },
            TrainListItem::Wagon { name, flip, count } => TrainListItem::Wagon { name, flip: !flip, count },
            TrainListItem::Reference { train, flip } => TrainListItem::Reference { train, flip: !flip },
        }
    }
}

fn validate(name :&str, train :&TrainDefinition) -> Result<(), ConsistError> {
    let invalid = |msg :String| ConsistError::DecodeError(name.to_string(), msg);
    for (i, item) in train.items.iter().enumerate() {
        match *item {
            TrainListItem::Engine { name: ref n, .. } if n.trim().is_empty() =>
                return Err(invalid(format!("list item {} has an empty engine name", i))),
            TrainListItem::Wagon { name: ref n, .. } if n.trim().is_empty() =>
                return Err(invalid(format!("list item {} has an empty wagon name", i))),
            TrainListItem::Wagon { count: 0, .. } =>
                return Err(invalid(format!("list item {} has a wagon count of zero", i))),
            TrainListItem::Reference { ref train, .. } if train.trim().is_empty() =>
                return Err(invalid(format!("list item {} has an empty train reference", i))),
            _ => {},
        }
    }
    Ok(())
}

/// Decodes a `.train-or` record. `name` is only used for error reporting.
pub fn parse_train(name :&str, input :&str) -> Result<TrainDefinition, ConsistError> {
    let train :TrainDefinition = serde_json::from_str(input)
        .map_err(|e| ConsistError::DecodeError(name.to_string(), e.to_string()))?;
    validate(name, &train)?;
    trace!("decoded train {:?} ({} items)", name, train.items.len());
    Ok(train)
}

pub fn write_train<W: io::Write>(train :&TrainDefinition, f :&mut W) -> Result<(), failure::Error> {
    serde_json::to_writer_pretty(&mut *f, train)?;
    writeln!(f)?;
    Ok(())
}
