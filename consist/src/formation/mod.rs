//! Resolving a train definition into its rolling stock.
//!
//! Two walks share the same orientation rule: reading a list back to front
//! turns every unit around, and a flipped reference turns its whole
//! sub-train around once more. `compose` expands everything into an indexed
//! wagon list, `lead_choices` only scans far enough to find what stands at
//! the front.

pub mod compose;
pub mod lead;

use smallvec::SmallVec;
use std::collections::HashSet;
use std::iter::FromIterator;
use std::path::PathBuf;

use crate::ConsistError;
use crate::input::content::{Content, TrainLoader};
use crate::input::trainfile::{TrainDefinition, TrainListItem};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WagonReference {
    pub path: PathBuf,
    pub flip: bool,
    pub index: usize,
}

impl WagonReference {
    pub fn new<P: Into<PathBuf>>(path :P, flip :bool, index :usize) -> WagonReference {
        WagonReference { path: path.into(), flip, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreferredLocomotive {
    pub path: PathBuf,
}

impl PreferredLocomotive {
    pub fn new<P: Into<PathBuf>>(path :P) -> PreferredLocomotive {
        PreferredLocomotive { path: path.into() }
    }
}

/// Which locomotives can stand at the front of a train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadLocomotiveChoices {
    /// Nothing in the definition resolves to rolling stock.
    Empty,
    /// Only unpowered stock: a valid consist without a locomotive.
    NoLocomotiveSet,
    /// Never empty; build it with `single` or `collect`.
    Candidates(HashSet<PreferredLocomotive>),
}

impl LeadLocomotiveChoices {
    pub fn single(locomotive :PreferredLocomotive) -> LeadLocomotiveChoices {
        let mut set = HashSet::new();
        set.insert(locomotive);
        LeadLocomotiveChoices::Candidates(set)
    }

    pub fn contains(&self, locomotive :&PreferredLocomotive) -> bool {
        match *self {
            LeadLocomotiveChoices::Candidates(ref set) => set.contains(locomotive),
            _ => false,
        }
    }

    /// True when nothing in the train resolves to rolling stock. An
    /// unpowered train is not nothing.
    pub fn is_nothing(&self) -> bool {
        match *self {
            LeadLocomotiveChoices::Empty => true,
            LeadLocomotiveChoices::NoLocomotiveSet => false,
            LeadLocomotiveChoices::Candidates(ref set) => set.is_empty(),
        }
    }

    /// Candidates in path order.
    pub fn candidates(&self) -> Vec<&PreferredLocomotive> {
        let mut v :Vec<_> = match *self {
            LeadLocomotiveChoices::Candidates(ref set) => set.iter().collect(),
            _ => Vec::new(),
        };
        v.sort();
        v
    }
}

impl FromIterator<PreferredLocomotive> for LeadLocomotiveChoices {
    /// Collects into `Candidates`, or `Empty` if there is nothing to collect.
    fn from_iter<I: IntoIterator<Item = PreferredLocomotive>>(iter :I) -> LeadLocomotiveChoices {
        let set :HashSet<_> = iter.into_iter().collect();
        if set.is_empty() {
            LeadLocomotiveChoices::Empty
        } else {
            LeadLocomotiveChoices::Candidates(set)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn is_reverse(self) -> bool {
        self == Direction::Reverse
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Direction a sub-train is read in when it is spliced in with the
    /// given flip.
    pub fn through(self, flip :bool) -> Direction {
        if flip { self.opposite() } else { self }
    }

    /// Effective orientation of a unit carrying its own `flip`.
    pub fn orient(self, flip :bool) -> bool {
        flip != self.is_reverse()
    }

    /// Items in the order they are met when reading in this direction.
    pub fn traverse<'t>(self, items :&'t [TrainListItem]) -> impl Iterator<Item = &'t TrainListItem> + 't {
        let n = items.len();
        (0..n).map(move |i| match self {
            Direction::Forward => &items[i],
            Direction::Reverse => &items[n - 1 - i],
        })
    }
}

/// Names of the definitions currently being expanded, outermost first.
#[derive(Debug, Default)]
pub(crate) struct Expansion {
    stack: SmallVec<[String; 4]>,
}

impl Expansion {
    pub(crate) fn new() -> Expansion {
        Expansion { stack: SmallVec::new() }
    }

    /// Loads a nested definition and marks it as being expanded. Must be
    /// paired with `leave`.
    pub(crate) fn enter<L: TrainLoader + ?Sized>(&mut self, loader :&L, name :&str)
        -> Result<TrainDefinition, ConsistError> {
        if self.stack.iter().any(|n| n == name) {
            let mut chain :Vec<&str> = self.stack.iter().map(|n| n.as_str()).collect();
            chain.push(name);
            warn!("train {:?} refers to itself", name);
            return Err(ConsistError::CyclicReference(chain.join(" -> ")));
        }
        let train = loader.load_train(name)?;
        self.stack.push(name.to_string());
        Ok(train)
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Resolves train definitions against one content tree, loading nested
/// definitions through `loader`.
pub struct Resolver<'a, L: TrainLoader + ?Sized> {
    content: &'a Content,
    loader: &'a L,
}

impl<'a, L: TrainLoader + ?Sized> Resolver<'a, L> {
    pub fn new(content :&'a Content, loader :&'a L) -> Resolver<'a, L> {
        Resolver { content, loader }
    }

    /// The wagon list for `direction`, or an empty list if `preference` is
    /// given and cannot lead the train in that direction.
    pub fn wagon_list(&self, train :&TrainDefinition, direction :Direction,
                      preference :Option<&PreferredLocomotive>) -> Result<Vec<WagonReference>, ConsistError> {
        if let Some(preference) = preference {
            let choices = self.lead_choices(train, direction)?;
            if !choices.contains(preference) {
                debug!("{:?} cannot lead {:?} ({:?}), choices are {:?}",
                       preference.path, train.display_name, direction, choices);
                return Ok(Vec::new());
            }
        }
        self.compose(train, direction)
    }

    pub fn forward_wagon_list(&self, train :&TrainDefinition, preference :Option<&PreferredLocomotive>)
        -> Result<Vec<WagonReference>, ConsistError> {
        self.wagon_list(train, Direction::Forward, preference)
    }

    pub fn reverse_wagon_list(&self, train :&TrainDefinition, preference :Option<&PreferredLocomotive>)
        -> Result<Vec<WagonReference>, ConsistError> {
        self.wagon_list(train, Direction::Reverse, preference)
    }

    pub fn lead_locomotive_choices(&self, train :&TrainDefinition) -> Result<LeadLocomotiveChoices, ConsistError> {
        self.lead_choices(train, Direction::Forward)
    }

    pub fn reverse_locomotive_choices(&self, train :&TrainDefinition) -> Result<LeadLocomotiveChoices, ConsistError> {
        self.lead_choices(train, Direction::Reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use std::collections::HashMap;
    use std::path::Path;

    fn loco(name :&str) -> PreferredLocomotive {
        PreferredLocomotive::new(Path::new("/content/TRAINS/TRAINSET").join(format!("{}.eng", name)))
    }

    fn simple() -> TrainDefinition {
        TrainDefinition::new("Test train", vec![
            TrainListItem::engine("SomeLocomotive"),
            TrainListItem::wagon("SomeWagon"),
        ])
    }

    #[test]
    fn direction_algebra() {
        use self::Direction::*;
        assert_eq!(Forward.through(false), Forward);
        assert_eq!(Forward.through(true), Reverse);
        assert_eq!(Reverse.through(true), Forward);
        assert_eq!(Reverse.through(true).through(true), Reverse);
        assert!(!Forward.orient(false));
        assert!(Forward.orient(true));
        assert!(Reverse.orient(false));
        assert!(!Reverse.orient(true));
    }

    #[test]
    fn traverse_order() {
        let items = vec![TrainListItem::engine("a"), TrainListItem::wagon("b"), TrainListItem::wagon("c")];
        let fwd :Vec<_> = Direction::Forward.traverse(&items).cloned().collect();
        let mut rev :Vec<_> = Direction::Reverse.traverse(&items).cloned().collect();
        assert_eq!(fwd, items);
        rev.reverse();
        assert_eq!(rev, items);
        assert_eq!(Direction::Reverse.traverse(&[]).count(), 0);
    }

    #[test]
    fn choices_are_distinct() {
        let a = loco("a");
        assert_ne!(LeadLocomotiveChoices::Empty, LeadLocomotiveChoices::NoLocomotiveSet);
        assert!(LeadLocomotiveChoices::Empty.is_nothing());
        assert!(!LeadLocomotiveChoices::NoLocomotiveSet.is_nothing());
        assert!(!LeadLocomotiveChoices::single(a.clone()).is_nothing());
        assert!(!LeadLocomotiveChoices::NoLocomotiveSet.contains(&a));
        assert!(LeadLocomotiveChoices::single(a.clone()).contains(&a));
        assert!(!LeadLocomotiveChoices::single(a.clone()).contains(&loco("b")));
        assert_eq!(LeadLocomotiveChoices::single(a.clone()).candidates().len(), 1);
        assert_eq!(LeadLocomotiveChoices::single(a.clone()).candidates(), vec![&a]);
    }

    #[test]
    fn collected_choices() {
        let none :LeadLocomotiveChoices = Vec::<PreferredLocomotive>::new().into_iter().collect();
        assert_eq!(none, LeadLocomotiveChoices::Empty);

        let both :LeadLocomotiveChoices = vec![loco("a"), loco("b"), loco("a")].into_iter().collect();
        assert_eq!(both.candidates(), vec![&loco("a"), &loco("b")]);
        assert!(both.contains(&loco("b")));

        // a hand-built empty set is still nothing, and admits no preference
        let hollow = LeadLocomotiveChoices::Candidates(HashSet::new());
        assert!(hollow.is_nothing());
        assert!(!hollow.contains(&loco("a")));
    }

    #[test]
    fn unsatisfiable_preference() {
        let content = Content::new("/content");
        let trains :HashMap<String, TrainDefinition> = HashMap::new();
        let r = Resolver::new(&content, &trains);
        let acela = PreferredLocomotive::new("/content/TRAINS/TRAINSET/acela/acela.eng");
        assert!(r.forward_wagon_list(&simple(), Some(&acela)).unwrap().is_empty());
        assert!(r.reverse_wagon_list(&simple(), Some(&acela)).unwrap().is_empty());
    }

    #[test]
    fn satisfiable_preference() {
        let content = Content::new("/content");
        let trains :HashMap<String, TrainDefinition> = HashMap::new();
        let r = Resolver::new(&content, &trains);
        let train = simple();
        let preferred = r.forward_wagon_list(&train, Some(&loco("SomeLocomotive"))).unwrap();
        assert_eq!(preferred, r.forward_wagon_list(&train, None).unwrap());
        assert_eq!(preferred.len(), 2);

        // a leading wagon does not keep the locomotive from leading in reverse
        assert_eq!(r.reverse_wagon_list(&train, Some(&loco("SomeLocomotive"))).unwrap(),
                   r.reverse_wagon_list(&train, None).unwrap());
        assert!(r.reverse_wagon_list(&train, Some(&loco("SomeWagon"))).unwrap().is_empty());
    }

    #[test]
    fn preference_on_unpowered_train() {
        let content = Content::new("/content");
        let trains = hashmap!{
            "rake".to_string() => TrainDefinition::unpowered("Rake", vec![TrainListItem::wagons("w", 2)]),
        };
        let r = Resolver::new(&content, &trains);
        let parent = TrainDefinition::unpowered("Parent", vec![TrainListItem::reference("rake")]);
        assert_eq!(r.compose(&parent, Direction::Forward).unwrap().len(), 2);
        assert!(r.forward_wagon_list(&parent, Some(&loco("w"))).unwrap().is_empty());
        let empty = TrainDefinition::new("Empty", vec![]);
        assert!(r.forward_wagon_list(&empty, Some(&loco("w"))).unwrap().is_empty());
    }

    #[test]
    fn preference_law() {
        let content = Content::new("/content");
        let trains = hashmap!{
            "pair".to_string() => TrainDefinition::new("Pair", vec![
                TrainListItem::engine("b"), TrainListItem::wagons("w", 2), TrainListItem::engine("c")]),
            "rake".to_string() => TrainDefinition::unpowered("Rake", vec![TrainListItem::wagon("w")]),
        };
        let r = Resolver::new(&content, &trains);
        let defs = vec![
            simple(),
            TrainDefinition::new("Nested", vec![
                TrainListItem::reference("rake"), TrainListItem::reference("pair").flipped(), TrainListItem::engine("a")]),
            TrainDefinition::new("Back", vec![TrainListItem::engine("a"), TrainListItem::reference("pair")]),
            TrainDefinition::unpowered("Rake", vec![TrainListItem::reference("rake")]),
        ];
        let prefs = vec![loco("a"), loco("b"), loco("c"), loco("SomeLocomotive"), loco("w")];
        for d in &defs {
            for &dir in &[Direction::Forward, Direction::Reverse] {
                let choices = r.lead_choices(d, dir).unwrap();
                for p in &prefs {
                    let list = r.wagon_list(d, dir, Some(p)).unwrap();
                    assert_eq!(!list.is_empty(), choices.contains(p), "{:?} {:?} {:?}", d.display_name, dir, p);
                }
            }
        }
    }

    #[test]
    fn missing_reference_fails_with_preference() {
        let content = Content::new("/content");
        let trains :HashMap<String, TrainDefinition> = HashMap::new();
        let r = Resolver::new(&content, &trains);
        let train = TrainDefinition::new("Broken", vec![TrainListItem::reference("nowhere")]);
        match r.forward_wagon_list(&train, Some(&loco("a"))) {
            Err(ConsistError::DefinitionNotFound(ref n)) if n == "nowhere" => {},
            x => panic!("expected missing definition, got {:?}", x),
        }
    }
}
