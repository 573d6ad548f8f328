use super::*;
use crate::input::content::AssetKind;

impl<'a, L: TrainLoader + ?Sized> Resolver<'a, L> {
    /// Locomotives that can lead `train` when read in `direction`.
    ///
    /// Scans only until the front is decided: the first engine met wins,
    /// wagons in front of it do not block it, and a nested train decides
    /// the front if it has an engine of its own.
    pub fn lead_choices(&self, train :&TrainDefinition, direction :Direction) -> Result<LeadLocomotiveChoices, ConsistError> {
        let mut expansion = Expansion::new();
        let choices = self.lead_choices_in(train, direction, &mut expansion)?;
        debug!("lead choices for {:?} ({:?}): {:?}", train.display_name, direction, choices);
        Ok(choices)
    }

    fn lead_choices_in(&self, train :&TrainDefinition, direction :Direction,
                       expansion :&mut Expansion) -> Result<LeadLocomotiveChoices, ConsistError> {
        let mut found_wagon = false;
        for item in direction.traverse(&train.items) {
            match *item {
                TrainListItem::Engine { ref name, .. } => {
                    let path = self.content.resolve_asset_path(AssetKind::Engine, name)?;
                    return Ok(LeadLocomotiveChoices::single(PreferredLocomotive { path }));
                },
                TrainListItem::Wagon { .. } => {
                    found_wagon = true;
                },
                TrainListItem::Reference { ref train, flip } => {
                    let child = expansion.enter(self.loader, train)?;
                    let result = self.lead_choices_in(&child, direction.through(flip), expansion);
                    expansion.leave();
                    match result? {
                        LeadLocomotiveChoices::Empty => {},
                        LeadLocomotiveChoices::NoLocomotiveSet => found_wagon = true,
                        choices => return Ok(choices),
                    }
                },
            }
        }

        Ok(if found_wagon {
            LeadLocomotiveChoices::NoLocomotiveSet
        } else {
            LeadLocomotiveChoices::Empty
        })
    }
}
