use super::*;
use crate::input::content::AssetKind;

impl<'a, L: TrainLoader + ?Sized> Resolver<'a, L> {
    /// Expands `train` into the full, indexed list of rolling stock as read
    /// in `direction`. Fails as a whole if any nested definition cannot be
    /// resolved.
    pub fn compose(&self, train :&TrainDefinition, direction :Direction) -> Result<Vec<WagonReference>, ConsistError> {
        let mut wagons = Vec::new();
        let mut expansion = Expansion::new();
        self.compose_into(train, direction, &mut expansion, &mut wagons)?;
        debug!("composed {:?} ({:?}): {} units", train.display_name, direction, wagons.len());
        Ok(wagons)
    }

    fn compose_into(&self, train :&TrainDefinition, direction :Direction,
                    expansion :&mut Expansion, wagons :&mut Vec<WagonReference>) -> Result<(), ConsistError> {
        for item in direction.traverse(&train.items) {
            match *item {
                TrainListItem::Engine { ref name, flip } => {
                    let path = self.content.resolve_asset_path(AssetKind::Engine, name)?;
                    let index = wagons.len();
                    wagons.push(WagonReference { path, flip: direction.orient(flip), index });
                },
                TrainListItem::Wagon { ref name, flip, count } => {
                    let path = self.content.resolve_asset_path(AssetKind::Wagon, name)?;
                    for _ in 0..count {
                        let index = wagons.len();
                        wagons.push(WagonReference { path: path.clone(), flip: direction.orient(flip), index });
                    }
                },
                TrainListItem::Reference { ref train, flip } => {
                    let child = expansion.enter(self.loader, train)?;
                    trace!("{}splicing {:?} at {}", "  ".repeat(expansion.depth()), train, wagons.len());
                    let result = self.compose_into(&child, direction.through(flip), expansion, wagons);
                    expansion.leave();
                    result?;
                },
            }
        }
        Ok(())
    }
}
