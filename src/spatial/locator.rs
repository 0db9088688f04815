//! Slot detection for a dropped card.
//!
//! The locator picks the slot whose centre is nearest the card's centre
//! (first one wins on an exact tie), then tests only that slot for overlap.
//! If the nearest slot does not overlap, the result is `None` even when a
//! farther slot does overlap.

use tracing::trace;

use super::area::{AreaBounds, BoxArea2D};
use super::transform::TransformComponent;
use crate::cards::CardSlotComponent;
use crate::core::{EntityId, PatienceResult, Registry};

/// Nearest-slot query.
pub struct SlotLocator;

impl SlotLocator {
    /// Find the slot a card area lands on.
    pub fn find<I>(card: &AreaBounds, slots: I) -> Option<EntityId>
    where
        I: IntoIterator<Item = (EntityId, AreaBounds)>,
    {
        let mut nearest: Option<(EntityId, AreaBounds, f32)> = None;

        for (slot, bounds) in slots {
            let distance = card.separation(&bounds).length();
            let closer = nearest.map_or(true, |(_, _, best)| distance < best);
            if closer {
                nearest = Some((slot, bounds, distance));
            }
        }

        let (slot, bounds, _) = nearest?;
        if card.overlaps(&bounds) {
            Some(slot)
        } else {
            trace!(%slot, "nearest slot does not overlap the card");
            None
        }
    }

    /// Find the slot under `card`, reading every slot's area from the
    /// registry.
    pub fn locate(registry: &Registry, card: EntityId) -> PatienceResult<Option<EntityId>> {
        let card_bounds = Self::bounds_of(registry, card)?;

        let mut slots = Vec::new();
        for slot in registry.entities_with::<CardSlotComponent>() {
            slots.push((slot, Self::bounds_of(registry, slot)?));
        }

        Ok(Self::find(&card_bounds, slots))
    }

    /// World bounds of an entity with a transform and an area.
    pub fn bounds_of(registry: &Registry, entity: EntityId) -> PatienceResult<AreaBounds> {
        let transform = registry.get::<TransformComponent>(entity)?;
        let area = registry.get::<BoxArea2D>(entity)?;
        Ok(area.bounds(transform))
    }
}
