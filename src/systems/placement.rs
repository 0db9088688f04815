//! Pointer-driven card placement, monster battles and monster release.
//!
//! `PlacementEngine` is the state machine that turns pointer events into
//! board changes:
//!
//! ```text
//! Idle ──move──▶ Hovered ──press──▶ Held ──release──▶ Placed | Reverted
//! ```
//!
//! ## Release pipeline
//!
//! On release every held card is processed in fan-out order:
//! 1. `SlotLocator` finds the slot under the card (none → revert)
//! 2. the monster guarding that slot must not outlast the attack
//! 3. the slot's rules must accept the card (`place_card`)
//! 4. the card moves and the destination site resolves monster damage
//!
//! Afterwards the origin column releases any monsters it now exposes.
//!
//! Every phase runs to completion inside the event call. Animations are
//! requested from the `Animator` and never waited on.

use tracing::{debug, info, trace};

use crate::animation::{Animator, NoopAnimator, TransferRequest, CARD_BACK_SPRITE, MONSTER_BACK_SPRITE};
use crate::cards::{CardComponent, CardSequence, CardSlotComponent, SlotType, Suit};
use crate::core::{EntityId, PatienceComponent, PatienceError, PatienceResult, Registry, Vec2};
use crate::spatial::{BoxArea2D, Layer, SlotLocator, TransformComponent};

/// `z` sections available to cards resting in one slot.
pub const STACK_SECTIONS: usize = 128;

/// `z` sections available to a held sequence.
pub const HELD_SECTIONS: usize = 16;

/// Discard piles the engine sends cards to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Receives the cards that beat a monster.
    pub main_discard: Option<EntityId>,
    /// Receives defeated monsters.
    pub monster_discard: Option<EntityId>,
}

/// Why a card is being placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementIntent {
    /// Dropped by the player. `in_sequence` when lifted with other cards.
    Player { in_sequence: bool },
    /// Sent to a discard pile after a monster fell.
    Discard,
    /// Monster leaving a column for a monster bay.
    Release,
}

/// Why a placement was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevertReason {
    /// The card is not over any slot.
    NoTarget,
    /// Dropped back onto the slot it came from.
    SameSlot,
    /// The guarding monster has more health than the attack.
    MonsterTooStrong { health: u32, attack: u32 },
    /// Several cards dropped on a slot that takes one at a time.
    SequenceRefused,
    /// The slot is full or takes no cards at all.
    SlotFull,
    /// Wastepiles only take discards.
    DiscardOnly,
    /// Monster bays only take released monsters.
    ReleaseOnly,
    /// Rank or suit does not fit the slot's ordering rules.
    RuleViolation,
}

/// Result of a single placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed { slot: EntityId, monster_defeated: bool },
    Reverted(RevertReason),
}

impl PlacementOutcome {
    #[must_use]
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }
}

/// Card placement system.
#[derive(Debug)]
pub struct PlacementEngine<A: Animator = NoopAnimator> {
    config: PlacementConfig,
    animator: A,
    pointer: Vec2,
}

impl PlacementEngine<NoopAnimator> {
    /// Engine without animations.
    #[must_use]
    pub fn headless(config: PlacementConfig) -> Self {
        Self::new(config, NoopAnimator)
    }
}

impl<A: Animator> PlacementEngine<A> {
    #[must_use]
    pub fn new(config: PlacementConfig, animator: A) -> Self {
        Self {
            config,
            animator,
            pointer: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    #[must_use]
    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Last pointer position seen by `on_pointer_moved`.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Release monsters the deal left on top of columns.
    pub fn init(&mut self, registry: &mut Registry) -> PatienceResult<()> {
        for slot in registry.entities_with::<CardSlotComponent>() {
            if registry.get::<CardSlotComponent>(slot)?.slot_type() == SlotType::Column {
                self.release_monsters(registry, slot)?;
            }
        }
        Ok(())
    }

    // === Pointer events ===

    /// Move held cards with the pointer, or recompute hover.
    ///
    /// Hover is rebuilt from scratch: every card is cleared, then the
    /// topmost card under the pointer is marked. Cards in flight on
    /// `Layer::Transfer` are skipped. Nothing is hovered while cards are
    /// held.
    pub fn on_pointer_moved(&mut self, registry: &mut Registry, pointer: Vec2) -> PatienceResult<()> {
        self.pointer = pointer;

        let mut hovered: Option<(EntityId, f32)> = None;
        let mut any_held = false;

        for card in registry.entities_with::<CardComponent>() {
            let (held, offset, slot) = {
                let component = registry.get_mut::<CardComponent>(card)?;
                component.set_hovered(false);
                (component.is_held(), component.held_offset(), component.current_slot())
            };

            if held {
                let step = registry.get::<CardSlotComponent>(slot)?.stagger_offset().length();
                let section = if step > 0.0 {
                    (offset.length() / step).round() as usize
                } else {
                    0
                };
                let transform = registry.get_mut::<TransformComponent>(card)?;
                transform.set_xy(pointer + offset);
                transform.set_layer_section(Layer::Held, section, HELD_SECTIONS);
                any_held = true;
            } else if let Some(area) = registry.try_get::<BoxArea2D>(card) {
                let transform = registry.get::<TransformComponent>(card)?;
                let z = transform.position.z;
                if !Layer::Transfer.holds(z) && area.bounds(transform).contains(pointer) {
                    if hovered.map_or(true, |(_, best)| best < z) {
                        hovered = Some((card, z));
                    }
                }
            }
        }

        if let (Some((card, _)), false) = (hovered, any_held) {
            registry.get_mut::<CardComponent>(card)?.set_hovered(true);
            trace!(%card, "hovered");
        }
        Ok(())
    }

    /// Pick up the hovered card and everything packed on top of it.
    ///
    /// Returns whether anything was picked up.
    pub fn on_pointer_pressed(&mut self, registry: &mut Registry) -> PatienceResult<bool> {
        for card in registry.entities_with::<CardComponent>() {
            let component = registry.get::<CardComponent>(card)?;
            if !component.available || !component.is_hovered() {
                continue;
            }

            let sequence = self.liftable_sequence(registry, card)?;
            if sequence.is_empty() {
                continue;
            }

            let slot = registry.get::<CardComponent>(card)?.current_slot();
            let step = registry.get::<CardSlotComponent>(slot)?.stagger_offset();
            for (index, &lifted) in sequence.iter().enumerate() {
                let position = registry.get::<TransformComponent>(lifted)?.position;
                registry
                    .get_mut::<CardComponent>(lifted)?
                    .hold(step * index as f32, position);
            }

            debug!(%card, %slot, count = sequence.len(), "picked up");
            return Ok(true);
        }
        Ok(false)
    }

    /// Drop every held card, then release monsters from the origin column.
    pub fn on_pointer_released(&mut self, registry: &mut Registry) -> PatienceResult<()> {
        let mut held: Vec<(EntityId, f32, usize)> = Vec::new();
        let mut damage = 0u32;

        for card in registry.entities_with::<CardComponent>() {
            let component = registry.get::<CardComponent>(card)?;
            if !component.is_held() {
                continue;
            }
            let depth = registry
                .get::<CardSlotComponent>(component.current_slot())?
                .index_of(card)
                .unwrap_or(usize::MAX);
            held.push((card, component.held_offset().length_squared(), depth));
            damage += u32::from(component.rank);
        }

        if held.is_empty() {
            return Ok(());
        }
        held.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        let origin = registry.get::<CardComponent>(held[0].0)?.current_slot();
        let dropped: Vec<EntityId> = held.iter().map(|&(card, _, _)| card).collect();
        let in_sequence = dropped.len() > 1;

        for &card in &dropped {
            registry.get_mut::<CardComponent>(card)?.release();
            let outcome = self.drop_card(registry, card, in_sequence, damage, &dropped)?;
            match outcome {
                PlacementOutcome::Placed { slot, monster_defeated } => {
                    debug!(%card, %slot, monster_defeated, "placed");
                }
                PlacementOutcome::Reverted(reason) => {
                    debug!(%card, ?reason, "placement reverted");
                }
            }
        }

        self.layout_slot(registry, origin)?;

        if registry.get::<CardSlotComponent>(origin)?.slot_type() == SlotType::Column {
            self.release_monsters(registry, origin)?;
        }
        Ok(())
    }

    // === Queries ===

    /// Whether a card may be picked up right now.
    pub fn can_be_held(&self, registry: &Registry, card: EntityId) -> PatienceResult<bool> {
        Ok(!self.liftable_sequence(registry, card)?.is_empty())
    }

    /// Cards currently held, in registry order.
    pub fn held_cards(&self, registry: &Registry) -> PatienceResult<Vec<EntityId>> {
        let mut held = Vec::new();
        for card in registry.entities_with::<CardComponent>() {
            if registry.get::<CardComponent>(card)?.is_held() {
                held.push(card);
            }
        }
        Ok(held)
    }

    /// The hovered card, if any.
    pub fn hovered_card(&self, registry: &Registry) -> PatienceResult<Option<EntityId>> {
        for card in registry.entities_with::<CardComponent>() {
            if registry.get::<CardComponent>(card)?.is_hovered() {
                return Ok(Some(card));
            }
        }
        Ok(None)
    }

    /// The cards that would be lifted with `card`, or empty if it cannot be
    /// held: its slot must allow pickup, it must start a packed sequence,
    /// and every card in that sequence must be face-up.
    fn liftable_sequence(&self, registry: &Registry, card: EntityId) -> PatienceResult<CardSequence> {
        let slot_id = registry.get::<CardComponent>(card)?.current_slot();
        let slot = registry.get::<CardSlotComponent>(slot_id)?;
        if !slot.allows_pickup() {
            return Ok(CardSequence::new());
        }

        let sequence = slot.card_sequence(card, |id| rank_suit(registry, id));
        for &lifted in &sequence {
            if !registry.get::<CardComponent>(lifted)?.available {
                return Ok(CardSequence::new());
            }
        }
        Ok(sequence)
    }

    // === Placement ===

    /// Resolve one dropped card: find its slot, check the guarding monster,
    /// then try to place it.
    fn drop_card(
        &mut self,
        registry: &mut Registry,
        card: EntityId,
        in_sequence: bool,
        damage: u32,
        dropped: &[EntityId],
    ) -> PatienceResult<PlacementOutcome> {
        let Some(slot) = SlotLocator::locate(registry, card)? else {
            self.revert(registry, card)?;
            return Ok(PlacementOutcome::Reverted(RevertReason::NoTarget));
        };

        if let Some((health, attack)) = self.guarding_monster(registry, slot, damage, dropped)? {
            if health > attack {
                self.revert(registry, card)?;
                return Ok(PlacementOutcome::Reverted(RevertReason::MonsterTooStrong { health, attack }));
            }
        }

        self.place_card(registry, card, slot, PlacementIntent::Player { in_sequence })
    }

    /// Health of the monster guarding `slot` and the attack it would face.
    ///
    /// A site is guarded by the monster in its paired bay, and the attack is
    /// the dropped cards plus the cards already at the site. Any other slot
    /// is guarded by a monster on its own top, attacked by the dropped
    /// cards alone.
    fn guarding_monster(
        &self,
        registry: &Registry,
        slot: EntityId,
        damage: u32,
        dropped: &[EntityId],
    ) -> PatienceResult<Option<(u32, u32)>> {
        let target = registry.get::<CardSlotComponent>(slot)?;

        let (holder, attack) = match (target.slot_type(), target.monster_slot()) {
            (SlotType::Site, Some(bay)) => {
                let standing: Vec<EntityId> = target
                    .cards()
                    .iter()
                    .copied()
                    .filter(|c| !dropped.contains(c))
                    .collect();
                (bay, damage + rank_sum(registry, &standing)?)
            }
            _ => (slot, damage),
        };

        let Some(top) = registry.get::<CardSlotComponent>(holder)?.top_card() else {
            return Ok(None);
        };
        Ok(registry
            .get::<CardComponent>(top)?
            .monster_health()
            .map(|health| (health, attack)))
    }

    /// Try to move `card` into `slot`.
    ///
    /// On success the card leaves its old slot, joins the top of the new
    /// one and the destination resolves monster damage. On refusal nothing
    /// changes except that a player's card goes back to where it was
    /// picked up.
    pub fn place_card(
        &mut self,
        registry: &mut Registry,
        card: EntityId,
        slot: EntityId,
        intent: PlacementIntent,
    ) -> PatienceResult<PlacementOutcome> {
        let (rank, suit, from) = {
            let component = registry.get::<CardComponent>(card)?;
            (component.rank, component.suit, component.current_slot())
        };
        let target = registry.get::<CardSlotComponent>(slot)?;
        let top = target.top_card().and_then(|id| rank_suit(registry, id));

        let refusal = if from == slot {
            Some(RevertReason::SameSlot)
        } else if intent == (PlacementIntent::Player { in_sequence: true }) && !target.can_accept_sequences() {
            Some(RevertReason::SequenceRefused)
        } else if !target.can_accept_cards() {
            Some(RevertReason::SlotFull)
        } else if target.slot_type() == SlotType::Wastepile && intent != PlacementIntent::Discard {
            Some(RevertReason::DiscardOnly)
        } else if target.slot_type() == SlotType::MonsterBay && intent != PlacementIntent::Release {
            Some(RevertReason::ReleaseOnly)
        } else if !target.is_card_allowed_in_slot(rank, suit, top) {
            Some(RevertReason::RuleViolation)
        } else {
            None
        };

        if let Some(reason) = refusal {
            if matches!(intent, PlacementIntent::Player { .. }) {
                self.revert(registry, card)?;
            }
            return Ok(PlacementOutcome::Reverted(reason));
        }

        self.move_card(registry, card, from, slot)?;
        let monster_defeated = self.damage_monster(registry, slot)?;
        Ok(PlacementOutcome::Placed { slot, monster_defeated })
    }

    /// Resolve a fight at `site`.
    ///
    /// If the ranks stacked at the site add up to at least the health of
    /// the monster in its paired bay, the monster goes to the monster
    /// discard and every site card to the main discard, each flipping
    /// face-down on the way. Returns whether the monster was defeated.
    pub fn damage_monster(&mut self, registry: &mut Registry, site: EntityId) -> PatienceResult<bool> {
        let site_slot = registry.get::<CardSlotComponent>(site)?;
        if site_slot.slot_type() != SlotType::Site {
            return Ok(false);
        }
        let Some(bay) = site_slot.monster_slot() else {
            return Ok(false);
        };
        let Some(monster) = registry.get::<CardSlotComponent>(bay)?.top_card() else {
            return Ok(false);
        };
        let Some(health) = registry.get::<CardComponent>(monster)?.monster_health() else {
            return Ok(false);
        };

        let site_cards = registry.get::<CardSlotComponent>(site)?.cards().to_vec();
        let damage = rank_sum(registry, &site_cards)?;
        if damage < health {
            debug!(%site, %monster, damage, health, "monster survives");
            return Ok(false);
        }

        let Some(monster_discard) = self.config.monster_discard else {
            debug!(%site, %monster, "no monster discard configured");
            return Ok(false);
        };
        if !self.transfer(registry, monster, monster_discard, MONSTER_BACK_SPRITE)? {
            return Ok(false);
        }
        info!(%site, %monster, damage, health, "monster defeated");

        if let Some(main_discard) = self.config.main_discard {
            for &card in site_cards.iter().rev() {
                self.transfer(registry, card, main_discard, CARD_BACK_SPRITE)?;
            }
        }
        Ok(true)
    }

    /// Move monsters off the top of `column` into empty monster bays until
    /// the top card is not a monster or no bay is free.
    ///
    /// Returns how many monsters were released.
    pub fn release_monsters(&mut self, registry: &mut Registry, column: EntityId) -> PatienceResult<usize> {
        let roster = monster_roster(registry)?;
        let mut released = 0;

        loop {
            let Some(top) = registry.get::<CardSlotComponent>(column)?.top_card() else {
                break;
            };
            if !registry.get::<CardComponent>(top)?.is_monster() {
                break;
            }

            let mut free_bay = None;
            for &bay in &roster {
                if registry.get::<CardSlotComponent>(bay)?.is_empty() {
                    free_bay = Some(bay);
                    break;
                }
            }
            let Some(bay) = free_bay else {
                break;
            };

            let from = registry.get::<TransformComponent>(top)?.position;
            if !self.place_card(registry, top, bay, PlacementIntent::Release)?.is_placed() {
                break;
            }
            registry.get_mut::<CardComponent>(top)?.available = true;
            let to = registry.get::<TransformComponent>(top)?.position;
            self.animator.request_transfer(TransferRequest::new(top, from, to));

            info!(monster = %top, %column, %bay, "monster released");
            released += 1;
        }
        Ok(released)
    }

    /// Discard `card` into `slot` with an animated flip. Returns whether the
    /// card moved.
    fn transfer(
        &mut self,
        registry: &mut Registry,
        card: EntityId,
        slot: EntityId,
        sprite: &str,
    ) -> PatienceResult<bool> {
        let from = registry.get::<TransformComponent>(card)?.position;
        if !self.place_card(registry, card, slot, PlacementIntent::Discard)?.is_placed() {
            return Ok(false);
        }
        let to = registry.get::<TransformComponent>(card)?.position;
        self.animator
            .request_transfer(TransferRequest::new(card, from, to).with_flip(sprite));
        Ok(true)
    }

    /// Move a card between slot lists, update its back-reference and lay
    /// out both slots. A column's new top card turns face-up.
    fn move_card(
        &mut self,
        registry: &mut Registry,
        card: EntityId,
        from: EntityId,
        to: EntityId,
    ) -> PatienceResult<()> {
        registry.get_mut::<CardSlotComponent>(from)?.remove_card(card);
        registry.get_mut::<CardSlotComponent>(to)?.add_card(card);
        registry.get_mut::<CardComponent>(card)?.set_current_slot(to);

        let origin = registry.get::<CardSlotComponent>(from)?;
        if origin.slot_type() == SlotType::Column {
            if let Some(exposed) = origin.top_card() {
                registry.get_mut::<CardComponent>(exposed)?.available = true;
            }
        }

        self.layout_slot(registry, from)?;
        self.layout_slot(registry, to)
    }

    /// Put a player's card back where it was picked up.
    fn revert(&mut self, registry: &mut Registry, card: EntityId) -> PatienceResult<()> {
        let previous = registry.get::<CardComponent>(card)?.previous_position();
        registry.get_mut::<TransformComponent>(card)?.set_position(previous);
        Ok(())
    }

    /// Position every resting card of a slot. Held cards stay with the
    /// pointer.
    pub fn layout_slot(&self, registry: &mut Registry, slot: EntityId) -> PatienceResult<()> {
        layout_slot(registry, slot)
    }
}

/// Position every resting card of `slot` from the slot's layout.
pub fn layout_slot(registry: &mut Registry, slot: EntityId) -> PatienceResult<()> {
    let origin = registry.get::<TransformComponent>(slot)?.position.truncate();
    let placements: Vec<(EntityId, Vec2)> = {
        let slot = registry.get::<CardSlotComponent>(slot)?;
        slot.cards()
            .iter()
            .enumerate()
            .map(|(index, &card)| (card, slot.card_offset(index)))
            .collect()
    };

    for (index, (card, offset)) in placements.into_iter().enumerate() {
        if registry.get::<CardComponent>(card)?.is_held() {
            continue;
        }
        let transform = registry.get_mut::<TransformComponent>(card)?;
        transform.set_xy(origin + offset);
        transform.set_layer_section(Layer::Card, index, STACK_SECTIONS);
    }
    Ok(())
}

fn rank_suit(registry: &Registry, card: EntityId) -> Option<(u8, Suit)> {
    registry
        .try_get::<CardComponent>(card)
        .map(|c| (c.rank, c.suit))
}

fn rank_sum(registry: &Registry, cards: &[EntityId]) -> PatienceResult<u32> {
    let mut sum = 0;
    for &card in cards {
        sum += u32::from(registry.get::<CardComponent>(card)?.rank);
    }
    Ok(sum)
}

fn monster_roster(registry: &Registry) -> PatienceResult<Vec<EntityId>> {
    let entity = registry
        .first_entity::<PatienceComponent>()
        .ok_or(PatienceError::NoPatienceEntity)?;
    Ok(registry.get::<PatienceComponent>(entity)?.monster_slots.clone())
}
