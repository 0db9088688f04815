//! Board construction and dealing.
//!
//! The board is laid out in three rows:
//!
//! ```text
//! bays:      [B0] [B1] [B2] [B3]                        [monster discard]
//! sites:     [S0] [S1] [S2] [S3] [F0].. [stock] [waste] [discard]
//! columns:   [C0] [C1] [C2] [C3] [C4] [C5] [C6]
//! ```
//!
//! Each site is paired with the bay above it. The bays, in order, form the
//! roster that released monsters fill.

use tracing::{debug, info};

use super::placement::{layout_slot, PlacementConfig};
use crate::animation::SpriteComponent;
use crate::cards::{CardComponent, CardSlotComponent, SlotRules, SlotType};
use crate::core::{
    CardData, EntityId, GameRng, PatienceComponent, PatienceError, PatienceResult, PatienceRules, Registry,
    Revelation, Vec2,
};
use crate::spatial::{BoxArea2D, Layer, TransformComponent};

/// Numeric layout of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardLayout {
    /// Position of the first column.
    pub origin: Vec2,
    /// Horizontal distance between neighbouring slots.
    pub column_spacing: f32,
    /// Vertical distance between rows.
    pub row_spacing: f32,
    /// Shift of each card from the one below it in a column.
    pub stagger_offset: Vec2,
    pub card_half_extent: Vec2,
    pub slot_half_extent: Vec2,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            column_spacing: 60.0,
            row_spacing: 100.0,
            stagger_offset: Vec2::new(0.0, -20.0),
            card_half_extent: Vec2::new(22.5, 32.0),
            slot_half_extent: Vec2::new(25.0, 35.0),
        }
    }
}

impl BoardLayout {
    fn at(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + column as f32 * self.column_spacing,
            self.origin.y + row as f32 * self.row_spacing,
        )
    }
}

/// Slots created by `PatienceSetup::build_board`.
#[derive(Clone, Debug)]
pub struct Board {
    /// Game-mode entity carrying `PatienceComponent`.
    pub patience: EntityId,
    pub columns: Vec<EntityId>,
    pub sites: Vec<EntityId>,
    /// Same order as `sites`; also the release roster.
    pub monster_bays: Vec<EntityId>,
    pub freecells: Vec<EntityId>,
    pub stocks: Vec<EntityId>,
    pub wastepiles: Vec<EntityId>,
    pub main_discard: EntityId,
    pub monster_discard: EntityId,
    pub layout: BoardLayout,
}

impl Board {
    /// Discard piles for the placement engine.
    #[must_use]
    pub fn placement_config(&self) -> PlacementConfig {
        PlacementConfig {
            main_discard: Some(self.main_discard),
            monster_discard: Some(self.monster_discard),
        }
    }

    /// Every slot on the board.
    pub fn slots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.columns
            .iter()
            .chain(&self.sites)
            .chain(&self.monster_bays)
            .chain(&self.freecells)
            .chain(&self.stocks)
            .chain(&self.wastepiles)
            .copied()
            .chain([self.main_discard, self.monster_discard])
    }
}

/// Builds boards and deals decks.
pub struct PatienceSetup;

impl PatienceSetup {
    /// Create the game-mode entity and every slot the rules ask for.
    pub fn build_board(
        registry: &mut Registry,
        rules: &PatienceRules,
        name: &str,
        layout: BoardLayout,
    ) -> Board {
        let patience = registry.create_entity(name);
        registry.add(patience, PatienceComponent::new(rules.clone(), name));

        let columns: Vec<EntityId> = (0..rules.columns)
            .map(|i| {
                let slot = CardSlotComponent::new(SlotType::Column)
                    .with_stagger_offset(layout.stagger_offset)
                    .with_rules(rules.column_rules());
                spawn_slot(registry, format!("Column {i}"), slot, layout.at(i, 0), &layout)
            })
            .collect();

        let mut sites = Vec::with_capacity(rules.sites);
        let mut monster_bays = Vec::with_capacity(rules.sites);
        for i in 0..rules.sites {
            let site = registry.create_entity(format!("Site {i}"));
            let bay = registry.create_entity(format!("Monster Bay {i}"));
            attach_slot(
                registry,
                site,
                CardSlotComponent::new(SlotType::Site)
                    .with_rules(rules.site_rules())
                    .with_monster_slot(bay),
                layout.at(i, 1),
                &layout,
            );
            attach_slot(
                registry,
                bay,
                CardSlotComponent::new(SlotType::MonsterBay).with_site(site),
                layout.at(i, 2),
                &layout,
            );
            sites.push(site);
            monster_bays.push(bay);
        }

        let mut next = rules.sites;
        let mut row_of = |registry: &mut Registry, count: usize, slot_type: SlotType, label: &str| {
            let ids: Vec<EntityId> = (0..count)
                .map(|i| {
                    let slot = CardSlotComponent::new(slot_type)
                        .with_rules(SlotRules::for_type(slot_type).with_max_rank(rules.max_rank));
                    spawn_slot(registry, format!("{label} {i}"), slot, layout.at(next + i, 1), &layout)
                })
                .collect();
            next += count;
            ids
        };
        let freecells = row_of(registry, rules.freecells, SlotType::Freecell, "Freecell");
        let stocks = row_of(registry, rules.stocks, SlotType::Stock, "Stock");
        let wastepiles = row_of(registry, rules.wastepiles, SlotType::Wastepile, "Wastepile");

        let edge = next.max(rules.columns) + 1;
        let main_discard = spawn_slot(
            registry,
            "Discard".to_string(),
            CardSlotComponent::new(SlotType::Wastepile),
            layout.at(edge, 1),
            &layout,
        );
        let monster_discard = spawn_slot(
            registry,
            "Monster Discard".to_string(),
            CardSlotComponent::new(SlotType::Wastepile),
            layout.at(edge, 2),
            &layout,
        );

        if let Some(component) = registry.try_get_mut::<PatienceComponent>(patience) {
            component.monster_slots.clone_from(&monster_bays);
        }

        debug!(
            columns = rules.columns,
            sites = rules.sites,
            freecells = rules.freecells,
            "board built"
        );

        Board {
            patience,
            columns,
            sites,
            monster_bays,
            freecells,
            stocks,
            wastepiles,
            main_discard,
            monster_discard,
            layout,
        }
    }

    /// Shuffle `deck` and deal it round-robin into the columns.
    ///
    /// Returns the card entities in dealing order. Under
    /// `Revelation::TopOnly` only the top card of each column is left
    /// face-up.
    pub fn deal(
        registry: &mut Registry,
        board: &Board,
        deck: &[CardData],
        rng: &mut GameRng,
    ) -> PatienceResult<Vec<EntityId>> {
        if deck.is_empty() {
            return Ok(Vec::new());
        }
        if board.columns.is_empty() {
            return Err(PatienceError::NoColumns);
        }

        let mut shuffled = deck.to_vec();
        rng.shuffle(&mut shuffled);

        let mut dealt = Vec::with_capacity(shuffled.len());
        for (i, data) in shuffled.into_iter().enumerate() {
            let column = board.columns[i % board.columns.len()];
            let xy = registry.get::<TransformComponent>(column)?.position.truncate();

            let mut card = CardComponent::new(data.rank, data.suit, column);
            card.kind = data.kind;

            let entity = registry.create_entity(data.name);
            registry.add(entity, card);
            registry.add(entity, TransformComponent::on_layer(xy, Layer::Card));
            registry.add(entity, BoxArea2D::new(board.layout.card_half_extent));
            registry.add(entity, SpriteComponent::new(data.sprite));
            registry.get_mut::<CardSlotComponent>(column)?.add_card(entity);
            dealt.push(entity);
        }

        let revelation = registry.get::<PatienceComponent>(board.patience)?.rules.revelation;
        for &column in &board.columns {
            layout_slot(registry, column)?;
            if revelation == Revelation::TopOnly {
                let cards = registry.get::<CardSlotComponent>(column)?.cards().to_vec();
                if let Some((&top, hidden)) = cards.split_last() {
                    for &card in hidden {
                        registry.get_mut::<CardComponent>(card)?.available = false;
                    }
                    registry.get_mut::<CardComponent>(top)?.available = true;
                }
            }
        }

        info!(cards = dealt.len(), columns = board.columns.len(), seed = rng.seed(), "dealt");
        Ok(dealt)
    }
}

fn spawn_slot(
    registry: &mut Registry,
    name: String,
    slot: CardSlotComponent,
    xy: Vec2,
    layout: &BoardLayout,
) -> EntityId {
    let entity = registry.create_entity(name);
    attach_slot(registry, entity, slot, xy, layout);
    entity
}

fn attach_slot(registry: &mut Registry, entity: EntityId, slot: CardSlotComponent, xy: Vec2, layout: &BoardLayout) {
    registry.add(entity, slot);
    registry.add(entity, TransformComponent::on_layer(xy, Layer::Slot));
    registry.add(entity, BoxArea2D::new(layout.slot_half_extent));
}
