//! Card slots: ordered card containers with acceptance rules.
//!
//! A `CardSlotComponent` owns its cards through `cards` (bottom first, top
//! last). Cards point back at their slot by id only. The slot's `SlotRules`
//! are fixed at board construction; only the card list changes in play.
//!
//! ## Slot types
//!
//! | Type | Layout | Accepts from the player |
//! |---|---|---|
//! | Column | staggered | packed sequences |
//! | Site | stacked | single cards or sequences, gated by its monster |
//! | MonsterBay | stacked | nothing; monsters arrive by release |
//! | Freecell | stacked | one single card |
//! | Stock | stacked | nothing |
//! | Wastepile | stacked | nothing; discards only |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Suit;
use super::ordering::{RankOrdering, SuitOrdering};
use crate::core::{EntityId, Vec2};

/// Cards lifted together. Most sequences are short.
pub type CardSequence = SmallVec<[EntityId; 8]>;

/// Role of a slot on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Column,
    Site,
    MonsterBay,
    Freecell,
    Stock,
    Wastepile,
}

/// How cards in a slot are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotLayout {
    /// All cards at the slot position.
    Stacked,
    /// Each card shifted by the stagger offset from the one below.
    Staggered,
}

/// Acceptance and packing rules of one slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotRules {
    /// Suit required for the first card of an empty slot.
    pub foundation_suit: Option<Suit>,

    /// Rank required for the first card of an empty slot.
    pub foundation_rank: Option<u8>,

    /// Whether an empty slot takes cards at all.
    pub accepts_when_empty: bool,

    pub rank_ordering: RankOrdering,

    pub suit_ordering: SuitOrdering,

    /// Join `max_rank` and 1 for the by-one orderings.
    pub loop_around: bool,

    pub max_rank: u8,

    /// Whether more than one card may be dropped at once.
    pub accepts_sequences: bool,

    /// Maximum number of cards. `None` for unlimited.
    pub capacity: Option<usize>,
}

impl Default for SlotRules {
    fn default() -> Self {
        Self {
            foundation_suit: None,
            foundation_rank: None,
            accepts_when_empty: true,
            rank_ordering: RankOrdering::Any,
            suit_ordering: SuitOrdering::Any,
            loop_around: false,
            max_rank: 13,
            accepts_sequences: true,
            capacity: None,
        }
    }
}

impl SlotRules {
    /// Default rules for a slot type.
    #[must_use]
    pub fn for_type(slot_type: SlotType) -> Self {
        let base = Self::default();
        match slot_type {
            SlotType::Column | SlotType::Site => base,
            SlotType::MonsterBay | SlotType::Freecell => Self {
                accepts_sequences: false,
                capacity: Some(1),
                ..base
            },
            SlotType::Stock | SlotType::Wastepile => Self {
                accepts_sequences: false,
                ..base
            },
        }
    }

    #[must_use]
    pub fn with_ordering(mut self, rank: RankOrdering, suit: SuitOrdering) -> Self {
        self.rank_ordering = rank;
        self.suit_ordering = suit;
        self
    }

    #[must_use]
    pub fn with_foundation(mut self, rank: Option<u8>, suit: Option<Suit>) -> Self {
        self.foundation_rank = rank;
        self.foundation_suit = suit;
        self
    }

    #[must_use]
    pub fn with_loop_around(mut self, max_rank: u8) -> Self {
        self.loop_around = true;
        self.max_rank = max_rank;
        self
    }

    #[must_use]
    pub fn with_max_rank(mut self, max_rank: u8) -> Self {
        self.max_rank = max_rank;
        self
    }

    #[must_use]
    pub fn with_sequences(mut self, accepts: bool) -> Self {
        self.accepts_sequences = accepts;
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Refuse cards once empty (e.g. columns that may not be refilled).
    #[must_use]
    pub fn closed_when_empty(mut self) -> Self {
        self.accepts_when_empty = false;
        self
    }

    /// Check whether `next` may follow `below` under the ordering rules.
    #[must_use]
    pub fn packs(&self, below: (u8, Suit), next: (u8, Suit)) -> bool {
        self.rank_ordering
            .allows(below.0, next.0, self.max_rank, self.loop_around)
            && self.suit_ordering.allows(below.1, next.1)
    }

    /// Check whether a card of `rank`/`suit` may go on `top` (or on the
    /// empty slot when `top` is `None`).
    #[must_use]
    pub fn allows(&self, top: Option<(u8, Suit)>, rank: u8, suit: Suit) -> bool {
        match top {
            None => {
                self.accepts_when_empty
                    && self.foundation_rank.map_or(true, |r| r == rank)
                    && self.foundation_suit.map_or(true, |s| s == suit)
            }
            Some(below) => self.packs(below, (rank, suit)),
        }
    }
}

/// A card container on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSlotComponent {
    slot_type: SlotType,

    layout: SlotLayout,

    /// Per-card shift for staggered layouts; also the held fan-out step.
    stagger_offset: Vec2,

    rules: SlotRules,

    /// Owned cards, bottom first.
    cards: Vec<EntityId>,

    /// Site → paired monster bay.
    monster_slot: Option<EntityId>,

    /// Monster bay → site it guards.
    site: Option<EntityId>,
}

impl CardSlotComponent {
    /// Create an empty slot with the default layout and rules for its type.
    #[must_use]
    pub fn new(slot_type: SlotType) -> Self {
        let layout = match slot_type {
            SlotType::Column => SlotLayout::Staggered,
            _ => SlotLayout::Stacked,
        };
        Self {
            slot_type,
            layout,
            stagger_offset: Vec2::ZERO,
            rules: SlotRules::for_type(slot_type),
            cards: Vec::new(),
            monster_slot: None,
            site: None,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SlotLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_stagger_offset(mut self, offset: Vec2) -> Self {
        self.stagger_offset = offset;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: SlotRules) -> Self {
        self.rules = rules;
        self
    }

    /// Pair a site with its monster bay.
    #[must_use]
    pub fn with_monster_slot(mut self, bay: EntityId) -> Self {
        self.monster_slot = Some(bay);
        self
    }

    /// Point a monster bay back at its site.
    #[must_use]
    pub fn with_site(mut self, site: EntityId) -> Self {
        self.site = Some(site);
        self
    }

    #[must_use]
    pub fn slot_type(&self) -> SlotType {
        self.slot_type
    }

    #[must_use]
    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    #[must_use]
    pub fn stagger_offset(&self) -> Vec2 {
        self.stagger_offset
    }

    #[must_use]
    pub fn rules(&self) -> &SlotRules {
        &self.rules
    }

    #[must_use]
    pub fn monster_slot(&self) -> Option<EntityId> {
        self.monster_slot
    }

    #[must_use]
    pub fn site(&self) -> Option<EntityId> {
        self.site
    }

    /// Owned cards, bottom first.
    #[must_use]
    pub fn cards(&self) -> &[EntityId] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Top card, `None` when empty.
    #[must_use]
    pub fn top_card(&self) -> Option<EntityId> {
        self.cards.last().copied()
    }

    #[must_use]
    pub fn contains(&self, card: EntityId) -> bool {
        self.cards.contains(&card)
    }

    #[must_use]
    pub fn index_of(&self, card: EntityId) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    /// Put a card on top. Returns `false` (and changes nothing) if the card
    /// is already in this slot.
    pub fn add_card(&mut self, card: EntityId) -> bool {
        if self.contains(card) {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Remove a card, keeping the rest in order. Returns `false` if absent.
    pub fn remove_card(&mut self, card: EntityId) -> bool {
        match self.index_of(card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the slot still has room for a card dropped on it.
    #[must_use]
    pub fn can_accept_cards(&self) -> bool {
        self.slot_type != SlotType::Stock
            && self.rules.capacity.map_or(true, |cap| self.cards.len() < cap)
    }

    #[must_use]
    pub fn can_accept_sequences(&self) -> bool {
        self.rules.accepts_sequences
    }

    /// Whether the player may lift cards out of this slot.
    #[must_use]
    pub fn allows_pickup(&self) -> bool {
        matches!(
            self.slot_type,
            SlotType::Column | SlotType::Freecell | SlotType::Stock
        )
    }

    /// Check a card against this slot's rules, given the current top card.
    #[must_use]
    pub fn is_card_allowed_in_slot(&self, rank: u8, suit: Suit, top: Option<(u8, Suit)>) -> bool {
        self.rules.allows(top, rank, suit)
    }

    /// Offset of the card at `index` from the slot position.
    #[must_use]
    pub fn card_offset(&self, index: usize) -> Vec2 {
        match self.layout {
            SlotLayout::Stacked => Vec2::ZERO,
            SlotLayout::Staggered => self.stagger_offset * index as f32,
        }
    }

    /// The run from `card` to the top, if it is a valid packed sequence.
    ///
    /// `lookup` resolves a card id to its rank and suit. Returns an empty
    /// sequence when `card` is not in this slot, when any adjacent pair in
    /// the run breaks the packing rule, or when the slot is stacked and
    /// `card` is not the top card.
    pub fn card_sequence<F>(&self, card: EntityId, lookup: F) -> CardSequence
    where
        F: Fn(EntityId) -> Option<(u8, Suit)>,
    {
        let Some(start) = self.index_of(card) else {
            return CardSequence::new();
        };
        let run = &self.cards[start..];

        if self.layout == SlotLayout::Stacked && run.len() > 1 {
            return CardSequence::new();
        }

        for pair in run.windows(2) {
            let (Some(below), Some(next)) = (lookup(pair[0]), lookup(pair[1])) else {
                return CardSequence::new();
            };
            if !self.rules.packs(below, next) {
                return CardSequence::new();
            }
        }

        CardSequence::from_slice(run)
    }
}
