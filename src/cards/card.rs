//! Card component: identity, ownership back-reference and pointer state.
//!
//! A `CardComponent` never exists without a slot. `current_slot` is a
//! lookup reference only; the slot's own card list is what owns the card.
//!
//! ## Interaction state
//!
//! A card is exactly one of idle, hovered or held. The state is an enum so
//! "hovered and held at once" cannot be represented.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Vec2, Vec3};

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// Suit colour, for alternate/same colour packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Black,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    #[must_use]
    pub const fn colour(self) -> Colour {
        match self {
            Suit::Hearts | Suit::Diamonds => Colour::Red,
            Suit::Clubs | Suit::Spades => Colour::Black,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Normal playing card or a monster that must be beaten at a site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    #[default]
    Normal,
    Monster { health: u32 },
}

/// Pointer interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered,
    Held,
}

/// A single card on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct CardComponent {
    /// Rank, 1 (Ace) to the game mode's maximum rank.
    pub rank: u8,

    pub suit: Suit,

    pub kind: CardKind,

    /// Face-up and playable. Face-down cards can never be picked up.
    pub available: bool,

    state: InteractionState,

    /// Fan-out offset from the pointer while held.
    held_offset: Vec2,

    /// Last committed position, restored when a placement is rejected.
    previous_position: Vec3,

    /// Slot whose card list contains this card.
    current_slot: EntityId,
}

impl CardComponent {
    /// Create a normal card owned by `slot`.
    #[must_use]
    pub fn new(rank: u8, suit: Suit, slot: EntityId) -> Self {
        Self {
            rank,
            suit,
            kind: CardKind::Normal,
            available: true,
            state: InteractionState::Idle,
            held_offset: Vec2::ZERO,
            previous_position: Vec3::ZERO,
            current_slot: slot,
        }
    }

    /// Create a monster card owned by `slot`.
    #[must_use]
    pub fn monster(rank: u8, suit: Suit, health: u32, slot: EntityId) -> Self {
        Self {
            kind: CardKind::Monster { health },
            ..Self::new(rank, suit, slot)
        }
    }

    #[must_use]
    pub fn is_monster(&self) -> bool {
        matches!(self.kind, CardKind::Monster { .. })
    }

    /// Monster health, `None` for normal cards.
    #[must_use]
    pub fn monster_health(&self) -> Option<u32> {
        match self.kind {
            CardKind::Monster { health } => Some(health),
            CardKind::Normal => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.state == InteractionState::Hovered
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.state == InteractionState::Held
    }

    /// Set or clear hover. Held cards are left untouched.
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.state == InteractionState::Held {
            return;
        }
        self.state = if hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Idle
        };
    }

    /// Pick the card up, remembering where it came from.
    pub fn hold(&mut self, held_offset: Vec2, previous_position: Vec3) {
        self.state = InteractionState::Held;
        self.held_offset = held_offset;
        self.previous_position = previous_position;
    }

    /// Drop the card: back to idle with no offset.
    pub fn release(&mut self) {
        self.state = InteractionState::Idle;
        self.held_offset = Vec2::ZERO;
    }

    #[must_use]
    pub fn held_offset(&self) -> Vec2 {
        self.held_offset
    }

    #[must_use]
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    #[must_use]
    pub fn current_slot(&self) -> EntityId {
        self.current_slot
    }

    /// Update the back-reference. Only the placement engine and setup call
    /// this, right after moving the card between slot lists.
    pub fn set_current_slot(&mut self, slot: EntityId) {
        self.current_slot = slot;
    }
}

impl std::fmt::Display for CardComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CardKind::Normal => write!(f, "{}{}", self.rank, self.suit),
            CardKind::Monster { health } => write!(f, "{}{} (monster, {} hp)", self.rank, self.suit, health),
        }
    }
}
