//! Cards and the slots that hold them.
//!
//! ## Key Types
//!
//! - `CardComponent`: rank, suit, monster stats and pointer state
//! - `CardSlotComponent`: ordered card list plus acceptance rules
//! - `SlotRules`: foundation, ordering, capacity and sequence rules
//! - `RankOrdering` / `SuitOrdering`: the pairwise packing checks

pub mod card;
pub mod ordering;
pub mod slot;

pub use card::{CardComponent, CardKind, Colour, InteractionState, Suit};
pub use ordering::{RankOrdering, SuitOrdering};
pub use slot::{CardSequence, CardSlotComponent, SlotLayout, SlotRules, SlotType};
