//! Systems that drive the board.

pub mod placement;
pub mod setup;

pub use placement::{
    layout_slot, PlacementConfig, PlacementEngine, PlacementIntent, PlacementOutcome, RevertReason,
    HELD_SECTIONS, STACK_SECTIONS,
};
pub use setup::{Board, BoardLayout, PatienceSetup};
