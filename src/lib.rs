//! # patience
//!
//! Card placement for a patience (solitaire) game with monster battles,
//! built on a small entity-component registry.
//!
//! ## Design Principles
//!
//! 1. **Rules as data**: Slot behaviour comes from `SlotRules`, derived from
//!    the game mode's `PatienceRules`. No game mode is hardcoded.
//!
//! 2. **Synchronous events**: Every pointer event runs to completion.
//!    Animations are fire-and-forget requests to an `Animator`.
//!
//! 3. **Errors, not aborts**: A missing component is a `PatienceError`
//!    propagated to the caller. A refused move is a `RevertReason`.
//!
//! ## Modules
//!
//! - `core`: Entity ids, registry, vectors, errors, RNG, configuration
//! - `cards`: Cards, slots, ordering rules
//! - `spatial`: Transforms, areas, slot detection
//! - `animation`: Transfer requests and animators
//! - `systems`: Placement engine and board setup
//! - `scene`: A complete playable scene

pub mod animation;
pub mod cards;
pub mod core;
pub mod scene;
pub mod spatial;
pub mod systems;

// Re-export commonly used types
pub use crate::core::{
    CardData, EmptyColumn, EntityId, GameMode, GameRng, PatienceComponent, PatienceError, PatienceResult,
    PatienceRules, Registry, Revelation, Vec2, Vec3,
};

pub use crate::cards::{
    CardComponent, CardKind, CardSequence, CardSlotComponent, Colour, InteractionState, RankOrdering, SlotLayout,
    SlotRules, SlotType, Suit, SuitOrdering,
};

pub use crate::spatial::{AreaBounds, BoxArea2D, Layer, SlotLocator, TransformComponent};

pub use crate::animation::{
    Animator, Easing, MidTransition, NoopAnimator, RecordingAnimator, SpriteComponent, TransferRequest, TweenPlayer,
};

pub use crate::systems::{
    Board, BoardLayout, PatienceSetup, PlacementConfig, PlacementEngine, PlacementIntent, PlacementOutcome,
    RevertReason,
};

pub use crate::scene::PatienceScene;
