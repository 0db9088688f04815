//! Core building blocks: entities, the component registry, vectors,
//! errors, RNG and game-mode configuration.

pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod rng;

pub use config::{CardData, EmptyColumn, GameMode, PatienceComponent, PatienceRules, Revelation};
pub use entity::EntityId;
pub use error::{PatienceError, PatienceResult};
pub use registry::Registry;
pub use rng::GameRng;

pub use glam::{Vec2, Vec3};
