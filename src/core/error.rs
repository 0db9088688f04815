//! Error type shared by the whole crate.
//!
//! Only setup bugs and loading failures are errors. A card that cannot be
//! placed is a normal outcome and never surfaces here.

use super::entity::EntityId;

/// Errors raised by the registry, setup and game-mode loading.
#[derive(thiserror::Error, Debug)]
pub enum PatienceError {
    /// A component was requested from an entity that does not carry it.
    #[error("{entity} has no {component} component")]
    InvalidAccess {
        entity: EntityId,
        component: &'static str,
    },

    /// The engine ran before a game-mode entity was created.
    #[error("no entity carries a PatienceComponent")]
    NoPatienceEntity,

    /// Dealing needs at least one column slot.
    #[error("board has no column slots to deal into")]
    NoColumns,

    /// Game-mode data is inconsistent.
    #[error("invalid game mode: {0}")]
    InvalidConfig(String),

    /// Reading a game-mode file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Game-mode JSON could not be parsed.
    #[error("game mode parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout the crate.
pub type PatienceResult<T> = Result<T, PatienceError>;
