//! Cosmetic card transfers.
//!
//! Game state never depends on an animation finishing. The engine emits
//! `TransferRequest`s to an `Animator` and moves on.

pub mod player;
pub mod transfer;

pub use player::{Animator, NoopAnimator, RecordingAnimator, TweenPlayer};
pub use transfer::{
    Easing, MidTransition, SpriteComponent, TransferRequest, CARD_BACK_SPRITE, FLIP_DELAY,
    MONSTER_BACK_SPRITE, TRANSFER_DURATION,
};
