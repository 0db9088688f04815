//! Card transfer requests and easing curves.
//!
//! A `TransferRequest` describes a purely cosmetic move: the game state has
//! already changed when it is issued. The optional `MidTransition` swaps the
//! card's sprite part-way through, which is how discarded cards turn
//! face-down while they fly.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Vec3};

/// Default flight time, seconds.
pub const TRANSFER_DURATION: f32 = 0.6;

/// Delay before a flipping card shows its back, seconds.
pub const FLIP_DELAY: f32 = 0.25;

/// Sprite shown by discarded playing cards.
pub const CARD_BACK_SPRITE: &str = "textures/cards/backs/card_back_0.png";

/// Sprite shown by defeated monsters.
pub const MONSTER_BACK_SPRITE: &str = "textures/cards/backs/card_back_1.png";

/// Interpolation curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    SineIn,
    #[default]
    SineOut,
    SineInOut,
    CubicIn,
    CubicOut,
}

impl Easing {
    /// Map linear progress `t` (clamped to `0.0..=1.0`) onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};

        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::SineOut => (t * FRAC_PI_2).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Something that happens part-way through a transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MidTransition {
    /// Replace the card's sprite after `delay` seconds.
    SwapSprite { delay: f32, sprite: String },
}

/// Request to animate a card from one position to another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub entity: EntityId,
    pub from: Vec3,
    pub to: Vec3,
    /// Seconds.
    pub duration: f32,
    pub easing: Easing,
    pub midpoint: Option<MidTransition>,
}

impl TransferRequest {
    /// Transfer with the default duration and easing.
    #[must_use]
    pub fn new(entity: EntityId, from: Vec3, to: Vec3) -> Self {
        Self {
            entity,
            from,
            to,
            duration: TRANSFER_DURATION,
            easing: Easing::SineOut,
            midpoint: None,
        }
    }

    /// Turn the card to `sprite` after the default flip delay.
    #[must_use]
    pub fn with_flip(mut self, sprite: impl Into<String>) -> Self {
        self.midpoint = Some(MidTransition::SwapSprite {
            delay: FLIP_DELAY,
            sprite: sprite.into(),
        });
        self
    }

    /// Sprite this transfer flips to, if any.
    #[must_use]
    pub fn flip_sprite(&self) -> Option<&str> {
        match &self.midpoint {
            Some(MidTransition::SwapSprite { sprite, .. }) => Some(sprite),
            None => None,
        }
    }
}

/// Texture shown for an entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteComponent {
    pub texture: String,
}

impl SpriteComponent {
    #[must_use]
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
        }
    }
}
