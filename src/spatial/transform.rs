//! World transform and draw layers.
//!
//! Positions are world-space; `z` orders drawing and hover picking. Each
//! `Layer` owns a band of `z` values so cards inside a slot, cards in
//! flight and cards under the pointer never interleave.

use serde::{Deserialize, Serialize};

use crate::core::{Vec2, Vec3};

/// Width of each layer's `z` band.
pub const LAYER_DEPTH: f32 = 0.2;

/// Draw layers, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Slot,
    /// Cards resting in slots.
    Card,
    /// Cards travelling to a discard pile.
    Transfer,
    /// Cards following the pointer.
    Held,
}

impl Layer {
    /// Lowest `z` of the layer.
    #[must_use]
    pub const fn base_z(self) -> f32 {
        match self {
            Layer::Background => 0.0,
            Layer::Slot => 0.2,
            Layer::Card => 0.4,
            Layer::Transfer => 0.6,
            Layer::Held => 0.8,
        }
    }

    /// Whether `z` falls inside this layer's band.
    #[must_use]
    pub fn holds(self, z: f32) -> bool {
        z >= self.base_z() && z < self.base_z() + LAYER_DEPTH
    }

    /// `z` of `section` out of `sections` within this layer.
    #[must_use]
    pub fn z_at(self, section: usize, sections: usize) -> f32 {
        let sections = sections.max(1) as f32;
        let t = (section as f32 / sections).min(1.0);
        self.base_z() + LAYER_DEPTH * t * 0.999
    }
}

/// Position of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    pub position: Vec3,
}

impl TransformComponent {
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Transform at `xy` on the given layer.
    #[must_use]
    pub fn on_layer(xy: Vec2, layer: Layer) -> Self {
        Self::new(xy.extend(layer.base_z()))
    }

    /// Board positions are not parented, so world and local agree.
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Move in the plane, keeping the layer.
    pub fn set_xy(&mut self, xy: Vec2) {
        self.position.x = xy.x;
        self.position.y = xy.y;
    }

    /// Put the entity at `section` of `sections` inside `layer`.
    pub fn set_layer_section(&mut self, layer: Layer, section: usize, sections: usize) {
        self.position.z = layer.z_at(section, sections);
    }
}
