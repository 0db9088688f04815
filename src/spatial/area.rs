//! Axis-aligned rectangular areas for picking and slot detection.

use serde::{Deserialize, Serialize};

use super::transform::TransformComponent;
use crate::core::Vec2;

/// Rectangle attached to an entity: `offset` from the transform, `size`
/// as half-extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxArea2D {
    pub offset: Vec2,
    pub size: Vec2,
}

impl Default for BoxArea2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            size: Vec2::new(0.5, 0.5),
        }
    }
}

impl BoxArea2D {
    /// Area with the given half-extents, centred on the transform.
    #[must_use]
    pub const fn new(half_extent: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            size: half_extent,
        }
    }

    /// World bounds for an entity at `transform`.
    #[must_use]
    pub fn bounds(&self, transform: &TransformComponent) -> AreaBounds {
        AreaBounds {
            center: transform.world_position().truncate() + self.offset,
            half_extent: self.size,
        }
    }
}

/// Area in world space: centre + half-extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaBounds {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl AreaBounds {
    #[must_use]
    pub const fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self { center, half_extent }
    }

    /// Per-axis distance between centres.
    #[must_use]
    pub fn separation(&self, other: &AreaBounds) -> Vec2 {
        (self.center - other.center).abs()
    }

    /// Strict overlap on both axes; touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &AreaBounds) -> bool {
        let separation = self.separation(other);
        let reach = self.half_extent + other.half_extent;
        separation.x < reach.x && separation.y < reach.y
    }

    /// Point containment, edges inclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extent.x && d.y <= self.half_extent.y
    }
}
