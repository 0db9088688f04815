//! Positions, rectangular areas and slot detection.

pub mod area;
pub mod locator;
pub mod transform;

pub use area::{AreaBounds, BoxArea2D};
pub use locator::SlotLocator;
pub use transform::{Layer, TransformComponent, LAYER_DEPTH};
