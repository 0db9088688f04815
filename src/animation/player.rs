//! Animation collaborators.
//!
//! The placement engine only ever calls `Animator::request_transfer` and
//! never waits on the result. Implementations:
//!
//! - `NoopAnimator`: drops every request (headless play, engine tests)
//! - `RecordingAnimator`: keeps requests for inspection
//! - `TweenPlayer`: moves transforms over time and applies sprite swaps

use tracing::trace;

use super::transfer::{MidTransition, SpriteComponent, TransferRequest};
use crate::core::{PatienceResult, Registry};
use crate::spatial::{Layer, TransformComponent};

/// Receiver of fire-and-forget transfer requests.
pub trait Animator {
    /// Queue a transfer. Must not touch game state.
    fn request_transfer(&mut self, request: TransferRequest);

    /// Advance running transfers by `dt` seconds.
    ///
    /// Default implementation does nothing.
    fn update(&mut self, _registry: &mut Registry, _dt: f32) -> PatienceResult<()> {
        Ok(())
    }

    /// Whether no transfer is still running.
    fn is_idle(&self) -> bool {
        true
    }
}

/// Animator that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnimator;

impl Animator for NoopAnimator {
    fn request_transfer(&mut self, _request: TransferRequest) {}
}

/// Animator that records requests.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnimator {
    requests: Vec<TransferRequest>,
}

impl RecordingAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[TransferRequest] {
        &self.requests
    }

    /// Take the recorded requests, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<TransferRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Animator for RecordingAnimator {
    fn request_transfer(&mut self, request: TransferRequest) {
        self.requests.push(request);
    }
}

#[derive(Clone, Debug)]
struct ActiveTransfer {
    request: TransferRequest,
    elapsed: f32,
    midpoint_done: bool,
}

/// Animator that plays transfers on the registry's transforms.
///
/// In flight, a card is drawn on the transfer layer; it lands exactly on
/// the request's `to` position.
#[derive(Clone, Debug, Default)]
pub struct TweenPlayer {
    active: Vec<ActiveTransfer>,
}

impl TweenPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transfers still running.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Animator for TweenPlayer {
    fn request_transfer(&mut self, request: TransferRequest) {
        // A newer transfer of the same card replaces the older one.
        self.active.retain(|t| t.request.entity != request.entity);
        self.active.push(ActiveTransfer {
            request,
            elapsed: 0.0,
            midpoint_done: false,
        });
    }

    fn update(&mut self, registry: &mut Registry, dt: f32) -> PatienceResult<()> {
        for transfer in &mut self.active {
            transfer.elapsed += dt;
            let request = &transfer.request;

            if !transfer.midpoint_done {
                if let Some(MidTransition::SwapSprite { delay, sprite }) = &request.midpoint {
                    if transfer.elapsed >= *delay {
                        if let Some(current) = registry.try_get_mut::<SpriteComponent>(request.entity) {
                            current.texture.clone_from(sprite);
                        }
                        transfer.midpoint_done = true;
                        trace!(entity = %request.entity, %sprite, "sprite swapped mid-transfer");
                    }
                }
            }

            let progress = if request.duration > 0.0 {
                transfer.elapsed / request.duration
            } else {
                1.0
            };
            let transform = registry.get_mut::<TransformComponent>(request.entity)?;
            if progress >= 1.0 {
                transform.set_position(request.to);
            } else {
                let mut position = request.from.lerp(request.to, request.easing.apply(progress));
                position.z = Layer::Transfer.base_z();
                transform.set_position(position);
            }
        }

        self.active.retain(|t| {
            let finished = t.request.duration <= 0.0 || t.elapsed >= t.request.duration;
            !finished || (!t.midpoint_done && t.request.midpoint.is_some())
        });
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}
