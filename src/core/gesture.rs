//! Gesture lifecycle — pointer events in, latest-wins samples out.
//!
//! The sampler is a thin normalization layer: every pointer event from
//! the host replaces the previous sample synchronously, and the frame
//! scheduler reads one consistent snapshot per tick.  No buffering, no
//! coalescing beyond "latest wins".

/// Lifecycle stage of a pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Changed,
    Ended,
}

/// A raw pointer event: translation from the drag origin plus the
/// instantaneous horizontal velocity, both in engine points.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub translation_x: f64,
    pub translation_y: f64,
    pub velocity_x: f64,
}

/// Discrete gesture stage consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No touch yet — the initial state.
    #[default]
    Idle,
    /// Finger down; dx/dy/vx track it one-to-one.
    Active,
    /// Finger lifted; dx/dy/vx hold the final pre-release values.
    Released,
}

/// The latest normalized gesture reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureSample {
    pub phase: GesturePhase,
    pub dx: f64,
    pub dy: f64,
    pub vx: f64,
}

/// Normalizes pointer events into [`GestureSample`]s.
#[derive(Debug, Default)]
pub struct GestureSampler {
    latest: GestureSample,
}

impl GestureSampler {
    /// Replace the current sample from a pointer event.
    pub fn publish(&mut self, event: PointerEvent) {
        let phase = match event.phase {
            PointerPhase::Began | PointerPhase::Changed => GesturePhase::Active,
            PointerPhase::Ended => GesturePhase::Released,
        };
        self.latest = GestureSample {
            phase,
            dx: event.translation_x,
            dy: event.translation_y,
            vx: event.velocity_x,
        };
    }

    /// The latest sample (one consistent snapshot per frame).
    pub fn sample(&self) -> GestureSample {
        self.latest
    }
}
