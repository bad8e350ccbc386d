//! The swipe state machine — per-axis integrators, release
//! classification, and the exactly-once stack-advance signal.
//!
//! While the finger is down the card tracks it one-to-one; on release the
//! horizontal velocity decides the outcome (fling off-screen left/right,
//! or snap back to center) and the springs take over.  A committed card
//! keeps flying on its own springs while fresh identity springs bind to
//! the next card, so the stack is interactive again immediately.

use tracing::{debug, trace};

use super::gesture::{GesturePhase, GestureSample};
use super::spring::{SpringConfig, SpringState};

// ───────────────────────────────────────── classification ────

/// Outcome of classifying a release velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Like,
    Dislike,
    SnapBack,
}

/// Classify a release by its horizontal velocity.
///
/// The threshold is inclusive: a release at exactly ±`threshold` snaps
/// back; only a strictly faster fling commits.
pub fn classify(vx: f64, threshold: f64) -> Verdict {
    if vx > threshold {
        Verdict::Like
    } else if vx < -threshold {
        Verdict::Dislike
    } else {
        Verdict::SnapBack
    }
}

// ───────────────────────────────────────── tuning ────────────

/// Interaction tuning shared by both axes.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTuning {
    pub spring: SpringConfig,
    /// Horizontal release speed (points/s) past which a fling commits.
    pub velocity_threshold: f64,
    /// X displacement at which a card counts as fully dismissed.
    pub offscreen_distance: f64,
}

impl Default for SwipeTuning {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            velocity_threshold: 100.0,
            offscreen_distance: 500.0,
        }
    }
}

// ───────────────────────────────────────── axis ──────────────

/// One axis of the simulation: a spring plus the clock and offset
/// bookkeeping that lets successive drag episodes compose.
#[derive(Debug, Clone, Copy)]
pub struct SwipeAxis {
    state: SpringState,
    config: SpringConfig,
    /// Resting position carried between episodes; a new drag translates
    /// relative to it.
    offset: f64,
    /// Whether this axis' clock is running (spring in flight).
    running: bool,
}

impl SwipeAxis {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            state: SpringState::default(),
            config,
            offset: 0.0,
            running: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn finished(&self) -> bool {
        self.state.finished
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Track the finger directly; the simulation is bypassed.
    ///
    /// A clock left running by a previous release is stopped and its
    /// velocity discarded before tracking resumes, so grabbing a card
    /// mid-animation never glitches.
    pub fn track(&mut self, translation: f64) {
        if self.running {
            trace!(position = self.state.position, "grab while clock running, stopping");
            self.running = false;
            self.state.velocity = 0.0;
        }
        self.state.finished = false;
        self.state.position = self.offset + translation;
    }

    /// Arm the spring toward `target`, seeding `velocity`, and start the
    /// clock.  Refuses while the clock runs or the spring has finished;
    /// returns whether arming took place.
    pub fn arm(&mut self, target: f64, velocity: f64) -> bool {
        if self.running || self.state.finished {
            return false;
        }
        self.state.elapsed = 0.0;
        self.state.velocity = velocity;
        self.config.target = target;
        self.running = true;
        true
    }

    /// Integrate one frame while the clock runs.  Keeps `offset` in sync
    /// with the position so a future re-arm composes with wherever the
    /// spring came to rest.
    pub fn step(&mut self, dt: f64) -> f64 {
        if self.running {
            self.state.step(&self.config, dt);
            self.offset = self.state.position;
            if self.state.finished {
                self.running = false;
            }
        }
        self.state.position
    }
}

// ───────────────────────────────────────── engine ────────────

/// Positions reported for one frame.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    /// Top-card position, engine points.
    pub x: f64,
    pub y: f64,
    /// Set on the single frame where a Like/Dislike commitment armed.
    pub advance: Option<Verdict>,
    /// Position of a previously committed card still flying off-screen.
    pub flyoff: Option<(f64, f64)>,
}

/// Two-axis swipe engine for the interactive top card.
#[derive(Debug)]
pub struct SwipeEngine {
    x: SwipeAxis,
    y: SwipeAxis,
    tuning: SwipeTuning,
    /// Phase seen on the previous frame; arming is edge-triggered on the
    /// transition into `Released` so it runs once per release, never once
    /// per frame.
    prev_phase: GesturePhase,
    /// Springs of the last committed card, integrating until finished.
    flyoff: Option<(SwipeAxis, SwipeAxis)>,
}

impl SwipeEngine {
    pub fn new(tuning: SwipeTuning) -> Self {
        Self {
            x: SwipeAxis::new(tuning.spring),
            y: SwipeAxis::new(tuning.spring),
            tuning,
            prev_phase: GesturePhase::Idle,
            flyoff: None,
        }
    }

    /// Advance the engine by one frame.
    ///
    /// Reads one gesture snapshot, tracks or integrates both axes, and
    /// reports the positions plus an advance signal on the frame a
    /// commitment armed.
    pub fn step(&mut self, sample: GestureSample, dt: f64) -> StepReport {
        let mut advance = None;

        match sample.phase {
            GesturePhase::Idle => {}
            GesturePhase::Active => {
                self.x.track(sample.dx);
                self.y.track(sample.dy);
            }
            GesturePhase::Released => {
                if self.prev_phase != GesturePhase::Released {
                    advance = self.resolve_release(sample);
                }
            }
        }
        self.prev_phase = sample.phase;

        // Integration is a no-op unless a release armed the clock, so
        // stepping unconditionally keeps every phase uniform (and lets a
        // button fling animate even though no gesture is in flight).
        self.x.step(dt);
        self.y.step(dt);

        // A dismissed card keeps flying on its own springs until both
        // axes settle.
        let flyoff = self.flyoff.as_mut().map(|(fx, fy)| (fx.step(dt), fy.step(dt)));
        if matches!(&self.flyoff, Some((fx, fy)) if fx.finished() && fy.finished()) {
            self.flyoff = None;
        }

        StepReport {
            x: self.x.position(),
            y: self.y.position(),
            advance,
            flyoff,
        }
    }

    /// Programmatic fling (footer buttons / keyboard): an instantaneous
    /// grab-and-release at the resting position with the given velocity.
    /// Goes through the same classification and arm path as a real
    /// swipe, so the exactly-once guarantee holds unchanged.
    pub fn fling(&mut self, vx: f64) -> Option<Verdict> {
        self.x.track(0.0);
        self.y.track(0.0);
        let advance = self.resolve_release(GestureSample {
            phase: GesturePhase::Released,
            dx: 0.0,
            dy: 0.0,
            vx,
        });
        self.prev_phase = GesturePhase::Released;
        advance
    }

    /// Classify the release and arm both axes.  Runs exactly once per
    /// release episode; a Like/Dislike hands the armed axes to the
    /// fly-off slot and binds fresh springs for the next card.
    fn resolve_release(&mut self, sample: GestureSample) -> Option<Verdict> {
        let verdict = classify(sample.vx, self.tuning.velocity_threshold);
        debug!(vx = sample.vx, ?verdict, "release");

        match verdict {
            Verdict::SnapBack => {
                // Return to center; velocity carries through so the card
                // keeps its momentum into the bounce-back.
                self.x.arm(0.0, sample.vx);
                self.y.arm(0.0, sample.vx);
                None
            }
            Verdict::Like | Verdict::Dislike => {
                let direction = if verdict == Verdict::Like { 1.0 } else { -1.0 };
                let target = direction * self.tuning.offscreen_distance;
                if !self.x.arm(target, sample.vx) {
                    return None;
                }
                self.y.arm(0.0, sample.vx);

                let fresh_x = SwipeAxis::new(self.tuning.spring);
                let fresh_y = SwipeAxis::new(self.tuning.spring);
                let fx = std::mem::replace(&mut self.x, fresh_x);
                let fy = std::mem::replace(&mut self.y, fresh_y);
                self.flyoff = Some((fx, fy));

                Some(verdict)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gesture::GestureSample;

    const DT: f64 = 1.0 / 60.0;

    fn active(dx: f64, dy: f64) -> GestureSample {
        GestureSample {
            phase: GesturePhase::Active,
            dx,
            dy,
            vx: 0.0,
        }
    }

    fn released(dx: f64, dy: f64, vx: f64) -> GestureSample {
        GestureSample {
            phase: GesturePhase::Released,
            dx,
            dy,
            vx,
        }
    }

    #[test]
    fn classification_boundaries_are_inclusive() {
        assert_eq!(classify(100.0, 100.0), Verdict::SnapBack);
        assert_eq!(classify(-100.0, 100.0), Verdict::SnapBack);
        assert_eq!(classify(100.0001, 100.0), Verdict::Like);
        assert_eq!(classify(-100.0001, 100.0), Verdict::Dislike);
        assert_eq!(classify(0.0, 100.0), Verdict::SnapBack);
        assert_eq!(classify(5000.0, 100.0), Verdict::Like);
    }

    #[test]
    fn active_phase_tracks_one_to_one() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        let report = engine.step(active(37.0, -12.0), DT);
        assert_eq!(report.x, 37.0);
        assert_eq!(report.y, -12.0);
        assert!(report.advance.is_none());
    }

    #[test]
    fn like_advances_exactly_once_regardless_of_frame_count() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(60.0, 0.0), DT);

        let mut advances = 0;
        for _ in 0..400 {
            let report = engine.step(released(60.0, 0.0, 800.0), DT);
            if report.advance.is_some() {
                advances += 1;
            }
        }
        assert_eq!(advances, 1);
    }

    #[test]
    fn snap_back_returns_to_center_without_advancing() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(50.0, 0.0), DT);

        let mut last = StepReport {
            x: 50.0,
            y: 0.0,
            advance: None,
            flyoff: None,
        };
        for _ in 0..400 {
            last = engine.step(released(50.0, 0.0, 0.0), DT);
            assert!(last.advance.is_none());
        }
        assert!(last.x.abs() < 0.01, "did not return to center: {}", last.x);
        assert!(last.flyoff.is_none());
    }

    #[test]
    fn committed_card_flies_off_while_next_is_interactive() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(80.0, 10.0), DT);
        let report = engine.step(released(80.0, 10.0, 900.0), DT);
        assert_eq!(report.advance, Some(Verdict::Like));

        // Fresh springs for the new top card: identity transform.
        assert_eq!(report.x, 0.0);
        assert_eq!(report.y, 0.0);

        // The dismissed card is still in flight toward +500.
        let (fx, _) = report.flyoff.expect("no fly-off in progress");
        assert!(fx > 80.0);

        // The fly-off eventually settles at the off-screen target and is
        // dropped from the report.
        let mut final_fx = fx;
        for _ in 0..400 {
            let r = engine.step(released(80.0, 10.0, 900.0), DT);
            match r.flyoff {
                Some((x, _)) => final_fx = x,
                None => break,
            }
        }
        assert!((final_fx - 500.0).abs() < 0.01);
        assert!(engine.flyoff.is_none());
    }

    #[test]
    fn dislike_targets_negative_offscreen() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(-40.0, 0.0), DT);
        let report = engine.step(released(-40.0, 0.0, -600.0), DT);
        assert_eq!(report.advance, Some(Verdict::Dislike));

        let mut last_x = 0.0;
        for _ in 0..400 {
            match engine.step(released(-40.0, 0.0, -600.0), DT).flyoff {
                Some((x, _)) => last_x = x,
                None => break,
            }
        }
        assert!((last_x + 500.0).abs() < 0.01);
    }

    #[test]
    fn grab_during_snap_back_stops_the_clock() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(50.0, 0.0), DT);

        // Release gently and let the snap-back run a few frames.
        for _ in 0..5 {
            engine.step(released(50.0, 0.0, 0.0), DT);
        }
        assert!(engine.x.running());

        // Grab again mid-animation: tracking resumes immediately and the
        // clock is stopped with its velocity discarded.
        let report = engine.step(active(10.0, 0.0), DT);
        assert!(!engine.x.running());
        assert!(!engine.x.finished());
        let resting = report.x;

        // Holding still must not drift — the stale spring velocity is gone.
        let report = engine.step(active(10.0, 0.0), DT);
        assert_eq!(report.x, resting);
    }

    #[test]
    fn re_release_after_grab_arms_again() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(50.0, 0.0), DT);
        for _ in 0..5 {
            engine.step(released(50.0, 0.0, 0.0), DT);
        }
        // Grab, then fling for real this time.
        engine.step(active(30.0, 0.0), DT);
        let report = engine.step(released(30.0, 0.0, 400.0), DT);
        assert_eq!(report.advance, Some(Verdict::Like));
    }

    #[test]
    fn successive_drags_compose_through_the_offset() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());

        // First episode: drag to 50, release, let it fully settle at 0.
        engine.step(active(50.0, 0.0), DT);
        for _ in 0..400 {
            engine.step(released(50.0, 0.0, 0.0), DT);
        }
        let settled = engine.step(released(50.0, 0.0, 0.0), DT).x;
        assert!(settled.abs() < 0.01);

        // Second episode translates relative to the settled offset.
        let report = engine.step(active(20.0, 0.0), DT);
        assert!((report.x - (settled + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn fling_commits_like_a_fast_release() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        assert_eq!(engine.fling(400.0), Some(Verdict::Like));
        assert_eq!(engine.fling(-400.0), Some(Verdict::Dislike));
        // Below the threshold a fling is just a snap-back of an
        // already-centered card.
        assert_eq!(engine.fling(50.0), None);
    }

    #[test]
    fn fling_interrupts_a_running_snap_back() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        engine.step(active(60.0, 0.0), DT);
        for _ in 0..5 {
            engine.step(released(60.0, 0.0, 0.0), DT);
        }
        assert!(engine.x.running());
        assert_eq!(engine.fling(500.0), Some(Verdict::Like));
    }

    #[test]
    fn idle_reports_identity() {
        let mut engine = SwipeEngine::new(SwipeTuning::default());
        let report = engine.step(GestureSample::default(), DT);
        assert_eq!(report.x, 0.0);
        assert_eq!(report.y, 0.0);
        assert!(report.advance.is_none());
        assert!(report.flyoff.is_none());
    }
}
