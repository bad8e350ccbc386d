//! Input handling — maps key/mouse events to state mutations.
//!
//! Mouse drags inside the card area become the engine's pointer stream:
//! Down starts a gesture episode, Drag publishes translations, Up
//! publishes the release with a velocity estimated from a short sliding
//! window of recent samples.  Terminal cells are converted to engine
//! points with the configured factor (doubled vertically, since cells
//! are about twice as tall as wide).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::trace;

use crate::core::gesture::{PointerEvent, PointerPhase};
use crate::ui::layout::{hit, AppLayout};

use super::state::AppState;

/// How far back drag samples count toward the release velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(150);

// ───────────────────────────────────────── velocity tracking ─

/// Sliding-window estimator for the horizontal release velocity.
///
/// Keeps (translation, timestamp) samples from the last
/// [`VELOCITY_WINDOW`] and reports total displacement over total time —
/// cell-quantized positions make per-event deltas too noisy to use
/// directly.
#[derive(Debug, Default)]
pub struct DragTracker {
    history: VecDeque<(f64, Instant)>,
}

impl DragTracker {
    /// Record the current translation (engine points).
    pub fn push(&mut self, translation_x: f64, at: Instant) {
        if let Some(&(_, last)) = self.history.back() {
            if at < last {
                return; // out-of-order event, ignore
            }
        }
        self.history.push_back((translation_x, at));
        while let Some(&(_, first)) = self.history.front() {
            if at.duration_since(first) <= VELOCITY_WINDOW {
                break;
            }
            self.history.pop_front();
        }
    }

    /// Points per second over the retained window; 0 until two samples
    /// exist.
    pub fn velocity(&self) -> f64 {
        let (Some(&(x0, t0)), Some(&(x1, t1))) = (self.history.front(), self.history.back())
        else {
            return 0.0;
        };
        let span = t1.duration_since(t0).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (x1 - x0) / span
    }
}

/// An in-progress mouse drag.
#[derive(Debug, Default)]
pub struct DragState {
    origin_col: u16,
    origin_row: u16,
    tracker: DragTracker,
}

impl DragState {
    fn begin(col: u16, row: u16) -> Self {
        Self {
            origin_col: col,
            origin_row: row,
            tracker: DragTracker::default(),
        }
    }

    /// Translation from the drag origin in engine points.
    fn translation(&self, col: u16, row: u16, points_per_cell: f64) -> (f64, f64) {
        let dx = (col as f64 - self.origin_col as f64) * points_per_cell;
        let dy = (row as f64 - self.origin_row as f64) * points_per_cell * 2.0;
        (dx, dy)
    }
}

// ───────────────────────────────────────── keys ──────────────

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Right | KeyCode::Char('l') => state.fling(true),
        KeyCode::Left | KeyCode::Char('h') => state.fling(false),
        _ => {}
    }
}

// ───────────────────────────────────────── mouse ─────────────

/// Process a mouse event, feeding drags into the gesture sampler.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let layout = AppLayout::from_area(state.terminal_area);
    let points_per_cell = state.config.points_per_cell;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(layout.nope_button, mouse.column, mouse.row) {
                state.fling(false);
                return;
            }
            if hit(layout.like_button, mouse.column, mouse.row) {
                state.fling(true);
                return;
            }
            if hit(layout.card_area, mouse.column, mouse.row) && !state.deck.exhausted() {
                trace!(col = mouse.column, row = mouse.row, "drag begin");
                let mut drag = DragState::begin(mouse.column, mouse.row);
                drag.tracker.push(0.0, Instant::now());
                state.drag = Some(drag);
                state.sampler.publish(PointerEvent {
                    phase: PointerPhase::Began,
                    translation_x: 0.0,
                    translation_y: 0.0,
                    velocity_x: 0.0,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(drag) = &mut state.drag {
                let (dx, dy) = drag.translation(mouse.column, mouse.row, points_per_cell);
                drag.tracker.push(dx, Instant::now());
                state.sampler.publish(PointerEvent {
                    phase: PointerPhase::Changed,
                    translation_x: dx,
                    translation_y: dy,
                    velocity_x: drag.tracker.velocity(),
                });
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(mut drag) = state.drag.take() {
                let (dx, dy) = drag.translation(mouse.column, mouse.row, points_per_cell);
                drag.tracker.push(dx, Instant::now());
                let vx = drag.tracker.velocity();
                trace!(dx, dy, vx, "drag release");
                state.sampler.publish(PointerEvent {
                    phase: PointerPhase::Ended,
                    translation_x: dx,
                    translation_y: dy,
                    velocity_x: vx,
                });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_over_the_window() {
        let mut tracker = DragTracker::default();
        let t0 = Instant::now();
        // 100 points over 100 ms → 1000 points/s.
        tracker.push(0.0, t0);
        tracker.push(50.0, t0 + Duration::from_millis(50));
        tracker.push(100.0, t0 + Duration::from_millis(100));
        assert!((tracker.velocity() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn stale_samples_fall_out_of_the_window() {
        let mut tracker = DragTracker::default();
        let t0 = Instant::now();
        tracker.push(0.0, t0);
        // A long pause, then a slow finish: only the tail counts.
        tracker.push(200.0, t0 + Duration::from_millis(500));
        tracker.push(201.0, t0 + Duration::from_millis(600));
        let v = tracker.velocity();
        assert!(v < 50.0, "stale burst leaked into the estimate: {v}");
    }

    #[test]
    fn single_sample_has_no_velocity() {
        let mut tracker = DragTracker::default();
        tracker.push(40.0, Instant::now());
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn out_of_order_samples_are_ignored() {
        let mut tracker = DragTracker::default();
        let t0 = Instant::now();
        tracker.push(0.0, t0 + Duration::from_millis(50));
        tracker.push(999.0, t0);
        tracker.push(10.0, t0 + Duration::from_millis(100));
        assert!((tracker.velocity() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn translation_scales_cells_to_points() {
        let drag = DragState::begin(40, 10);
        let (dx, dy) = drag.translation(46, 8, 10.0);
        assert_eq!(dx, 60.0);
        assert_eq!(dy, -40.0);
    }
}
