//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).  `advance_frame` is the frame scheduler body: one gesture
//! snapshot in, one render frame out.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ratatui::layout::Rect;
use tracing::debug;

use crate::config::AppConfig;
use crate::core::deck::{self, Deck};
use crate::core::gesture::{GestureSample, GestureSampler};
use crate::core::swipe::{StepReport, SwipeEngine, Verdict};

use super::handler::DragState;

// ───────────────────────────────────────── frame output ──────

/// Motion parameters for painting one card.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardMotion {
    /// Engine points; the widget converts to cells.
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_deg: f64,
    pub like_opacity: f64,
    pub dislike_opacity: f64,
}

impl CardMotion {
    fn at(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            rotate_deg: deck::rotation_deg(x),
            like_opacity: deck::like_opacity(x),
            dislike_opacity: deck::dislike_opacity(x),
        }
    }
}

/// Everything the card surface needs to paint one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Top card index plus its motion.
    pub top: Option<(usize, CardMotion)>,
    /// A committed card still flying off-screen.
    pub flyoff: Option<(usize, CardMotion)>,
    /// Scale of the card beneath the top one.
    pub next_scale: f64,
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self {
            top: None,
            flyoff: None,
            next_scale: 0.8,
        }
    }
}

// ───────────────────────────────────────── state ─────────────

/// Top-level application state.
pub struct AppState {
    /// The card stack; its cursor is the single source of truth for
    /// which card is interactive.
    pub deck: Deck,
    /// Two-axis spring engine for the top card.
    pub engine: SwipeEngine,
    /// Latest-wins gesture sample store.
    pub sampler: GestureSampler,
    /// Physics and interaction tuning.
    pub config: AppConfig,
    /// Derived output of the most recent frame, consumed by the UI.
    pub frame: RenderFrame,
    /// Index of the card currently flying off-screen, if any.
    pub flyoff_card: Option<usize>,
    /// In-progress mouse drag, if any.
    pub drag: Option<DragState>,
    /// Decoded card photos (path → image), loaded once at startup.
    pub photos: HashMap<PathBuf, Arc<image::RgbaImage>>,
    /// Commitment tallies for the status bar.
    pub likes: usize,
    pub passes: usize,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(deck: Deck, config: AppConfig) -> Self {
        let engine = SwipeEngine::new(config.tuning());
        let mut state = Self {
            deck,
            engine,
            sampler: GestureSampler::default(),
            config,
            frame: RenderFrame::default(),
            flyoff_card: None,
            drag: None,
            photos: HashMap::new(),
            likes: 0,
            passes: 0,
            should_quit: false,
            status_message: None,
            terminal_area: Rect::default(),
        };
        // Seed the frame so the first draw shows the stack at rest.
        state.advance_frame(0.0);
        state
    }

    /// Step the engine by one frame and rebuild the render output.
    /// This is the per-tick scheduler body.
    pub fn advance_frame(&mut self, dt: f64) {
        // Once the deck is exhausted further gestures are no-ops; the
        // engine still steps so a final fly-off can finish.
        let sample = if self.deck.exhausted() {
            GestureSample::default()
        } else {
            self.sampler.sample()
        };

        let report = self.engine.step(sample, dt);
        if let Some(verdict) = report.advance {
            self.apply_commitment(verdict);
        }
        self.rebuild_frame(&report);
    }

    /// Programmatic fling from the footer buttons or keyboard.  Ignored
    /// mid-drag (the finger owns the card) and once the deck is empty.
    pub fn fling(&mut self, liked: bool) {
        if self.deck.exhausted() || self.drag.is_some() {
            return;
        }
        let speed = self.config.velocity_threshold * 4.0;
        let vx = if liked { speed } else { -speed };
        if let Some(verdict) = self.engine.fling(vx) {
            self.apply_commitment(verdict);
        }
    }

    fn apply_commitment(&mut self, verdict: Verdict) {
        self.flyoff_card = self.deck.cursor();
        let name = self.deck.top().map(|c| c.name.clone()).unwrap_or_default();
        if !self.deck.advance() {
            return;
        }
        match verdict {
            Verdict::Like => {
                self.likes += 1;
                self.status_message = Some(format!("Liked {name}"));
            }
            Verdict::Dislike => {
                self.passes += 1;
                self.status_message = Some(format!("Passed on {name}"));
            }
            Verdict::SnapBack => {}
        }
        debug!(?verdict, remaining = self.deck.remaining(), "commitment applied");
    }

    fn rebuild_frame(&mut self, report: &StepReport) {
        let top = self
            .deck
            .cursor()
            .map(|i| (i, CardMotion::at(report.x, report.y)));

        let flyoff = match (report.flyoff, self.flyoff_card) {
            (Some((x, y)), Some(i)) => Some((i, CardMotion::at(x, y))),
            _ => {
                self.flyoff_card = None;
                None
            }
        };

        self.frame = RenderFrame {
            top,
            flyoff,
            next_scale: deck::back_scale(report.x),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::Card;
    use crate::core::gesture::{PointerEvent, PointerPhase};

    const DT: f64 = 1.0 / 60.0;

    fn state_with_cards(n: usize) -> AppState {
        let cards = (0..n)
            .map(|id| Card {
                id,
                name: format!("card-{id}"),
                age: 20 + id as u32,
                photo: None,
            })
            .collect();
        AppState::new(Deck::new(cards), AppConfig::default())
    }

    fn publish(state: &mut AppState, phase: PointerPhase, dx: f64, vx: f64) {
        state.sampler.publish(PointerEvent {
            phase,
            translation_x: dx,
            translation_y: 0.0,
            velocity_x: vx,
        });
    }

    #[test]
    fn three_likes_exhaust_a_three_card_deck() {
        let mut state = state_with_cards(3);
        assert_eq!(state.deck.cursor(), Some(2));

        state.fling(true);
        state.fling(true);
        state.fling(true);
        assert!(state.deck.exhausted());
        assert_eq!(state.likes, 3);

        // A fourth commitment attempt is a no-op.
        state.fling(true);
        assert_eq!(state.likes, 3);
        assert!(state.deck.exhausted());

        // The last fly-off finishes and the frame empties out.
        for _ in 0..400 {
            state.advance_frame(DT);
        }
        assert!(state.frame.top.is_none());
        assert!(state.frame.flyoff.is_none());
    }

    #[test]
    fn fast_release_advances_exactly_once() {
        let mut state = state_with_cards(3);

        publish(&mut state, PointerPhase::Began, 0.0, 0.0);
        state.advance_frame(DT);
        publish(&mut state, PointerPhase::Changed, 60.0, 400.0);
        state.advance_frame(DT);
        publish(&mut state, PointerPhase::Ended, 60.0, 400.0);
        for _ in 0..300 {
            state.advance_frame(DT);
        }

        assert_eq!(state.likes, 1);
        assert_eq!(state.deck.cursor(), Some(1));
        // The new top card sits at rest.
        let (index, motion) = state.frame.top.unwrap();
        assert_eq!(index, 1);
        assert_eq!(motion.translate_x, 0.0);
    }

    #[test]
    fn slow_release_snaps_back_without_advancing() {
        let mut state = state_with_cards(3);

        publish(&mut state, PointerPhase::Began, 0.0, 0.0);
        state.advance_frame(DT);
        publish(&mut state, PointerPhase::Changed, 50.0, 0.0);
        state.advance_frame(DT);
        publish(&mut state, PointerPhase::Ended, 50.0, 0.0);
        for _ in 0..400 {
            state.advance_frame(DT);
        }

        assert_eq!(state.likes + state.passes, 0);
        assert_eq!(state.deck.cursor(), Some(2));
        let (_, motion) = state.frame.top.unwrap();
        assert!(motion.translate_x.abs() < 0.01);
        assert!(motion.like_opacity < 0.01);
    }

    #[test]
    fn fling_is_ignored_mid_drag() {
        let mut state = state_with_cards(2);
        publish(&mut state, PointerPhase::Began, 0.0, 0.0);
        state.advance_frame(DT);
        state.drag = Some(super::super::handler::DragState::default());

        state.fling(true);
        assert_eq!(state.likes, 0);
        assert_eq!(state.deck.cursor(), Some(1));
    }
}
