//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task
//! that forwards them over a channel so the main loop stays non-blocking.
//! A `Tick` is emitted once per display frame even while input events are
//! flooding in — the tick is the animation heartbeat, so it must never be
//! starved by a fast mouse drag.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// One display frame has elapsed.
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends
/// them through the returned channel, interleaving `Tick`s at
/// `frame_period`.
pub fn spawn_event_reader(frame_period: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut next_tick = Instant::now() + frame_period;
        loop {
            // Poll only until the next frame boundary so ticks keep
            // flowing under continuous input.
            let timeout = next_tick.saturating_duration_since(Instant::now());
            let has_event = event::poll(timeout).unwrap_or(false);
            if has_event {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => AppEvent::Key(k),
                        CtEvent::Mouse(m) => AppEvent::Mouse(m),
                        CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if tx.send(app_event).is_err() {
                        break; // receiver dropped
                    }
                }
            }

            if Instant::now() >= next_tick {
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
                next_tick += frame_period;
                // After a stall, skip missed frames instead of bursting.
                if next_tick < Instant::now() {
                    next_tick = Instant::now() + frame_period;
                }
            }
        }
    });

    rx
}
