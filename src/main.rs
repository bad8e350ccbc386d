//! A Tinder-style card stack for the terminal.
//!
//! Drag a card with the mouse and fling it right to like or left to
//! pass; a slow release snaps it back to center.  The footer buttons
//! and the arrow keys commit without dragging.

mod app;
mod config;
mod core;
mod ui;

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Alignment,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::deck::{self, Deck};
use crate::ui::{card_widget::DeckWidget, layout::AppLayout, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Card-swipe deck for the terminal")]
struct Cli {
    /// Deck file: one `name,age[,photo]` card per line, last line on
    /// top.  Uses a built-in sample deck when omitted.
    deck: Option<PathBuf>,

    /// Animation frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Skip loading and rendering card photos.
    #[arg(long)]
    no_photos: bool,
}

// ───────────────────────────────────────── photo cache ───────

/// Decode every referenced card photo up front.  Failures are logged
/// and skipped — a missing photo degrades to a plain card.
fn load_photos(deck: &Deck, enabled: bool) -> HashMap<PathBuf, Arc<image::RgbaImage>> {
    let mut photos = HashMap::new();
    if !enabled {
        return photos;
    }
    for index in 0..deck.len() {
        let Some(path) = deck.card(index).and_then(|c| c.photo.clone()) else {
            continue;
        };
        if photos.contains_key(&path) {
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                photos.insert(path, Arc::new(img.to_rgba8()));
            }
            Err(e) => {
                tracing::warn!("failed to load photo {}: {e}", path.display());
            }
        }
    }
    photos
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute the UI
        .init();

    let cli = Cli::parse();

    // ── build the deck ────────────────────────────────────────
    let cards = match &cli.deck {
        Some(path) => deck::load_deck(path)
            .with_context(|| format!("loading deck {}", path.display()))?,
        None => deck::sample_deck(),
    };
    let deck = Deck::new(cards);

    let config = AppConfig::load();
    let mut state = AppState::new(deck, config);
    state.photos = load_photos(&state.deck, !cli.no_photos);

    let fps = cli.fps.clamp(10, 240);
    let frame_period = Duration::from_secs_f64(1.0 / fps as f64);
    let dt = 1.0 / fps as f64;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(frame_period);

    // ── event loop ────────────────────────────────────────────
    loop {
        // Draw first so the UI always reflects the latest frame.
        terminal.draw(|frame| {
            state.terminal_area = frame.area();
            let layout = AppLayout::from_area(frame.area());

            let header = Paragraph::new(env!("CARGO_PKG_NAME"))
                .alignment(Alignment::Center)
                .style(Theme::header_style());
            frame.render_widget(header, layout.header_area);

            frame.render_widget(
                DeckWidget {
                    deck: &state.deck,
                    frame: &state.frame,
                    photos: &state.photos,
                    points_per_cell: state.config.points_per_cell,
                },
                layout.card_area,
            );

            let nope = Paragraph::new("✕ NOPE")
                .alignment(Alignment::Center)
                .style(Theme::nope_button_style())
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(nope, layout.nope_button);
            let like = Paragraph::new("♥ LIKE")
                .alignment(Alignment::Center)
                .style(Theme::like_button_style())
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(like, layout.like_button);

            let tally = format!(
                " ♥ {}  ✕ {}  ·  {} left ",
                state.likes,
                state.passes,
                state.deck.remaining()
            );
            let hint = state
                .status_message
                .as_deref()
                .unwrap_or("drag a card · ←/→ fling · q quit");
            let status = Paragraph::new(format!("{hint}  |{tally}"))
                .style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        // Handle one event, then drain whatever else is queued before
        // the next redraw.
        match events.recv().await {
            Some(event) => apply_event(&mut state, event, dt),
            None => break,
        }
        while let Ok(event) = events.try_recv() {
            apply_event(&mut state, event, dt);
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    println!(
        "liked {} · passed {} · {} left in the deck",
        state.likes,
        state.passes,
        state.deck.remaining()
    );

    Ok(())
}

fn apply_event(state: &mut AppState, event: AppEvent, dt: f64) {
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k),
        AppEvent::Mouse(m) => handler::handle_mouse(state, m),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => state.advance_frame(dt),
    }
}
