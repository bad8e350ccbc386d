//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the engine's per-frame output and turns it into
//! cells on the terminal.  No physics happens here.

pub mod card_widget;
pub mod layout;
pub mod theme;
