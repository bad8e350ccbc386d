//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: header bar, card area, footer buttons, and a
/// bottom status bar.
pub struct AppLayout {
    pub header_area: Rect,
    pub card_area: Rect,
    pub footer_area: Rect,
    pub status_area: Rect,
    /// Clickable footer buttons, centred side by side.
    pub nope_button: Rect,
    pub like_button: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header / title bar
                Constraint::Min(8),    // card stack
                Constraint::Length(3), // like / nope buttons
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let footer = chunks[2];
        let (nope_button, like_button) = Self::button_rects(footer);

        Self {
            header_area: chunks[0],
            card_area: chunks[1],
            footer_area: footer,
            status_area: chunks[3],
            nope_button,
            like_button,
        }
    }

    /// Two fixed-width buttons centred in the footer with a gap.
    fn button_rects(footer: Rect) -> (Rect, Rect) {
        const BUTTON_W: u16 = 10;
        const GAP: u16 = 6;

        let total = BUTTON_W * 2 + GAP;
        let left_x = footer.x + footer.width.saturating_sub(total) / 2;
        let nope = Rect::new(left_x, footer.y, BUTTON_W.min(footer.width), footer.height);
        let like = Rect::new(
            (left_x + BUTTON_W + GAP).min(footer.x + footer.width.saturating_sub(1)),
            footer.y,
            BUTTON_W.min(footer.width),
            footer.height,
        );
        (nope, like)
    }
}

/// Is the cell at (`col`, `row`) inside `rect`?
pub fn hit(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
