//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── chrome ─────────────────────────────────────────────────
    pub fn header_style() -> Style {
        Style::default()
            .bg(Color::Rgb(41, 182, 246))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    // ── cards ──────────────────────────────────────────────────
    pub fn card_border_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn back_card_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn card_name_style() -> Style {
        Style::default()
            .fg(Color::Rgb(247, 247, 247))
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_age_style() -> Style {
        Style::default().fg(Color::Rgb(247, 247, 247))
    }

    pub fn exhausted_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── stamps & buttons ───────────────────────────────────────

    /// Style for the LIKE stamp at a given opacity; `None` below the
    /// visibility floor.  Opacity maps to emphasis since terminals have
    /// no alpha: dim → normal → bold+underline.
    pub fn like_stamp_style(opacity: f64) -> Option<Style> {
        Self::stamp_style(opacity, Color::Rgb(102, 187, 106))
    }

    /// Style for the NOPE stamp at a given opacity.
    pub fn nope_stamp_style(opacity: f64) -> Option<Style> {
        Self::stamp_style(opacity, Color::Rgb(229, 57, 53))
    }

    fn stamp_style(opacity: f64, color: Color) -> Option<Style> {
        if opacity < 0.05 {
            return None;
        }
        let style = Style::default().fg(color);
        Some(if opacity < 0.4 {
            style.add_modifier(Modifier::DIM)
        } else if opacity < 0.75 {
            style
        } else {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        })
    }

    pub fn like_button_style() -> Style {
        Style::default()
            .fg(Color::Rgb(102, 187, 106))
            .add_modifier(Modifier::BOLD)
    }

    pub fn nope_button_style() -> Style {
        Style::default()
            .fg(Color::Rgb(229, 57, 53))
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_fade_in_steps() {
        assert!(Theme::like_stamp_style(0.0).is_none());
        assert!(Theme::like_stamp_style(0.04).is_none());

        let dim = Theme::like_stamp_style(0.2).unwrap();
        assert!(dim.add_modifier.contains(Modifier::DIM));

        let full = Theme::nope_stamp_style(1.0).unwrap();
        assert!(full.add_modifier.contains(Modifier::BOLD));
    }
}
