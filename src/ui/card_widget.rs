//! The card stack surface.
//!
//! Paints the next card scaled beneath, the interactive top card
//! translated and sheared by its spring position, the LIKE/NOPE stamps,
//! and any committed card still flying off-screen.  Cards are drawn by
//! hand into the buffer so they can sit at fractional offsets the stock
//! block widgets cannot express.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::app::state::{CardMotion, RenderFrame};
use crate::core::deck::{Card, Deck};
use crate::ui::theme::Theme;

/// The full stack for one frame.
pub struct DeckWidget<'a> {
    pub deck: &'a Deck,
    pub frame: &'a RenderFrame,
    pub photos: &'a HashMap<PathBuf, Arc<image::RgbaImage>>,
    /// Engine points per horizontal cell (vertical uses twice this).
    pub points_per_cell: f64,
}

impl Widget for DeckWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 12 || area.height < 6 {
            return;
        }
        let base = card_rect(area);

        if self.deck.exhausted() && self.frame.flyoff.is_none() {
            let message = Paragraph::new("No more cards\n\npress q to quit")
                .alignment(Alignment::Center)
                .style(Theme::exhausted_style());
            let mid = Rect::new(area.x, area.y + area.height / 2 - 1, area.width, 3);
            message.render(mid, buf);
            return;
        }

        // Back card first, scaled toward full size as the top card
        // leaves the center.
        if let Some(card) = self.deck.below_top() {
            let scaled = scale_rect(base, self.frame.next_scale);
            self.draw_card(buf, area, scaled, CardMotion::default(), card, false);
        }

        // The interactive top card.
        if let Some((index, motion)) = self.frame.top {
            if let Some(card) = self.deck.card(index) {
                self.draw_card(buf, area, base, motion, card, true);
            }
        }

        // A committed card still flying off draws above everything.
        if let Some((index, motion)) = self.frame.flyoff {
            if let Some(card) = self.deck.card(index) {
                self.draw_card(buf, area, base, motion, card, true);
            }
        }
    }
}

impl DeckWidget<'_> {
    /// Paint one card: border, photo, name/age, stamps.  `motion`
    /// offsets the whole card and shears its rows to suggest rotation.
    fn draw_card(
        &self,
        buf: &mut Buffer,
        clip: Rect,
        rect: Rect,
        motion: CardMotion,
        card: &Card,
        is_top: bool,
    ) {
        let dx = (motion.translate_x / self.points_per_cell).round() as i32;
        let dy = (motion.translate_y / (self.points_per_cell * 2.0)).round() as i32;

        // Per-row horizontal shift; the 0.5 compensates for cells being
        // about twice as tall as wide.
        let shear = motion.rotate_deg.to_radians().tan() * 0.5;

        let w = rect.width as i32;
        let h = rect.height as i32;
        let mid_row = h as f64 / 2.0;
        let border = if is_top {
            Theme::card_border_style()
        } else {
            Theme::back_card_border_style()
        };

        let row_shift =
            |row: i32| -> i32 { (shear * (row as f64 - mid_row)).round() as i32 };

        for row in 0..h {
            let y = rect.y as i32 + dy + row;
            let x0 = rect.x as i32 + dx + row_shift(row);

            if row == 0 || row == h - 1 {
                let (l, m, r) = if row == 0 {
                    ('╭', '─', '╮')
                } else {
                    ('╰', '─', '╯')
                };
                put(buf, clip, x0, y, l, border);
                for col in 1..w - 1 {
                    put(buf, clip, x0 + col, y, m, border);
                }
                put(buf, clip, x0 + w - 1, y, r, border);
            } else {
                put(buf, clip, x0, y, '│', border);
                for col in 1..w - 1 {
                    put(buf, clip, x0 + col, y, ' ', Style::default());
                }
                put(buf, clip, x0 + w - 1, y, '│', border);
            }
        }

        // Photo fills the interior above the caption rows.
        let photo_rows = (h - 5).max(0) as u16;
        if photo_rows > 1 && w > 4 {
            if let Some(img) = card.photo.as_ref().and_then(|p| self.photos.get(p)) {
                self.draw_photo(buf, clip, rect, dx, dy, &row_shift, img, photo_rows);
            }
        }

        // Caption: name above age, anchored bottom-left.
        let caption_w = (w - 4).max(0) as usize;
        if caption_w > 0 && h > 4 {
            let name_row = h - 3;
            let age_row = h - 2;
            put_str(
                buf,
                clip,
                rect.x as i32 + dx + row_shift(name_row) + 2,
                rect.y as i32 + dy + name_row,
                &truncate(&card.name, caption_w),
                Theme::card_name_style(),
            );
            put_str(
                buf,
                clip,
                rect.x as i32 + dx + row_shift(age_row) + 2,
                rect.y as i32 + dy + age_row,
                &truncate(&card.age.to_string(), caption_w),
                Theme::card_age_style(),
            );
        }

        // Stamps fade in with the drag direction (top card only).
        if is_top && h > 2 && w > 14 {
            let stamp_row = 1;
            let y = rect.y as i32 + dy + stamp_row;
            if let Some(style) = Theme::like_stamp_style(motion.like_opacity) {
                put_str(
                    buf,
                    clip,
                    rect.x as i32 + dx + row_shift(stamp_row) + 2,
                    y,
                    "LIKE",
                    style,
                );
            }
            if let Some(style) = Theme::nope_stamp_style(motion.dislike_opacity) {
                put_str(
                    buf,
                    clip,
                    rect.x as i32 + dx + row_shift(stamp_row) + w - 6,
                    y,
                    "NOPE",
                    style,
                );
            }
        }
    }

    /// Render the card photo with Unicode `▀` half-blocks (2 pixels per
    /// cell), sheared row by row along with the card.
    #[allow(clippy::too_many_arguments)]
    fn draw_photo(
        &self,
        buf: &mut Buffer,
        clip: Rect,
        rect: Rect,
        dx: i32,
        dy: i32,
        row_shift: &dyn Fn(i32) -> i32,
        img: &image::RgbaImage,
        photo_rows: u16,
    ) {
        use image::imageops::FilterType;
        use ratatui::style::Color;

        let inner_w = rect.width.saturating_sub(2);
        if inner_w == 0 || img.width() == 0 || img.height() == 0 {
            return;
        }

        // Pixel budget: one column per cell, two rows of pixels per cell.
        let max_px_w = inner_w as f64;
        let max_px_h = photo_rows as f64 * 2.0;
        let scale = (max_px_w / img.width() as f64).min(max_px_h / img.height() as f64);
        let fit_w = (img.width() as f64 * scale).round().max(1.0) as u32;
        let fit_h = (img.height() as f64 * scale).round().max(1.0) as u32;
        let rgba = image::imageops::resize(img, fit_w, fit_h, FilterType::Triangle);

        let col_offset = (inner_w.saturating_sub(rgba.width() as u16)) / 2;
        for row in 0..photo_rows as i32 {
            let yt = (row as u32) * 2;
            if yt >= rgba.height() {
                break;
            }
            let yb = yt + 1;
            let card_row = row + 1; // inside the border
            let y = rect.y as i32 + dy + card_row;
            let x_base = rect.x as i32 + dx + row_shift(card_row) + 1 + col_offset as i32;

            for col in 0..rgba.width().min(inner_w as u32) {
                let t = rgba.get_pixel(col, yt);
                let fg = Color::Rgb(t[0], t[1], t[2]);
                let bg = if yb < rgba.height() {
                    let b = rgba.get_pixel(col, yb);
                    Color::Rgb(b[0], b[1], b[2])
                } else {
                    Color::Reset
                };
                put(
                    buf,
                    clip,
                    x_base + col as i32,
                    y,
                    '▀',
                    Style::default().fg(fg).bg(bg),
                );
            }
        }
    }
}

// ───────────────────────────────────────── geometry ──────────

/// The resting card rectangle, centred in the card area.
fn card_rect(area: Rect) -> Rect {
    let w = (area.width * 3 / 5).clamp(20, 44).min(area.width);
    let h = area.height.saturating_sub(2).max(6);
    Rect::new(
        area.x + (area.width.saturating_sub(w)) / 2,
        area.y + 1,
        w,
        h,
    )
}

/// Shrink `rect` around its centre by `scale` (≤ 1).
fn scale_rect(rect: Rect, scale: f64) -> Rect {
    let scale = scale.clamp(0.0, 1.0);
    let w = ((rect.width as f64 * scale).round() as u16).max(4);
    let h = ((rect.height as f64 * scale).round() as u16).max(3);
    Rect::new(
        rect.x + (rect.width.saturating_sub(w)) / 2,
        rect.y + (rect.height.saturating_sub(h)) / 2,
        w,
        h,
    )
}

/// Write one char at an absolute cell position, clipped to `clip`.
fn put(buf: &mut Buffer, clip: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < clip.x as i32
        || y < clip.y as i32
        || x >= clip.x as i32 + clip.width as i32
        || y >= clip.y as i32 + clip.height as i32
    {
        return;
    }
    if let Some(cell) = buf.cell_mut(Position::new(x as u16, y as u16)) {
        cell.set_char(ch).set_style(style);
    }
}

fn put_str(buf: &mut Buffer, clip: Rect, x: i32, y: i32, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        put(buf, clip, x + i as i32, y, ch, style);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_rect_is_centred_and_bounded() {
        let area = Rect::new(0, 1, 80, 20);
        let rect = card_rect(area);
        assert!(rect.width <= 44);
        assert!(rect.x >= area.x);
        assert!(rect.right() <= area.right());
    }

    #[test]
    fn scale_rect_shrinks_around_centre() {
        let rect = Rect::new(10, 10, 40, 20);
        let scaled = scale_rect(rect, 0.8);
        assert_eq!(scaled.width, 32);
        assert_eq!(scaled.height, 16);
        assert!(scaled.x > rect.x);
        assert!(scaled.y > rect.y);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Alexandra", 6), "Alexa…");
        assert_eq!(truncate("Ava", 6), "Ava");
    }
}
