//! The card stack — profile data, the top-of-stack cursor, and the
//! derived visual parameters the render surface consumes.
//!
//! The deck owns the immutable card list and the cursor as the single
//! source of truth; the cursor only ever moves through [`Deck::advance`].
//! Derived values (rotation, back-card scale, stamp opacities) are pure
//! functions of the top card's spring position.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::interp::interpolate;

// ───────────────────────────────────────── card data ─────────

/// One profile card.  Immutable once the deck is built.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: usize,
    pub name: String,
    pub age: u32,
    /// Optional photo path, consumed by the render surface only.
    pub photo: Option<PathBuf>,
}

// ───────────────────────────────────────── deck ──────────────

/// Ordered card stack with a monotonically decreasing top cursor.
///
/// The last card in the list is the top of the stack (the interactive
/// one); `advance` walks toward index 0 and saturates at exhausted.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    /// Index of the top card; `None` once every card is dismissed.
    cursor: Option<usize>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        let cursor = cards.len().checked_sub(1);
        Self { cards, cursor }
    }

    /// The currently interactive top card.
    pub fn top(&self) -> Option<&Card> {
        self.cursor.map(|i| &self.cards[i])
    }

    /// The card rendered beneath the top one.
    pub fn below_top(&self) -> Option<&Card> {
        match self.cursor {
            Some(i) if i > 0 => Some(&self.cards[i - 1]),
            _ => None,
        }
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards not yet dismissed (including the top one).
    pub fn remaining(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }

    pub fn exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    /// Dismiss the top card.  Saturates: once exhausted this is a no-op.
    /// Returns whether the cursor actually moved.
    pub fn advance(&mut self) -> bool {
        match self.cursor {
            None => false,
            Some(0) => {
                self.cursor = None;
                true
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                true
            }
        }
    }
}

// ───────────────────────────────────────── derived views ─────

/// Card tilt in degrees for a horizontal spring position.
pub fn rotation_deg(position_x: f64) -> f64 {
    interpolate(position_x, &[-100.0, 100.0], &[-6.0, 6.0])
}

/// Scale of the card beneath the top one: grows back toward full size as
/// the top card leaves the center.
pub fn back_scale(position_x: f64) -> f64 {
    interpolate(position_x, &[-300.0, 0.0, 300.0], &[1.0, 0.8, 1.0])
}

/// Opacity of the LIKE stamp (rightward drag).
pub fn like_opacity(position_x: f64) -> f64 {
    interpolate(position_x, &[-100.0, 0.0, 100.0], &[0.0, 0.0, 1.0])
}

/// Opacity of the NOPE stamp (leftward drag).
pub fn dislike_opacity(position_x: f64) -> f64 {
    interpolate(position_x, &[-100.0, 0.0, 100.0], &[1.0, 0.0, 0.0])
}

// ───────────────────────────────────────── deck loading ──────

/// Errors from reading a deck file.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `name,age[,photo]`, got {text:?}")]
    Malformed { line: usize, text: String },
    #[error("line {line}: invalid age {text:?}")]
    Age { line: usize, text: String },
    #[error("deck file contains no cards")]
    Empty,
}

/// Parse a deck file: one `name,age[,photo]` card per line, `#` comments
/// and blank lines skipped.  Photo paths are resolved relative to the
/// deck file's directory.
pub fn load_deck(path: &Path) -> Result<Vec<Card>, DeckError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let cards = parse_deck(&contents, base)?;
    if cards.is_empty() {
        return Err(DeckError::Empty);
    }
    Ok(cards)
}

fn parse_deck(contents: &str, base: &Path) -> Result<Vec<Card>, DeckError> {
    let mut cards = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut fields = text.splitn(3, ',').map(str::trim);
        let name = fields.next().filter(|n| !n.is_empty()).ok_or_else(|| {
            DeckError::Malformed {
                line,
                text: text.to_string(),
            }
        })?;
        let age_text = fields.next().ok_or_else(|| DeckError::Malformed {
            line,
            text: text.to_string(),
        })?;
        let age = age_text.parse::<u32>().map_err(|_| DeckError::Age {
            line,
            text: age_text.to_string(),
        })?;
        let photo = fields
            .next()
            .filter(|p| !p.is_empty())
            .map(|p| base.join(p));

        cards.push(Card {
            id: cards.len(),
            name: name.to_string(),
            age,
            photo,
        });
    }

    Ok(cards)
}

/// Built-in deck used when no deck file is given.
pub fn sample_deck() -> Vec<Card> {
    let people: &[(&str, u32)] = &[
        ("Noah", 31),
        ("Ava", 26),
        ("Liam", 29),
        ("Maya", 24),
        ("Sofia", 27),
    ];
    people
        .iter()
        .enumerate()
        .map(|(id, &(name, age))| Card {
            id,
            name: name.to_string(),
            age,
            photo: None,
        })
        .collect()
}
