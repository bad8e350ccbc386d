//! User configuration — physics and interaction tuning.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/swipe-deck/config.toml` (default
//! `~/.config/swipe-deck/config.toml`).  Missing file or missing keys
//! fall back to the built-in defaults; unknown keys are ignored.

use std::path::PathBuf;

use crate::core::spring::SpringConfig;
use crate::core::swipe::SwipeTuning;

/// Tunable interaction parameters.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub stiffness: f64,
    pub mass: f64,
    pub damping: f64,
    /// Horizontal release speed (points/s) past which a fling commits.
    pub velocity_threshold: f64,
    /// X displacement at which a card counts as fully dismissed.
    pub offscreen_distance: f64,
    /// Engine points per terminal cell (horizontal).  Vertical movement
    /// uses twice this, since cells are roughly twice as tall as wide.
    pub points_per_cell: f64,
    /// Simulated seconds after which a spring is forced to rest.
    pub max_settle_secs: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            mass: 1.0,
            damping: 10.0,
            velocity_threshold: 100.0,
            offscreen_distance: 500.0,
            points_per_cell: 10.0,
            max_settle_secs: 10.0,
        }
    }
}

impl AppConfig {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self::default()
    }

    /// Bundle the physics knobs into the engine's tuning struct.
    pub fn tuning(&self) -> SwipeTuning {
        SwipeTuning {
            spring: SpringConfig {
                stiffness: self.stiffness,
                mass: self.mass,
                damping: self.damping,
                max_settle_secs: self.max_settle_secs,
                ..SpringConfig::default()
            },
            velocity_threshold: self.velocity_threshold,
            offscreen_distance: self.offscreen_distance,
        }
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let Ok(value) = value.trim().parse::<f64>() else {
                continue;
            };
            if !value.is_finite() || value <= 0.0 {
                continue;
            }

            match key {
                "stiffness" => config.stiffness = value,
                "mass" => config.mass = value,
                "damping" => config.damping = value,
                "velocity_threshold" => config.velocity_threshold = value,
                "offscreen_distance" => config.offscreen_distance = value,
                "points_per_cell" => config.points_per_cell = value,
                "max_settle_secs" => config.max_settle_secs = value,
                _ => {}
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/swipe-deck/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("swipe-deck").join("config.toml")
}
