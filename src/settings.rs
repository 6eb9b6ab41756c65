//! Teleprompter session settings
//!
//! Everything `configure` needs besides the script text. Settings are plain
//! serde data so a host can hand them over as JSON from its own settings store;
//! `validate` is the configuration boundary for the timing math.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Lowest accepted reading pace
pub const MIN_WORDS_PER_MINUTE: u32 = 1;

/// Highest accepted reading pace
pub const MAX_WORDS_PER_MINUTE: u32 = 10_000;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleprompterSettings {
    /// Reading pace in words per minute
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
    /// Pre-roll countdown length in seconds (0 = start immediately)
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,
    /// Presentation timer length, shown as remaining time
    #[serde(default)]
    pub timer_duration_seconds: Option<u32>,
    /// Scroll speed for segments without an explicit duration (px/s)
    #[serde(default = "default_scroll_speed")]
    pub default_scroll_speed: f32,
    /// Font size in logical pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Surface opacity (0.0 - 1.0)
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Dark mode style flag
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    /// Playback clock tick interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_words_per_minute() -> u32 {
    150
}

fn default_countdown_seconds() -> u32 {
    3
}

fn default_scroll_speed() -> f32 {
    30.0
}

fn default_font_size() -> u32 {
    16
}

fn default_opacity() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    // ~30 ticks per second
    33
}

impl Default for TeleprompterSettings {
    fn default() -> Self {
        Self {
            words_per_minute: default_words_per_minute(),
            countdown_seconds: default_countdown_seconds(),
            timer_duration_seconds: None,
            default_scroll_speed: default_scroll_speed(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            dark_mode: true,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl TeleprompterSettings {
    /// Check the preconditions the timing math relies on
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (MIN_WORDS_PER_MINUTE..=MAX_WORDS_PER_MINUTE).contains(&self.words_per_minute),
            "words per minute must be within {}..={}, got {}",
            MIN_WORDS_PER_MINUTE,
            MAX_WORDS_PER_MINUTE,
            self.words_per_minute
        );
        ensure!(
            self.default_scroll_speed.is_finite() && self.default_scroll_speed > 0.0,
            "default scroll speed must be a positive number, got {}",
            self.default_scroll_speed
        );
        ensure!(self.font_size > 0, "font size must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.opacity),
            "opacity must be within 0.0..=1.0, got {}",
            self.opacity
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).context("Failed to parse teleprompter settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_json(&content)
    }
}
