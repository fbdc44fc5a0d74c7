//! Run configuration.
//!
//! A [`Config`] is built once at startup (defaults, optionally a JSON file, then
//! command line overrides), validated, and never changed afterwards.

use crate::error::{RainError, Result};
use crate::rendering::color::Color;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Largest accepted `symbolFontSize`.
pub const MAX_FONT_SIZE: u32 = 1024;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Number of falling columns.
    pub max_symbol_count: usize,
    /// Alpha of the background wash painted before every draw. Lower means longer trails.
    pub symbol_alpha_fade_rate: f64,
    /// Glyph size in virtual pixels. On a terminal this is also the cell size.
    pub symbol_font_size: u32,
    pub symbol_font_family: String,
    pub symbol_color_foreground: Color,
    pub symbol_color_fade: Color,
    pub canvas_background_color: Color,
    /// Ticks per second. Columns advance on every other tick.
    pub frame_rate_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_symbol_count: 60,
            symbol_alpha_fade_rate: 0.05,
            symbol_font_size: 16,
            symbol_font_family: "monospace".to_string(),
            symbol_color_foreground: Color::rgb(0, 255, 0),
            symbol_color_fade: Color::rgb(255, 255, 255),
            canvas_background_color: Color::rgb(0, 0, 0),
            frame_rate_per_second: 30,
        }
    }
}

impl Config {
    /// Reads a (possibly partial) config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| RainError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_symbol_count == 0 {
            return Err(RainError::invalid("maxSymbolCount", "must be greater than 0"));
        }
        if !(self.symbol_alpha_fade_rate > 0.0 && self.symbol_alpha_fade_rate <= 1.0) {
            return Err(RainError::invalid(
                "symbolAlphaFadeRate",
                format!("{} is not in (0, 1]", self.symbol_alpha_fade_rate),
            ));
        }
        if self.symbol_font_size == 0 || self.symbol_font_size > MAX_FONT_SIZE {
            return Err(RainError::invalid(
                "symbolFontSize",
                format!("{} is not in 1..={MAX_FONT_SIZE}", self.symbol_font_size),
            ));
        }
        if self.frame_rate_per_second == 0 {
            return Err(RainError::invalid(
                "frameRatePerSecond",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Minimum time between two ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate_per_second.max(1) as f64)
    }
}
