//! Color and font values for the rain.
//!
//! Colors are plain RGB triples with an optional alpha. The alpha is only
//! meaningful for fills: a translucent fill blends what is already on the
//! surface toward the fill color, which is what produces the fading trails.

use crate::error::RainError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// An RGB color with optional alpha.
///
/// # Example
///
/// ```rust
/// use glyphrain::rendering::color::Color;
///
/// let green: Color = "0,255,0".parse().unwrap();
/// assert_eq!(green, Color::rgb(0, 255, 0));
/// assert_eq!(green.to_string(), "rgba(0, 255, 0, 1)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default)]
    pub alpha: Option<f64>,
}

impl Color {
    /// Creates an opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: None,
        }
    }

    /// Returns the same color with the alpha replaced.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            ..self
        }
    }

    /// The alpha a fill with this color is drawn with.
    ///
    /// A missing or zero alpha counts as fully opaque.
    pub fn effective_alpha(self) -> f64 {
        match self.alpha {
            Some(a) if a != 0.0 => a.clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// The color channels as an array, ignoring alpha.
    pub fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red,
            self.green,
            self.blue,
            self.effective_alpha()
        )
    }
}

impl FromStr for Color {
    type Err = RainError;

    /// Accepts `r,g,b`, `r,g,b,a`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(s);

        let parts = inner.split(',').map(str::trim).collect::<Vec<_>>();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(RainError::invalid(
                "color",
                format!("expected 3 or 4 components in `{s}`"),
            ));
        }

        let channel = |part: &str| {
            part.parse::<u8>().map_err(|_| {
                RainError::invalid("color", format!("`{part}` is not a channel value (0-255)"))
            })
        };
        let mut color = Color::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        if let Some(alpha) = parts.get(3) {
            let alpha = alpha
                .parse::<f64>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
                .ok_or_else(|| {
                    RainError::invalid("color", format!("`{alpha}` is not an alpha in 0-1"))
                })?;
            color = color.with_alpha(alpha);
        }
        Ok(color)
    }
}

fn parse_hex(hex: &str) -> Result<Color, RainError> {
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(RainError::invalid(
            "color",
            format!("`#{hex}` is not a #rrggbb color"),
        ));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| RainError::invalid("color", format!("`#{hex}` is not a #rrggbb color")))
    };
    Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Text styling used for glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Size in (virtual) pixels.
    pub size: u32,
    pub family: String,
}

impl Font {
    pub fn new(size: u32, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size, self.family)
    }
}

/// Linearly interpolate between two colors.
/// Uses RGB color space and truncates, so repeated blends always reach a darker target.
pub fn lerp_color(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t) as u8;
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_css() {
        assert_eq!(Color::rgb(255, 255, 255).to_string(), "rgba(255, 255, 255, 1)");
        assert_eq!(
            Color::rgb(0, 0, 0).with_alpha(0.05).to_string(),
            "rgba(0, 0, 0, 0.05)"
        );
        // zero alpha is treated as "unset"
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(0.0).effective_alpha(), 1.0);
        assert_eq!(Font::new(16, "monospace").to_string(), "16px monospace");
    }

    #[test]
    fn parses_all_notations() {
        assert_eq!("0, 255, 0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("rgb(1,2,3)".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!(
            "rgba(1, 2, 3, 0.5)".parse::<Color>().unwrap(),
            Color::rgb(1, 2, 3).with_alpha(0.5)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("256,0,0".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("1,2,3,1.5".parse::<Color>().is_err());
    }

    #[test]
    fn lerp_reaches_black() {
        let mut c = [255, 255, 255];
        for _ in 0..500 {
            c = lerp_color(c, [0, 0, 0], 0.05);
        }
        assert_eq!(c, [0, 0, 0]);
        assert_eq!(lerp_color([0, 100, 200], [100, 100, 100], 0.5), [50, 100, 150]);
    }
}
