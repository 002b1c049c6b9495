#![forbid(unsafe_code)]

//! HSL colors for freshly created elements.

use core::fmt;

/// A CSS `hsl()` color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsl {
    /// Hue in degrees, normalized to `[0, 360)`.
    pub hue: f64,
    /// Saturation percentage, `0..=100`.
    pub saturation: u8,
    /// Lightness percentage, `0..=100`.
    pub lightness: u8,
}

impl Hsl {
    /// Create a color, wrapping the hue and clamping the percentages.
    #[must_use]
    pub fn new(hue: f64, saturation: u8, lightness: u8) -> Self {
        let hue = if hue.is_finite() {
            hue.rem_euclid(360.0)
        } else {
            0.0
        };
        Self {
            hue,
            saturation: saturation.min(100),
            lightness: lightness.min(100),
        }
    }

    /// Render as a CSS color value.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}
