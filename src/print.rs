//! Print Color
//!
//! Bars are filled with a process color. Values are ink percentages.

use serde::{Deserialize, Serialize};

/// CMYK process color, each channel 0-100 percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCmyk")]
pub struct CmykColor {
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub black: f64,
}

/// Unchecked wire form; every deserialized color goes through `CmykColor::new`.
#[derive(Deserialize)]
struct RawCmyk {
    cyan: f64,
    magenta: f64,
    yellow: f64,
    black: f64,
}

impl TryFrom<RawCmyk> for CmykColor {
    type Error = &'static str;

    fn try_from(raw: RawCmyk) -> Result<Self, Self::Error> {
        Self::new(raw.cyan, raw.magenta, raw.yellow, raw.black)
    }
}

impl Default for CmykColor {
    fn default() -> Self {
        Self::registration_black()
    }
}

impl CmykColor {
    /// Pure K black, the only safe bar color for scanning
    pub const fn registration_black() -> Self {
        Self {
            cyan: 0.0,
            magenta: 0.0,
            yellow: 0.0,
            black: 100.0,
        }
    }

    /// Create from user values with validation
    pub fn new(cyan: f64, magenta: f64, yellow: f64, black: f64) -> Result<Self, &'static str> {
        let color = Self { cyan, magenta, yellow, black };
        color.check()?;
        Ok(color)
    }

    /// Every channel must be a percentage. NaN fails the range test.
    pub fn check(&self) -> Result<(), &'static str> {
        let in_range = [self.cyan, self.magenta, self.yellow, self.black]
            .iter()
            .all(|v| (0.0..=100.0).contains(v));
        if in_range {
            Ok(())
        } else {
            Err("Ink values must be between 0 and 100 percent")
        }
    }

    /// Naive device conversion for screen previews such as SVG output.
    pub fn to_rgb(&self) -> [u8; 3] {
        let k = 1.0 - self.black / 100.0;
        let channel = |ink: f64| (255.0 * (1.0 - ink / 100.0) * k).round() as u8;
        [channel(self.cyan), channel(self.magenta), channel(self.yellow)]
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}
