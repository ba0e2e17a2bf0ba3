//! Source Text Runs
//!
//! What the host document exposes about each text frame. Only runs whose
//! contents are exactly 13 ASCII digits, in a visible and unlocked
//! container, are barcode candidates.

use serde::{Deserialize, Serialize};

use crate::checksum::DigitString;
use crate::geometry::{Point, TextMatrix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    /// Host handle, used to remove the run after emission
    pub id: String,
    pub contents: String,
    pub anchor: Point,
    #[serde(default)]
    pub matrix: TextMatrix,
    /// Point size of the text
    pub font_size: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool { true }

impl TextRun {
    pub fn new(id: impl Into<String>, contents: impl Into<String>, anchor: Point, font_size: f64) -> Self {
        Self {
            id: id.into(),
            contents: contents.into(),
            anchor,
            matrix: TextMatrix::identity(),
            font_size,
            locked: false,
            visible: true,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.matrix = TextMatrix::rotation(degrees);
        self
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.matrix.rotation_degrees()
    }

    pub fn is_editable(&self) -> bool {
        self.visible && !self.locked
    }

    /// A size the symbol can be scaled from: finite and above zero.
    pub fn has_usable_size(&self) -> bool {
        self.font_size.is_finite() && self.font_size > 0.0
    }
}

/// A run that qualifies for barcode replacement, with its parsed digits.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub run: &'a TextRun,
    pub code: DigitString,
}

/// Pick candidates in input order. Everything else is silently skipped.
pub fn select_candidates(runs: &[TextRun]) -> Vec<Candidate<'_>> {
    runs.iter()
        .filter(|run| run.is_editable() && run.has_usable_size())
        .filter_map(|run| {
            DigitString::parse(&run.contents)
                .ok()
                .map(|code| Candidate { run, code })
        })
        .collect()
}
