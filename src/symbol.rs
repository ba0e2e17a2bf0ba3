//! Barcode Symbol - Fully Geometric Output
//!
//! A symbol owns its bars and its three labels. Nothing here knows about
//! digits any more; it is handed to a render sink exactly once.

use serde::{Deserialize, Serialize};

use crate::checksum::DigitString;
use crate::encoding::Segment;
use crate::geometry::{Bounds, Point, Transform};
use crate::print::CmykColor;

/// One filled rectangle.
///
/// `origin` is the top-left corner before rotation; the rectangle hangs
/// downward from it and is turned by `rotation` degrees about `origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub color: CmykColor,
    pub kind: Segment,
}

impl Bar {
    /// Corners in drawing order, starting at `origin`.
    pub fn corners(&self) -> [Point; 4] {
        let local = [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, -self.height),
            Point::new(0.0, -self.height),
        ];
        local.map(|p| p.rotated(self.rotation).translated(self.origin.x, self.origin.y))
    }

    pub fn bounds(&self) -> Bounds {
        bounds_of(&self.corners())
    }
}

/// A point-text label under the bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Top-left of the text frame
    pub origin: Point,
    pub font_name: String,
    pub font_size: f64,
    /// Thousandths of an em
    pub tracking: f64,
    /// Percent
    pub horizontal_scale: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Label {
    /// Estimated advance width of the text.
    ///
    /// Digit glyphs are close to half an em wide in lining figures; each
    /// character also carries the tracking.
    pub fn advance(&self) -> f64 {
        let chars = self.text.chars().count() as f64;
        let em = self.font_size * self.horizontal_scale / 100.0;
        chars * (em * 0.5 + self.font_size * self.tracking / 1000.0)
    }

    /// Em box of the frame, `font_size` tall.
    pub fn bounds(&self) -> Bounds {
        let local = [
            Point::new(0.0, 0.0),
            Point::new(self.advance(), 0.0),
            Point::new(self.advance(), -self.font_size),
            Point::new(0.0, -self.font_size),
        ];
        let corners = local.map(|p| p.rotated(self.rotation).translated(self.origin.x, self.origin.y));
        bounds_of(&corners)
    }
}

fn bounds_of(points: &[Point]) -> Bounds {
    points.iter().skip(1).fold(
        Bounds::new(points[0].x, points[0].y, points[0].x, points[0].y),
        |b, p| Bounds::new(b.left.min(p.x), b.top.max(p.y), b.right.max(p.x), b.bottom.min(p.y)),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeSymbol {
    pub code: DigitString,
    pub bars: Vec<Bar>,
    pub labels: [Label; 3],
}

impl BarcodeSymbol {
    /// Union of all bar and label boxes.
    pub fn bounds(&self) -> Bounds {
        let first = self.bars.first().map_or_else(|| self.labels[0].bounds(), Bar::bounds);
        self.bars
            .iter()
            .map(Bar::bounds)
            .chain(self.labels.iter().map(Label::bounds))
            .fold(first, |acc, b| acc.union(&b))
    }

    pub fn guard_bars(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(|b| b.kind == Segment::Guard)
    }

    pub fn digit_bars(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(|b| b.kind == Segment::Digit)
    }
}

impl Transform for Bar {
    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { origin: self.origin.translated(dx, dy), ..self.clone() }
    }

    fn rotated(&self, degrees: f64) -> Self {
        Self {
            origin: self.origin.rotated(degrees),
            rotation: self.rotation + degrees,
            ..self.clone()
        }
    }
}

impl Transform for Label {
    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { origin: self.origin.translated(dx, dy), ..self.clone() }
    }

    fn rotated(&self, degrees: f64) -> Self {
        Self {
            origin: self.origin.rotated(degrees),
            rotation: self.rotation + degrees,
            ..self.clone()
        }
    }
}

impl Transform for BarcodeSymbol {
    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            code: self.code,
            bars: self.bars.iter().map(|b| b.translated(dx, dy)).collect(),
            labels: self.labels.clone().map(|l| l.translated(dx, dy)),
        }
    }

    fn rotated(&self, degrees: f64) -> Self {
        Self {
            code: self.code,
            bars: self.bars.iter().map(|b| b.rotated(degrees)).collect(),
            labels: self.labels.clone().map(|l| l.rotated(degrees)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rotate_about;

    fn bar(x: f64) -> Bar {
        Bar {
            origin: Point::new(x, 0.0),
            width: 1.0,
            height: 10.0,
            rotation: 0.0,
            color: CmykColor::default(),
            kind: Segment::Digit,
        }
    }

    #[test]
    fn test_bar_bounds_unrotated() {
        let b = bar(2.0).bounds();
        assert_eq!(b, Bounds::new(2.0, 0.0, 3.0, -10.0));
    }

    #[test]
    fn test_bar_rotation_quarter_turn() {
        let b = rotate_about(&bar(0.0), Point::new(0.0, 0.0), 90.0);
        assert_eq!(b.rotation, 90.0);
        let bounds = b.bounds();
        // The bar now extends to the right of the origin along +x
        assert!((bounds.left - 0.0).abs() < 1e-9);
        assert!((bounds.right - 10.0).abs() < 1e-9);
        assert!((bounds.top - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_advance_includes_tracking() {
        let label = Label {
            text: "123456".to_string(),
            origin: Point::default(),
            font_name: "MyriadPro-Regular".to_string(),
            font_size: 10.0,
            tracking: 120.0,
            horizontal_scale: 100.0,
            rotation: 0.0,
        };
        // 6 * (5.0 + 1.2)
        assert!((label.advance() - 37.2).abs() < 1e-9);
        assert_eq!(label.bounds().bottom, -10.0);
    }
}
