//! Layout - Module Runs to Absolute Geometry
//!
//! The symbol is laid out in its own frame first: origin at the top of the
//! bars, bars hanging downward. Placement onto the source text happens last.

use serde::{Deserialize, Serialize};

use crate::checksum::DigitString;
use crate::encoding::{ModuleSequence, Segment};
use crate::geometry::{rotate_about, Point, Transform};
use crate::print::CmykColor;
use crate::symbol::{Bar, BarcodeSymbol, Label};

/// Geometry constants. Defaults reproduce the production artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Symbol width per point of source font size
    #[serde(default = "default_width_per_point")]
    pub width_per_point: f64,
    /// Module unit as a fraction of symbol width
    #[serde(default = "default_module_scale")]
    pub module_scale: f64,
    /// Bar height as a fraction of symbol width
    #[serde(default = "default_height_ratio")]
    pub height_ratio: f64,
    #[serde(default = "default_guard_height_factor")]
    pub guard_height_factor: f64,
    /// Empty modules left of the start guard
    #[serde(default = "default_guard_inset")]
    pub guard_inset_modules: f64,
    /// Label font size in module units
    #[serde(default = "default_label_font_factor")]
    pub label_font_factor: f64,
    #[serde(default = "default_label_tracking")]
    pub label_tracking: f64,
    #[serde(default = "default_horizontal_scale")]
    pub label_horizontal_scale: f64,
    /// Label top edge as a fraction of bar height (negative is below)
    #[serde(default = "default_label_top_factor")]
    pub label_top_factor: f64,
    /// Left edges of the three labels, in modules from the symbol origin
    #[serde(default = "default_label_offsets")]
    pub label_offsets: [f64; 3],
    /// Distance from the text anchor to the symbol's left edge, as a
    /// fraction of symbol width
    #[serde(default = "default_anchor_offset")]
    pub anchor_offset_ratio: f64,
}

fn default_width_per_point() -> f64 { 23.0 }
fn default_module_scale() -> f64 { 0.00346 }
fn default_height_ratio() -> f64 { 0.1 }
fn default_guard_height_factor() -> f64 { 1.15 }
fn default_guard_inset() -> f64 { 1.0 }
fn default_label_font_factor() -> f64 { 11.0 }
fn default_label_tracking() -> f64 { 120.0 }
fn default_horizontal_scale() -> f64 { 100.0 }
fn default_label_top_factor() -> f64 { -0.99 }
fn default_label_offsets() -> [f64; 3] { [-8.0, 5.0, 52.0] }
fn default_anchor_offset() -> f64 { 0.1 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_per_point: default_width_per_point(),
            module_scale: default_module_scale(),
            height_ratio: default_height_ratio(),
            guard_height_factor: default_guard_height_factor(),
            guard_inset_modules: default_guard_inset(),
            label_font_factor: default_label_font_factor(),
            label_tracking: default_label_tracking(),
            label_horizontal_scale: default_horizontal_scale(),
            label_top_factor: default_label_top_factor(),
            label_offsets: default_label_offsets(),
            anchor_offset_ratio: default_anchor_offset(),
        }
    }
}

/// Scalars derived from one nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub width: f64,
    pub module_unit: f64,
    pub bar_height: f64,
    pub guard_height: f64,
    pub font_size: f64,
}

impl LayoutGeometry {
    pub fn from_width(width: f64, config: &LayoutConfig) -> Self {
        let module_unit = width * config.module_scale;
        let bar_height = width * config.height_ratio;
        Self {
            width,
            module_unit,
            bar_height,
            guard_height: bar_height * config.guard_height_factor,
            font_size: module_unit * config.label_font_factor,
        }
    }

    /// Geometry for a symbol replacing text of the given point size.
    pub fn from_font_size(font_size: f64, config: &LayoutConfig) -> Self {
        Self::from_width(font_size * config.width_per_point, config)
    }
}

/// Turn every filled run into a bar. Pure.
pub fn assemble_bars(
    sequence: &ModuleSequence,
    geometry: &LayoutGeometry,
    config: &LayoutConfig,
    color: CmykColor,
) -> Vec<Bar> {
    let unit = geometry.module_unit;
    sequence
        .bars()
        .map(|run| Bar {
            origin: Point::new((config.guard_inset_modules + f64::from(run.start)) * unit, 0.0),
            width: f64::from(run.width) * unit,
            height: match run.segment {
                Segment::Guard => geometry.guard_height,
                Segment::Digit => geometry.bar_height,
            },
            rotation: 0.0,
            color,
            kind: run.segment,
        })
        .collect()
}

/// Number-system digit, left group, right group.
pub fn place_labels(
    code: &DigitString,
    geometry: &LayoutGeometry,
    config: &LayoutConfig,
    font_name: &str,
) -> [Label; 3] {
    let top = geometry.bar_height * config.label_top_factor;
    let [system_x, left_x, right_x] = config.label_offsets;

    let label = |text: String, offset: f64| Label {
        text,
        origin: Point::new(offset * geometry.module_unit, top),
        font_name: font_name.to_string(),
        font_size: geometry.font_size,
        tracking: config.label_tracking,
        horizontal_scale: config.label_horizontal_scale,
        rotation: 0.0,
    };

    [
        label(code.slice_text(0..1), system_x),
        label(code.slice_text(1..7), left_x),
        label(code.slice_text(7..13), right_x),
    ]
}

/// Move a symbol from its own frame onto the source text and turn it.
///
/// The bounding box's left edge lands at `anchor.x - width * ratio` and its
/// bottom on the anchor's baseline; then the symbol is rotated about the
/// anchor.
pub fn orient(
    symbol: &BarcodeSymbol,
    anchor: Point,
    degrees: f64,
    geometry: &LayoutGeometry,
    config: &LayoutConfig,
) -> BarcodeSymbol {
    let bounds = symbol.bounds();
    let target_left = anchor.x - geometry.width * config.anchor_offset_ratio;
    let target_top = anchor.y + bounds.height();

    let placed = symbol.translated(target_left - bounds.left, target_top - bounds.top);
    rotate_about(&placed, anchor, degrees)
}
