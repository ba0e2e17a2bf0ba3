//! SVG Sink - Standalone Preview Output
//!
//! Writes what a host document would receive into an SVG document.
//! Document coordinates are y-up; SVG is y-down, so y and angles flip.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::geometry::Bounds;
use crate::sink::{RenderSink, SinkError};
use crate::source::TextRun;
use crate::symbol::{Bar, Label};

#[derive(Debug, Clone, Default)]
pub struct SvgSink {
    fonts: Vec<String>,
    sources: BTreeMap<String, String>,
    elements: Vec<String>,
    bounds: Option<Bounds>,
}

impl SvgSink {
    pub fn new(fonts: Vec<String>) -> Self {
        Self { fonts, ..Self::default() }
    }

    /// Seed the document with the source text runs, so removal can be seen.
    pub fn with_sources(mut self, runs: &[TextRun]) -> Self {
        for run in runs {
            let y = -run.anchor.y;
            let element = format!(
                r#"<text x="{:.4}" y="{:.4}" font-size="{:.4}"{}>{}</text>"#,
                run.anchor.x,
                y,
                run.font_size,
                rotate_attr(run.rotation_degrees(), run.anchor.x, y),
                escape(&run.contents),
            );
            self.sources.insert(run.id.clone(), element);
        }
        self
    }

    fn extend_bounds(&mut self, b: Bounds) {
        self.bounds = Some(self.bounds.map_or(b, |acc| acc.union(&b)));
    }

    /// Render the SVG document.
    pub fn finish(&self) -> String {
        let b = self.bounds.unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0));
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.4} {:.4} {:.4} {:.4}">"#,
            b.left,
            -b.top,
            b.width(),
            b.height()
        );
        for element in self.sources.values().chain(self.elements.iter()) {
            out.push_str(element);
        }
        out.push_str("</svg>");
        out
    }
}

fn rotate_attr(degrees: f64, x: f64, y: f64) -> String {
    if degrees == 0.0 {
        String::new()
    } else {
        format!(r#" transform="rotate({:.4} {:.4} {:.4})""#, -degrees, x, y)
    }
}

/// Escape for both element content and quoted attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

impl RenderSink for SvgSink {
    fn font_available(&self, name: &str) -> bool {
        self.fonts.iter().any(|f| f == name)
    }

    fn draw_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        let (x, y) = (bar.origin.x, -bar.origin.y);
        self.elements.push(format!(
            r#"<rect x="{:.4}" y="{:.4}" width="{:.4}" height="{:.4}" fill="{}"{}/>"#,
            x,
            y,
            bar.width,
            bar.height,
            bar.color.to_hex(),
            rotate_attr(bar.rotation, x, y),
        ));
        self.extend_bounds(bar.bounds());
        Ok(())
    }

    fn draw_label(&mut self, label: &Label) -> Result<(), SinkError> {
        if !self.font_available(&label.font_name) {
            return Err(SinkError::FontUnavailable(label.font_name.clone()));
        }
        let (x, y) = (label.origin.x, -label.origin.y);
        let spacing = label.font_size * label.tracking / 1000.0;
        let stretch = if label.horizontal_scale == 100.0 {
            String::new()
        } else {
            format!(r#" font-stretch="{:.0}%""#, label.horizontal_scale)
        };
        self.elements.push(format!(
            r#"<text x="{:.4}" y="{:.4}" font-family="{}" font-size="{:.4}" letter-spacing="{:.4}" dominant-baseline="hanging"{}{}>{}</text>"#,
            x,
            y,
            escape(&label.font_name),
            label.font_size,
            spacing,
            stretch,
            rotate_attr(label.rotation, x, y),
            escape(&label.text),
        ));
        self.extend_bounds(label.bounds());
        Ok(())
    }

    fn remove_text(&mut self, run_id: &str) -> Result<(), SinkError> {
        self.sources
            .remove(run_id)
            .map(|_| ())
            .ok_or_else(|| SinkError::UnknownRun(run_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Segment;
    use crate::geometry::Point;
    use crate::print::CmykColor;

    #[test]
    fn test_bar_is_flipped_to_svg_space() {
        let mut sink = SvgSink::new(vec![]);
        sink.draw_bar(&Bar {
            origin: Point::new(1.0, 5.0),
            width: 0.5,
            height: 4.0,
            rotation: 0.0,
            color: CmykColor::default(),
            kind: Segment::Guard,
        })
        .unwrap();

        let svg = sink.finish();
        assert!(svg.contains(r##"<rect x="1.0000" y="-5.0000" width="0.5000" height="4.0000" fill="#000000"/>"##));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_remove_text_drops_source() {
        let runs = vec![TextRun::new("t1", "4006381333931", Point::new(0.0, 0.0), 10.0)];
        let mut sink = SvgSink::new(vec![]).with_sources(&runs);
        assert!(sink.finish().contains("4006381333931"));

        sink.remove_text("t1").unwrap();
        assert!(!sink.finish().contains("4006381333931"));
        assert!(matches!(sink.remove_text("t1"), Err(SinkError::UnknownRun(_))));
    }

    #[test]
    fn test_label_requires_font() {
        let mut sink = SvgSink::new(vec!["Arial".to_string()]);
        let label = Label {
            text: "4".to_string(),
            origin: Point::default(),
            font_name: "MyriadPro-Regular".to_string(),
            font_size: 8.0,
            tracking: 120.0,
            horizontal_scale: 100.0,
            rotation: 0.0,
        };
        assert!(matches!(sink.draw_label(&label), Err(SinkError::FontUnavailable(_))));
    }

    #[test]
    fn test_quoted_font_name_is_escaped() {
        let font = r#"Brand "Digits" & Co"#;
        let mut sink = SvgSink::new(vec![font.to_string()]);
        let label = Label {
            text: "<4>".to_string(),
            origin: Point::default(),
            font_name: font.to_string(),
            font_size: 8.0,
            tracking: 120.0,
            horizontal_scale: 100.0,
            rotation: 0.0,
        };
        sink.draw_label(&label).unwrap();

        let svg = sink.finish();
        assert!(svg.contains(r#"font-family="Brand &quot;Digits&quot; &amp; Co""#));
        assert!(svg.contains(">&lt;4&gt;</text>"));
    }
}
