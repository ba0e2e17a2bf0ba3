//! Hashing System - SHA-256 Fingerprints
//!
//! Symbol fingerprints cover the drawn geometry at output precision, so
//! two symbols that render identically hash identically even if their
//! coordinates differ in the last float bits.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

use crate::symbol::BarcodeSymbol;

/// Decimal places kept when fingerprinting geometry, in points.
pub const FINGERPRINT_PRECISION: usize = 4;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Canonical JSON: object keys sorted, no whitespace.
///
/// Going through `Value` sorts keys, since serde_json's `Map` is ordered
/// without the `preserve_order` feature.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serde_json::to_value(value)?)
}

/// One line per drawn element, numbers rounded to output precision.
pub fn symbol_fingerprint_text(symbol: &BarcodeSymbol) -> String {
    let p = FINGERPRINT_PRECISION;
    let mut out = format!("{}\n", symbol.code);
    for bar in &symbol.bars {
        let c = &bar.color;
        let _ = writeln!(
            out,
            "bar {:.p$} {:.p$} {:.p$} {:.p$} {:.p$} cmyk {} {} {} {}",
            bar.origin.x, bar.origin.y, bar.width, bar.height, bar.rotation,
            c.cyan, c.magenta, c.yellow, c.black,
        );
    }
    for label in &symbol.labels {
        let _ = writeln!(
            out,
            "label {:?} {:.p$} {:.p$} {:.p$} {:.p$} {} {} {:?}",
            label.text, label.origin.x, label.origin.y, label.font_size, label.rotation,
            label.tracking, label.horizontal_scale, label.font_name,
        );
    }
    out
}

/// Fingerprint of a symbol's drawn geometry
pub fn compute_symbol_hash(symbol: &BarcodeSymbol) -> String {
    sha256_hex(symbol_fingerprint_text(symbol).as_bytes())
}

/// Compute job hash for a batch
/// job_hash = sha256(profile_id + profile_version + canonical_payload + engine_version)
pub fn compute_job_hash(
    profile_id: &str,
    profile_version: &str,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined = format!(
        "{}:{}:{}:{}",
        profile_id, profile_version, canonical_payload, engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Segment;
    use crate::geometry::Point;
    use crate::print::CmykColor;
    use crate::symbol::{Bar, Label};
    use crate::DigitString;
    use serde_json::json;

    fn symbol(x: f64) -> BarcodeSymbol {
        let label = |text: &str| Label {
            text: text.to_string(),
            origin: Point::new(0.0, -22.77),
            font_name: "MyriadPro-Regular".to_string(),
            font_size: 8.7538,
            tracking: 120.0,
            horizontal_scale: 100.0,
            rotation: 0.0,
        };
        BarcodeSymbol {
            code: DigitString::parse("4006381333931").unwrap(),
            bars: vec![Bar {
                origin: Point::new(x, 0.0),
                width: 0.7958,
                height: 26.45,
                rotation: 0.0,
                color: CmykColor::default(),
                kind: Segment::Guard,
            }],
            labels: [label("4"), label("006381"), label("333931")],
        }
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"b": 1, "a": 2}});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":{"a":2,"b":1},"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_ignores_float_noise() {
        let a = compute_symbol_hash(&symbol(0.7958));
        let b = compute_symbol_hash(&symbol(0.7958 + 1e-12));
        assert_eq!(a, b);
        assert_ne!(a, compute_symbol_hash(&symbol(0.7968)));
    }

    #[test]
    fn test_fingerprint_lists_every_element() {
        let text = symbol_fingerprint_text(&symbol(1.0));
        assert!(text.starts_with("4006381333931\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("bar ")).count(), 1);
        assert_eq!(text.lines().filter(|l| l.starts_with("label ")).count(), 3);
        assert!(text.contains("bar 1.0000 0.0000 0.7958 26.4500 0.0000"));
    }

    #[test]
    fn test_job_hash_depends_on_profile_version() {
        let payload = json!(["4006381333931"]);
        let h1 = compute_job_hash("ean13-standard", "1.0.0", &payload, "1.0.0").unwrap();
        let h2 = compute_job_hash("ean13-standard", "1.0.1", &payload, "1.0.0").unwrap();
        assert_ne!(h1, h2);
        assert_eq!(h1, compute_job_hash("ean13-standard", "1.0.0", &payload, "1.0.0").unwrap());
    }
}
