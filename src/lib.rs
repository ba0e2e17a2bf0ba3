//! EANForge Core - EAN-13 Barcode Artwork Engine
//!
//! # Guarantees
//! 1. Only 13-digit runs are candidates
//! 2. A wrong check digit never produces a symbol
//! 3. Every symbol is exactly 95 modules wide
//! 4. Same input, same geometry
//! 5. Nothing is drawn without the label font
//! 6. Sources are removed only after every symbol is drawn

pub mod checksum;
pub mod encoding;
pub mod geometry;
pub mod hashing;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod print;
pub mod profiles;
pub mod sink;
pub mod source;
pub mod svg;
pub mod symbol;
pub mod validation;

pub use checksum::{check_digit, verify, ChecksumMismatch, DigitString, DigitStringError};
pub use encoding::{encode, LeftPattern, ModuleRun, ModuleSequence, Segment, TOTAL_MODULES};
pub use geometry::{rotate_about, Bounds, Point, TextMatrix, Transform};
pub use hashing::{canonical_json, compute_job_hash, compute_symbol_hash};
pub use layout::{LayoutConfig, LayoutGeometry};
pub use pipeline::{BarcodePipeline, BatchPlan, BatchReport, ItemOutcome, PipelineError};
pub use print::CmykColor;
pub use profiles::{LayoutProfile, ProfileRegistry, DEFAULT_PROFILE_ID};
pub use sink::{DrawCommand, MemorySink, RenderSink, SinkError};
pub use source::TextRun;
pub use svg::SvgSink;
pub use symbol::{Bar, BarcodeSymbol, Label};
pub use validation::{ValidationResult, ValidationRule, ValidationViolation};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_ENGINE_VERSION: &str = "1.0.0";
