//! Barcode Pipeline - Single Entry Point
//!
//! validate -> encode -> assemble -> label -> orient -> emit.
//! Geometry is computed for the whole batch before the sink is touched;
//! source runs are removed only after every symbol is drawn.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::checksum::DigitString;
use crate::encoding::encode;
use crate::hashing::{compute_job_hash, compute_symbol_hash};
use crate::layout::{assemble_bars, orient, place_labels, LayoutGeometry};
use crate::profiles::{LayoutProfile, ProfileRegistry};
use crate::sink::{RenderSink, SinkError};
use crate::source::{select_candidates, TextRun};
use crate::symbol::BarcodeSymbol;
use crate::validation::{ValidationViolation, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Required resource not available: {0}")]
    MissingResource(String),

    #[error("Profile version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid bar color in profile {0}: {1}")]
    InvalidColor(String, &'static str),

    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Render error: {0}")]
    Render(#[from] SinkError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// What happened to one candidate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Accepted {
        run_id: String,
        code: DigitString,
        symbol_hash: String,
    },
    Rejected {
        run_id: String,
        code: DigitString,
        violations: Vec<ValidationViolation>,
    },
}

impl ItemOutcome {
    pub fn run_id(&self) -> &str {
        match self {
            Self::Accepted { run_id, .. } | Self::Rejected { run_id, .. } => run_id,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Symbol ready for emission, with the run it replaces
#[derive(Debug, Clone)]
pub struct PlannedSymbol {
    pub run_id: String,
    pub symbol: BarcodeSymbol,
}

/// Pure result of a batch, before anything is drawn
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub outcomes: Vec<ItemOutcome>,
    pub symbols: Vec<PlannedSymbol>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub id: String,
    pub profile_id: String,
    pub profile_version: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub job_hash: String,
    pub candidates: usize,
    pub emitted: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn rejected(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.is_accepted())
    }
}

/// The barcode pipeline - single entry point for all symbol generation
#[derive(Debug)]
pub struct BarcodePipeline {
    profile: LayoutProfile,
    validator: Validator,
}

impl BarcodePipeline {
    pub fn new(profile: LayoutProfile) -> Result<Self, PipelineError> {
        check_engine_version(&profile)?;
        profile
            .bar_color
            .check()
            .map_err(|reason| PipelineError::InvalidColor(profile.id.clone(), reason))?;
        Ok(Self {
            profile,
            validator: Validator::new(),
        })
    }

    pub fn from_registry(registry: &ProfileRegistry, profile_id: &str) -> Result<Self, PipelineError> {
        let profile = registry
            .get(profile_id)
            .ok_or_else(|| PipelineError::ProfileNotFound(profile_id.to_string()))?;
        Self::new(profile.clone())
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    /// Symbol in its own frame, unplaced. No check digit verification.
    pub fn local_symbol(&self, code: &DigitString, geometry: &LayoutGeometry) -> BarcodeSymbol {
        let layout = &self.profile.layout;
        let sequence = encode(code);
        BarcodeSymbol {
            code: *code,
            bars: assemble_bars(&sequence, geometry, layout, self.profile.bar_color),
            labels: place_labels(code, geometry, layout, &self.profile.font_name),
        }
    }

    /// Symbol placed and turned to replace `run`.
    pub fn build_symbol(&self, code: &DigitString, run: &TextRun) -> BarcodeSymbol {
        let layout = &self.profile.layout;
        let geometry = LayoutGeometry::from_font_size(run.font_size, layout);
        let local = self.local_symbol(code, &geometry);
        orient(&local, run.anchor, run.rotation_degrees(), &geometry, layout)
    }

    /// Validate and lay out every candidate. Does not touch any sink.
    ///
    /// A run id may be replaced only once; later candidates with an id
    /// already seen are rejected, so source removal cannot fail midway.
    pub fn plan(&self, runs: &[TextRun]) -> Result<BatchPlan, PipelineError> {
        let mut outcomes = vec![];
        let mut symbols = vec![];
        let mut seen_ids = HashSet::new();

        for candidate in select_candidates(runs) {
            let run_id = candidate.run.id.clone();
            let mut violations = self.validator.validate(&candidate.code).violations;
            if !seen_ids.insert(run_id.clone()) {
                violations.push(duplicate_run_violation(&run_id));
            }

            if !violations.is_empty() {
                for v in &violations {
                    tracing::warn!(run = %run_id, code = %candidate.code, rule = %v.rule, "{}", v.message);
                }
                outcomes.push(ItemOutcome::Rejected {
                    run_id,
                    code: candidate.code,
                    violations,
                });
                continue;
            }

            let symbol = self.build_symbol(&candidate.code, candidate.run);
            let symbol_hash = compute_symbol_hash(&symbol);
            tracing::debug!(run = %run_id, code = %candidate.code, bars = symbol.bars.len(), "symbol assembled");

            outcomes.push(ItemOutcome::Accepted {
                run_id: run_id.clone(),
                code: candidate.code,
                symbol_hash,
            });
            symbols.push(PlannedSymbol { run_id, symbol });
        }

        Ok(BatchPlan { outcomes, symbols })
    }

    /// Replace every valid 13-digit run with its barcode.
    ///
    /// The label font is required up front; without it nothing is drawn.
    /// Any other `Err` comes from the sink itself after drawing may have
    /// started: the sink holds a partial batch and should be discarded.
    pub fn run_batch<S: RenderSink>(
        &self,
        runs: &[TextRun],
        sink: &mut S,
    ) -> Result<BatchReport, PipelineError> {
        let font = &self.profile.font_name;
        if !sink.font_available(font) {
            tracing::error!(font = %font, "label font not available, batch aborted");
            return Err(PipelineError::MissingResource(font.clone()));
        }

        let plan = self.plan(runs)?;

        for planned in &plan.symbols {
            sink.draw_symbol(&planned.symbol)?;
        }
        for planned in &plan.symbols {
            sink.remove_text(&planned.run_id)?;
        }

        let job_hash = compute_job_hash(
            &self.profile.id,
            &self.profile.profile_version,
            &runs,
            ENGINE_VERSION,
        )?;

        let report = BatchReport {
            id: Uuid::new_v4().to_string(),
            profile_id: self.profile.id.clone(),
            profile_version: self.profile.profile_version.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            job_hash,
            candidates: plan.outcomes.len(),
            emitted: plan.symbols.len(),
            outcomes: plan.outcomes,
        };

        tracing::info!(
            candidates = report.candidates,
            emitted = report.emitted,
            rejected = report.candidates - report.emitted,
            "batch complete"
        );
        Ok(report)
    }
}

fn duplicate_run_violation(run_id: &str) -> ValidationViolation {
    ValidationViolation {
        rule: "unique_run".to_string(),
        message: format!("Text run {} appears more than once in the batch", run_id),
        expected: Some("unique run id".to_string()),
        actual: Some(run_id.to_string()),
        remediation: vec!["Give every source text run its own id".to_string()],
    }
}

fn check_engine_version(profile: &LayoutProfile) -> Result<(), PipelineError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)?;
    let min_ver = semver::Version::parse(&profile.engine_min_version)?;

    if engine_ver < min_ver {
        return Err(PipelineError::EngineVersionMismatch(
            profile.profile_version.clone(),
            profile.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_engine_requirement_rejected() {
        let profile = LayoutProfile {
            engine_min_version: "99.0.0".to_string(),
            ..LayoutProfile::default()
        };
        let err = BarcodePipeline::new(profile).unwrap_err();
        assert!(matches!(err, PipelineError::EngineVersionMismatch(..)));
    }

    #[test]
    fn test_unparseable_engine_requirement() {
        let profile = LayoutProfile {
            engine_min_version: "one".to_string(),
            ..LayoutProfile::default()
        };
        assert!(matches!(
            BarcodePipeline::new(profile),
            Err(PipelineError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_out_of_range_color_rejected() {
        let mut profile = LayoutProfile::default();
        profile.bar_color.black = 250.0;
        let err = BarcodePipeline::new(profile).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidColor(ref id, _) if id == "ean13-standard"));
    }

    #[test]
    fn test_unknown_profile() {
        let err = BarcodePipeline::from_registry(&ProfileRegistry::default(), "nope").unwrap_err();
        assert!(err.to_string().contains("Profile not found"));
    }
}
