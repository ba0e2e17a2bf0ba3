//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations. A code with any violation is
//! rejected on its own; the rest of the batch carries on.

use serde::{Deserialize, Serialize};

use crate::checksum::{self, DigitString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub code: DigitString,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn success(code: DigitString) -> Self {
        Self { valid: true, code, violations: vec![] }
    }

    pub fn failure(code: DigitString, violations: Vec<ValidationViolation>) -> Self {
        Self { valid: false, code, violations }
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, code: &DigitString) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct ChecksumRule;

impl ValidationRule for ChecksumRule {
    fn name(&self) -> &'static str { "checksum" }

    fn validate(&self, code: &DigitString) -> Vec<ValidationViolation> {
        match checksum::verify(code) {
            Ok(()) => vec![],
            Err(mismatch) => vec![ValidationViolation {
                rule: self.name().to_string(),
                message: format!(
                    "The barcode {} does not have the right checksum. The checksum digit must be {}",
                    code, mismatch.expected
                ),
                expected: Some(mismatch.expected.to_string()),
                actual: Some(mismatch.actual.to_string()),
                remediation: vec![format!(
                    "Correct the last digit to {} or re-check the source data",
                    mismatch.expected
                )],
            }],
        }
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("Validator").field("rules", &names).finish()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(ChecksumRule)],
        }
    }

    pub fn validate(&self, code: &DigitString) -> ValidationResult {
        let violations: Vec<_> = self.rules.iter().flat_map(|rule| rule.validate(code)).collect();

        if violations.is_empty() {
            ValidationResult::success(*code)
        } else {
            ValidationResult::failure(*code, violations)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
