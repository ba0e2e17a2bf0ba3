//! Check Digit System
//!
//! A code enters the pipeline only as a `DigitString` and only leaves
//! validation if its 13th digit equals the computed check digit.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digits in an EAN-13 code, check digit included.
pub const CODE_LENGTH: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitStringError {
    #[error("Expected 13 digits, got {0}")]
    WrongLength(usize),

    #[error("Non-digit character {0:?} at position {1}")]
    NonDigit(char, usize),
}

/// Exactly 13 ASCII digits. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitString([u8; CODE_LENGTH]);

impl DigitString {
    pub fn parse(contents: &str) -> Result<Self, DigitStringError> {
        let count = contents.chars().count();
        if count != CODE_LENGTH {
            return Err(DigitStringError::WrongLength(count));
        }

        let mut digits = [0u8; CODE_LENGTH];
        for (i, c) in contents.chars().enumerate() {
            if !c.is_ascii_digit() {
                return Err(DigitStringError::NonDigit(c, i));
            }
            digits[i] = c as u8 - b'0';
        }
        Ok(Self(digits))
    }

    /// Digit values, 0..=9 each.
    pub fn digits(&self) -> &[u8; CODE_LENGTH] {
        &self.0
    }

    /// The number-system digit that selects the left-group parity.
    pub fn number_system(&self) -> u8 {
        self.0[0]
    }

    pub fn left_group(&self) -> &[u8] {
        &self.0[1..7]
    }

    pub fn right_group(&self) -> &[u8] {
        &self.0[7..13]
    }

    pub fn check(&self) -> u8 {
        self.0[12]
    }

    /// Digits rendered back to text, e.g. for labels.
    pub fn slice_text(&self, range: std::ops::Range<usize>) -> String {
        self.0[range].iter().map(|d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slice_text(0..CODE_LENGTH))
    }
}

impl Serialize for DigitString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DigitString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Returned when the 13th digit disagrees with the computed check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Check digit must be {expected}, found {actual}")]
pub struct ChecksumMismatch {
    pub expected: u8,
    pub actual: u8,
}

/// Compute the EAN-13 check digit of the first 12 digits.
///
/// Weights alternate 1, 3, 1, 3... starting from the first digit. The
/// result is the distance from the weighted sum up to the next multiple
/// of ten, so a sum that is already a multiple of ten yields 0.
pub fn check_digit(prefix: &[u8]) -> u8 {
    let sum: u32 = prefix
        .iter()
        .take(CODE_LENGTH - 1)
        .enumerate()
        .map(|(j, &d)| u32::from(d) * if j % 2 == 0 { 1 } else { 3 })
        .sum();

    (sum.div_ceil(10) * 10 - sum) as u8
}

/// Verify the check digit of a full code.
pub fn verify(code: &DigitString) -> Result<(), ChecksumMismatch> {
    let expected = check_digit(code.digits());
    let actual = code.check();
    if expected == actual {
        Ok(())
    } else {
        Err(ChecksumMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(s: &str) -> Vec<u8> {
        s.bytes().map(|b| b - b'0').collect()
    }

    #[test]
    fn test_known_check_digits() {
        assert_eq!(check_digit(&prefix("400638133393")), 1);
        assert_eq!(check_digit(&prefix("590123412345")), 7);
        assert_eq!(check_digit(&prefix("000000000000")), 0);
    }

    #[test]
    fn test_multiple_of_ten_yields_zero() {
        // 1*1 + 3*3 = 10
        assert_eq!(check_digit(&prefix("130000000000")), 0);
    }

    #[test]
    fn test_self_consistency() {
        for seed in 0..500u64 {
            let digits: String = (0..12)
                .map(|i| char::from(b'0' + ((seed * 7919 + i * 104_729) % 10) as u8))
                .collect();
            let cd = check_digit(&prefix(&digits));
            assert!(cd <= 9);

            let code = DigitString::parse(&format!("{digits}{cd}")).unwrap();
            assert!(verify(&code).is_ok());
        }
    }

    #[test]
    fn test_verify_reports_expected_digit() {
        let code = DigitString::parse("4006381333930").unwrap();
        let err = verify(&code).unwrap_err();
        assert_eq!(err, ChecksumMismatch { expected: 1, actual: 0 });
        assert!(err.to_string().contains("must be 1"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            DigitString::parse("400638133393"),
            Err(DigitStringError::WrongLength(12))
        );
        assert_eq!(
            DigitString::parse("40063813339311"),
            Err(DigitStringError::WrongLength(14))
        );
        assert_eq!(
            DigitString::parse("40063813339x1"),
            Err(DigitStringError::NonDigit('x', 11))
        );
        // Full-width digits are not ASCII
        assert!(DigitString::parse("４００６３８１３３３９３１").is_err());
    }

    #[test]
    fn test_display_and_groups() {
        let code = DigitString::parse("5901234123457").unwrap();
        assert_eq!(code.to_string(), "5901234123457");
        assert_eq!(code.number_system(), 5);
        assert_eq!(code.left_group(), &[9, 0, 1, 2, 3, 4]);
        assert_eq!(code.right_group(), &[1, 2, 3, 4, 5, 7]);
        assert_eq!(code.slice_text(1..7), "901234");
    }
}
