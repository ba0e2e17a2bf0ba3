//! Module Encoding - Digits to Bar/Space Runs
//!
//! An EAN-13 symbol is 95 modules wide:
//! start guard (3) + 6 left digits (42) + center guard (5)
//! + 6 right digits (42) + end guard (3).

use serde::{Deserialize, Serialize};

use crate::checksum::DigitString;

/// Total symbol width in modules, guards included.
pub const TOTAL_MODULES: u8 = 95;

/// Width of every digit pattern in modules.
pub const DIGIT_MODULES: u8 = 7;

/// Which of the two left-hand tables encodes a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeftPattern {
    /// Odd parity
    L,
    /// Even parity, the mirror image of L
    G,
}

use LeftPattern::{G, L};

/// Left-group parity selected by the number-system digit.
pub const PARITY_TABLE: [[LeftPattern; 6]; 10] = [
    [L, L, L, L, L, L],
    [L, L, G, L, G, G],
    [L, L, G, G, L, G],
    [L, L, G, G, G, L],
    [L, G, L, L, G, G],
    [L, G, G, L, L, G],
    [L, G, G, G, L, L],
    [L, G, L, G, L, G],
    [L, G, L, G, G, L],
    [L, G, G, L, G, L],
];

/// L-table run widths: space, bar, space, bar.
const L_WIDTHS: [[u8; 4]; 10] = [
    [3, 2, 1, 1],
    [2, 2, 2, 1],
    [2, 1, 2, 2],
    [1, 4, 1, 1],
    [1, 1, 3, 2],
    [1, 2, 3, 1],
    [1, 1, 1, 4],
    [1, 3, 1, 2],
    [1, 2, 1, 3],
    [3, 1, 1, 2],
];

const START_GUARD: [u8; 3] = [1, 1, 1];
const CENTER_GUARD: [u8; 5] = [1, 1, 1, 1, 1];
const END_GUARD: [u8; 3] = START_GUARD;

/// Which part of the symbol a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Guard,
    Digit,
}

/// One bar or space, in module units from the start of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRun {
    pub start: u8,
    pub width: u8,
    pub filled: bool,
    pub segment: Segment,
}

/// Run widths for a digit with the first run filled or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DigitPattern {
    widths: [u8; 4],
    starts_filled: bool,
}

/// Look up the run widths for a left-group digit.
fn left_pattern(digit: u8, parity: LeftPattern) -> DigitPattern {
    let l = L_WIDTHS[usize::from(digit)];
    let widths = match parity {
        LeftPattern::L => l,
        LeftPattern::G => [l[3], l[2], l[1], l[0]],
    };
    DigitPattern { widths, starts_filled: false }
}

/// Right-group digits share the L widths with bars and spaces swapped.
fn right_pattern(digit: u8) -> DigitPattern {
    DigitPattern {
        widths: L_WIDTHS[usize::from(digit)],
        starts_filled: true,
    }
}

/// The full run sequence of one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSequence {
    runs: Vec<ModuleRun>,
}

impl ModuleSequence {
    pub fn runs(&self) -> &[ModuleRun] {
        &self.runs
    }

    pub fn bars(&self) -> impl Iterator<Item = &ModuleRun> {
        self.runs.iter().filter(|r| r.filled)
    }

    /// Sum of all run widths. Always `TOTAL_MODULES` for a full symbol.
    pub fn total_modules(&self) -> u32 {
        self.runs.iter().map(|r| u32::from(r.width)).sum()
    }

    /// Render as a `1`/`0` module string, mostly for debugging.
    pub fn to_module_string(&self) -> String {
        self.runs
            .iter()
            .flat_map(|r| std::iter::repeat(if r.filled { '1' } else { '0' }).take(usize::from(r.width)))
            .collect()
    }
}

/// Appends runs at the cursor and returns the advanced cursor.
fn push_runs(
    runs: &mut Vec<ModuleRun>,
    cursor: u8,
    widths: &[u8],
    starts_filled: bool,
    segment: Segment,
) -> u8 {
    widths.iter().enumerate().fold(cursor, |start, (i, &width)| {
        runs.push(ModuleRun {
            start,
            width,
            filled: starts_filled == (i % 2 == 0),
            segment,
        });
        start + width
    })
}

/// Encode a code into its 59 module runs.
///
/// The check digit is not verified here; callers encode only codes that
/// passed validation.
pub fn encode(code: &DigitString) -> ModuleSequence {
    let parity = &PARITY_TABLE[usize::from(code.number_system())];
    let mut runs = Vec::with_capacity(59);

    let mut cursor = push_runs(&mut runs, 0, &START_GUARD, true, Segment::Guard);

    for (&digit, &slot) in code.left_group().iter().zip(parity.iter()) {
        let p = left_pattern(digit, slot);
        cursor = push_runs(&mut runs, cursor, &p.widths, p.starts_filled, Segment::Digit);
    }

    cursor = push_runs(&mut runs, cursor, &CENTER_GUARD, false, Segment::Guard);

    for &digit in code.right_group() {
        let p = right_pattern(digit);
        cursor = push_runs(&mut runs, cursor, &p.widths, p.starts_filled, Segment::Digit);
    }

    let end = push_runs(&mut runs, cursor, &END_GUARD, true, Segment::Guard);
    debug_assert_eq!(end, TOTAL_MODULES);

    ModuleSequence { runs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> DigitString {
        DigitString::parse(s).unwrap()
    }

    #[test]
    fn test_digit_patterns_are_seven_modules() {
        for d in 0..10u8 {
            for parity in [LeftPattern::L, LeftPattern::G] {
                let p = left_pattern(d, parity);
                assert_eq!(p.widths.iter().sum::<u8>(), DIGIT_MODULES);
            }
            assert_eq!(right_pattern(d).widths.iter().sum::<u8>(), DIGIT_MODULES);
        }
    }

    #[test]
    fn test_total_width_is_95() {
        for s in ["4006381333931", "5901234123457", "0000000000000", "9999999999994"] {
            let seq = encode(&code(s));
            assert_eq!(seq.total_modules(), u32::from(TOTAL_MODULES));
            assert_eq!(seq.runs().len(), 59);
            assert_eq!(seq.bars().count(), 30);
        }
    }

    #[test]
    fn test_runs_are_contiguous() {
        let seq = encode(&code("5901234123457"));
        let mut expected_start = 0;
        for run in seq.runs() {
            assert_eq!(run.start, expected_start);
            expected_start += run.width;
        }
    }

    #[test]
    fn test_reference_module_string() {
        // 4006381333931, number system 4 => L G L L G G
        let expected = concat!(
            "101",
            "0001101", // 0 L
            "0100111", // 0 G
            "0101111", // 6 L
            "0111101", // 3 L
            "0001001", // 8 G
            "0110011", // 1 G
            "01010",
            "1000010", // 3 R
            "1000010", // 3 R
            "1000010", // 3 R
            "1110100", // 9 R
            "1000010", // 3 R
            "1100110", // 1 R
            "101",
        );
        assert_eq!(encode(&code("4006381333931")).to_module_string(), expected);
    }

    #[test]
    fn test_guards_are_tagged() {
        let seq = encode(&code("5901234123457"));
        let guard_bars: Vec<_> = seq
            .bars()
            .filter(|r| r.segment == Segment::Guard)
            .map(|r| r.start)
            .collect();
        assert_eq!(guard_bars, vec![0, 2, 46, 48, 92, 94]);
    }

    #[test]
    fn test_parity_first_slot_is_always_l() {
        assert!(PARITY_TABLE.iter().all(|row| row[0] == LeftPattern::L));
    }
}
