// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab test extraction from OCR text
//!
//! Each non-blank line is matched, from its start, against a row pattern of
//! the form `NAME[: ]VALUE [UNIT] [(LOW-HIGH)]`. Lines that do not yield a
//! name and a numeric value are dropped.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::{info, warn};

use super::types::{parse_reference_range, LabTest};

/// Row pattern: name, value, optional unit, optional reference range
pub const LAB_ROW_PATTERN: &str =
    r"^(.*?)[\s:]+([\d.]+)[\s]*([a-zA-Z%/]+)?[\s]*[\(]?([\d.]+-[\d.]+)?[\)]?";

fn row_regex() -> &'static Regex {
    static ROW_REGEX: OnceLock<Regex> = OnceLock::new();
    ROW_REGEX.get_or_init(|| Regex::new(LAB_ROW_PATTERN).expect("lab row pattern is valid"))
}

/// Line boundaries recognized when splitting OCR output.
///
/// Tesseract terminates each page with a form feed, so splitting on `\n`
/// alone is not enough.
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Code points of `0` for decimal digit blocks `\d` commonly matches
/// outside ASCII (Arabic-Indic, Indic scripts, Thai, Lao, Tibetan, Myanmar,
/// Khmer, Mongolian, fullwidth)
const DECIMAL_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0xFF10,
];

/// Rewrite non-ASCII decimal digits as ASCII so `f64` parsing accepts them
fn ascii_digits(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    text.chars()
        .map(|c| {
            let cp = c as u32;
            DECIMAL_ZEROS
                .iter()
                .find(|&&zero| (zero..zero + 10).contains(&cp))
                .and_then(|&zero| char::from_digit(cp - zero, 10))
                .unwrap_or(c)
        })
        .collect::<String>()
        .into()
}

/// Parse lab test rows out of OCR text
pub fn parse_lab_tests(text: &str) -> Vec<LabTest> {
    let results: Vec<LabTest> = text
        .split(is_line_boundary)
        .filter_map(parse_line)
        .collect();

    info!("Parsed {} lab tests from text", results.len());
    results
}

/// Parse a single line. Returns `None` for blank or unrecognized lines.
pub fn parse_line(line: &str) -> Option<LabTest> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let caps = row_regex().captures(line)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim()).unwrap_or("");

    let name = group(1).to_uppercase();
    let value = group(2);
    let unit = group(3);
    let ref_range = group(4);

    if name.is_empty() || value.is_empty() {
        return None;
    }

    let numeric = match ascii_digits(value).parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            warn!("Skipped line due to invalid value: {}", line);
            return None;
        }
    };

    // An unparseable range counts as in range
    let out_of_range = parse_reference_range(&ascii_digits(ref_range))
        .map(|(low, high)| !(low <= numeric && numeric <= high))
        .unwrap_or(false);

    Some(LabTest {
        test_name: name,
        test_value: value.to_string(),
        bio_reference_range: ref_range.to_string(),
        test_unit: unit.to_string(),
        lab_test_out_of_range: out_of_range,
    })
}

/// Project parsed rows into the response schema
pub fn format_output(parsed: &[LabTest]) -> Vec<LabTest> {
    parsed
        .iter()
        .map(|entry| LabTest {
            test_name: entry.test_name.clone(),
            test_value: entry.test_value.clone(),
            bio_reference_range: entry.bio_reference_range.clone(),
            test_unit: entry.test_unit.clone(),
            lab_test_out_of_range: entry.lab_test_out_of_range,
        })
        .collect()
}
