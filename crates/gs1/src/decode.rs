//! GS1 Application Identifier scanner.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::FNC1;
use crate::dates::decode_yymmdd;
use crate::gtin::check_digit_valid;

/// Maximum length of variable-length AI payloads (10, 21).
const VARIABLE_MAX: usize = 20;

/// Typed fields decoded from a GS1 payload. Absent fields stay `None`; the
/// decoder never substitutes defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gs1Fields {
    /// AI 01, GTIN-14. Kept even when the check digit fails.
    pub gtin: Option<String>,
    /// Mod-10 check digit result for `gtin`; meaningful only when `gtin` is
    /// set. Callers may use `false` to down-weight matching confidence.
    pub gtin_valid: bool,
    /// AI 10, batch/lot code.
    pub batch_lot: Option<String>,
    /// AI 17, expiry date (day `00` resolved to end of month).
    pub expiry_date: Option<NaiveDate>,
    /// AI 21, serial number.
    pub serial: Option<String>,
}

impl Gs1Fields {
    pub fn is_empty(&self) -> bool {
        self.gtin.is_none()
            && self.batch_lot.is_none()
            && self.expiry_date.is_none()
            && self.serial.is_none()
    }
}

static PAREN_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d{2,4})\)\s*([^(]*)").unwrap());

/// Decode a raw GS1 payload. Never fails: malformed, unknown, or truncated
/// segments are dropped and whatever decoded before them is returned. The
/// caller keeps the original string for audit.
///
/// Both wire forms are accepted: raw `AI+value` concatenation with FNC1
/// (`\u{1D}`) separators after variable-length fields, and the
/// human-readable parenthesized form `(01)...(17)...(10)...`.
pub fn decode(raw: &str) -> Gs1Fields {
    let raw = raw.trim();
    if raw.is_empty() {
        return Gs1Fields::default();
    }
    if raw.contains('(') {
        decode_parenthesized(raw)
    } else {
        decode_concatenated(raw)
    }
}

fn decode_parenthesized(raw: &str) -> Gs1Fields {
    let mut fields = Gs1Fields::default();
    for cap in PAREN_SEGMENT.captures_iter(raw) {
        let ai = cap.get(1).map_or("", |m| m.as_str());
        let value = cap.get(2).map_or("", |m| m.as_str()).trim();
        // Unknown AI: stop scanning rather than guess field boundaries.
        if !apply_segment(&mut fields, ai, value) {
            break;
        }
    }
    fields
}

fn decode_concatenated(raw: &str) -> Gs1Fields {
    let mut fields = Gs1Fields::default();
    let chars: Vec<char> = raw.chars().collect();
    let mut pos = 0;

    while pos < chars.len() {
        // Skip any leading FNC1 separators between segments.
        while pos < chars.len() && chars[pos] == FNC1 {
            pos += 1;
        }
        if pos + 2 > chars.len() {
            break;
        }
        let ai: String = chars[pos..pos + 2].iter().collect();
        if !ai.chars().all(|c| c.is_ascii_digit()) {
            break;
        }
        pos += 2;

        let consumed = match ai.as_str() {
            "01" => take_fixed(&chars, pos, 14).map(|v| {
                let len = v.len();
                set_gtin(&mut fields, &v);
                len
            }),
            "17" => take_fixed(&chars, pos, 6).map(|v| {
                let len = v.len();
                fields.expiry_date = decode_yymmdd(&v);
                len
            }),
            "10" => {
                let v = take_variable(&chars, pos);
                let len = v.chars().count();
                if !v.is_empty() {
                    fields.batch_lot = Some(v);
                }
                Some(len)
            }
            "21" => {
                let v = take_variable(&chars, pos);
                let len = v.chars().count();
                if !v.is_empty() {
                    fields.serial = Some(v);
                }
                Some(len)
            }
            // Unknown AI: stop consuming rather than guess boundaries and
            // silently corrupt a lot code.
            _ => None,
        };

        match consumed {
            Some(n) => pos += n,
            None => break,
        }
    }
    fields
}

/// Apply one already-delimited `(AI)value` segment. Returns `false` for an
/// unknown AI (scan stops there).
fn apply_segment(fields: &mut Gs1Fields, ai: &str, value: &str) -> bool {
    match ai {
        "01" => {
            let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.len() >= 14 {
                set_gtin(fields, &digits[..14]);
            } else if !digits.is_empty() {
                // Shorter EAN-8/12/13 payloads occur in practice on receipts.
                set_gtin(fields, &digits);
            }
            true
        }
        "17" => {
            let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.len() >= 6 {
                fields.expiry_date = decode_yymmdd(&digits[..6]);
            }
            true
        }
        "10" => {
            let lot = clip_variable(value);
            if !lot.is_empty() {
                fields.batch_lot = Some(lot);
            }
            true
        }
        "21" => {
            let serial = clip_variable(value);
            if !serial.is_empty() {
                fields.serial = Some(serial);
            }
            true
        }
        _ => false,
    }
}

fn set_gtin(fields: &mut Gs1Fields, digits: &str) {
    fields.gtin_valid = check_digit_valid(digits);
    fields.gtin = Some(digits.to_string());
}

/// Consume exactly `n` characters at `pos`; `None` when truncated (segment
/// omitted, scan ends).
fn take_fixed(chars: &[char], pos: usize, n: usize) -> Option<String> {
    if pos + n > chars.len() {
        return None;
    }
    let v: String = chars[pos..pos + n].iter().collect();
    if v.chars().all(|c| c.is_ascii_digit()) {
        Some(v)
    } else {
        None
    }
}

/// Consume up to the next FNC1 or end of string, capped at `VARIABLE_MAX`.
fn take_variable(chars: &[char], pos: usize) -> String {
    chars[pos..]
        .iter()
        .take_while(|c| **c != FNC1)
        .take(VARIABLE_MAX)
        .collect()
}

fn clip_variable(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(VARIABLE_MAX)
        .collect()
}
