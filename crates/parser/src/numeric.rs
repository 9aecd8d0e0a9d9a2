//! Locale-aware numeric token parsing.
//!
//! Receipt OCR mixes `,` and `.` freely: `28,50`, `28.50`, `1.250,00`. The
//! rule here: a separator is the decimal point iff it occurs exactly once and
//! is followed by at most two digits at the end of the token; any other
//! separator occurrences are thousands grouping and are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// Strip currency markers and whitespace from a money token.
fn strip_currency(token: &str) -> String {
    token
        .replace("TL", "")
        .replace('₺', "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn is_decimal_separator(token: &str, sep: char) -> bool {
    let count = token.matches(sep).count();
    if count != 1 {
        return false;
    }
    match token.rfind(sep) {
        Some(pos) => {
            let tail = &token[pos + 1..];
            !tail.is_empty() && tail.len() <= 2 && tail.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Parse a decimal token accepting both `,` and `.` separators.
/// Returns `None` for tokens with no digits or ambiguous garbage.
pub fn parse_decimal(token: &str) -> Option<Decimal> {
    let cleaned = strip_currency(token);
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let dot = is_decimal_separator(&cleaned, '.');
    let comma = is_decimal_separator(&cleaned, ',');
    // When both qualify the rightmost one wins (the other is grouping).
    let decimal_sep = match (dot, comma) {
        (true, true) => {
            if cleaned.rfind('.') > cleaned.rfind(',') {
                Some('.')
            } else {
                Some(',')
            }
        }
        (true, false) => Some('.'),
        (false, true) => Some(','),
        (false, false) => None,
    };

    let mut out = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        match c {
            '0'..='9' => out.push(c),
            '-' if out.is_empty() => out.push(c),
            '.' | ',' if Some(c) == decimal_sep => out.push('.'),
            '.' | ',' => {} // grouping
            _ => {}
        }
    }
    out.parse::<Decimal>().ok()
}

static QTY_THREE_DECIMALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[.,](\d{3})$").unwrap());

/// Parse a quantity token, snapping OCR noise around 1 (`"1,000 AD"` style
/// artifacts) back to exactly 1.
///
/// Receipts print quantities with three decimals (`1,000` meaning one unit);
/// a thousands reading is implausible for a small integer part, so a single
/// separator with a three-digit tail is taken as the decimal point here,
/// unlike in money tokens.
pub fn parse_quantity(token: &str) -> Option<Decimal> {
    let token = token.trim();
    if let Some(caps) = QTY_THREE_DECIMALS.captures(token) {
        let normalized = format!("{}.{}", &caps[1], &caps[2]);
        let qty: Decimal = normalized.parse().ok()?;
        return Some(snap_near_one(qty));
    }
    let qty = parse_decimal(token)?;
    Some(snap_near_one(qty))
}

fn snap_near_one(qty: Decimal) -> Decimal {
    let low = Decimal::new(9, 1);
    let high = Decimal::new(11, 1);
    if qty >= low && qty <= high { Decimal::ONE } else { qty }
}
