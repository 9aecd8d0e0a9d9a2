//! GTIN check-digit arithmetic.

/// Compute the mod-10 check digit for a GTIN body (all digits except the
/// last), using alternating weights 3/1 starting from the rightmost body
/// digit. Returns `None` if the body contains a non-digit.
pub fn compute_check_digit(body: &str) -> Option<u32> {
    let mut sum = 0u32;
    for (i, ch) in body.chars().rev().enumerate() {
        let d = ch.to_digit(10)?;
        let weight = if i % 2 == 0 { 3 } else { 1 };
        sum += d * weight;
    }
    Some((10 - sum % 10) % 10)
}

/// Validate a full GTIN (any length 8..=14 digits; the decoder hands in
/// GTIN-14). An invalid check digit does not make the code unusable, callers
/// only down-weight confidence.
pub fn check_digit_valid(gtin: &str) -> bool {
    if gtin.len() < 8 || !gtin.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let (body, check) = gtin.split_at(gtin.len() - 1);
    let expected = match compute_check_digit(body) {
        Some(d) => d,
        None => return false,
    };
    check.chars().next().and_then(|c| c.to_digit(10)) == Some(expected)
}
