//! Date interpretation shared by the GS1 decoder and the invoice parser.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Century pivot for two-digit years: `YY <= 50` reads as `20YY`, anything
/// above as `19YY`. This is a policy choice, not derivable from the format;
/// the same rule applies to AI(17) payloads and free-text dates so the two
/// paths never disagree.
pub fn expand_two_digit_year(yy: u32) -> i32 {
    if yy <= 50 {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_y, next_m, 1).map(|d| d.pred_opt().unwrap_or(d))
}

/// Decode an AI(17) `YYMMDD` payload. Day `00` means "end of month" per the
/// GS1 convention. Impossible calendar dates yield `None` so the decoder can
/// omit the field instead of failing.
pub fn decode_yymmdd(payload: &str) -> Option<NaiveDate> {
    if payload.len() != 6 || !payload.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: u32 = payload[0..2].parse().ok()?;
    let month: u32 = payload[2..4].parse().ok()?;
    let day: u32 = payload[4..6].parse().ok()?;
    let year = expand_two_digit_year(yy);
    if day == 0 {
        last_day_of_month(year, month)
    } else {
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

static DATE_DMY4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4})\b").unwrap());
static DATE_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[./-](\d{1,2})[./-](\d{1,2})\b").unwrap());
static DATE_DMY2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{2})\b").unwrap());
static EXPIRY_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(SKT|TETT|EXP|Use\s*by|Son\s*kullanma)\b").unwrap()
});

/// Parse a date token in any accepted format: `DD.MM.YYYY`, `YYYY-MM-DD`,
/// `DD/MM/YY` (separators `.`, `/`, `-` interchangeably). Two-digit years use
/// the century pivot above. Returns `None` when nothing parses.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(c) = DATE_YMD.captures(s) {
        let (y, m, d) = (num(&c, 1), num(&c, 2), num(&c, 3));
        if let Some(date) = NaiveDate::from_ymd_opt(y as i32, m, d) {
            return Some(date);
        }
    }
    if let Some(c) = DATE_DMY4.captures(s) {
        let (d, m, y) = (num(&c, 1), num(&c, 2), num(&c, 3));
        if let Some(date) = NaiveDate::from_ymd_opt(y as i32, m, d) {
            return Some(date);
        }
    }
    if let Some(c) = DATE_DMY2.captures(s) {
        let (d, m, yy) = (num(&c, 1), num(&c, 2), num(&c, 3));
        if let Some(date) = NaiveDate::from_ymd_opt(expand_two_digit_year(yy), m, d) {
            return Some(date);
        }
    }
    None
}

/// Extract an expiry date from free OCR text, e.g. `"SKT: 12.03.2026"`.
///
/// Keyword hints (SKT, TETT, EXP, "Use by", "Son kullanma") narrow the search
/// to the text following the keyword; without one the first recognizable date
/// anywhere in the text is taken.
pub fn parse_expiry_hint(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(m) = EXPIRY_KEYWORD.find(text) {
        if let Some(date) = parse_flexible_date(&text[m.end()..]) {
            return Some(date);
        }
    }
    parse_flexible_date(text)
}

fn num(c: &regex::Captures<'_>, i: usize) -> u32 {
    c.get(i).map(|m| m.as_str().parse().unwrap_or(0)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn century_pivot_splits_at_50() {
        assert_eq!(expand_two_digit_year(0), 2000);
        assert_eq!(expand_two_digit_year(26), 2026);
        assert_eq!(expand_two_digit_year(50), 2050);
        assert_eq!(expand_two_digit_year(51), 1951);
        assert_eq!(expand_two_digit_year(99), 1999);
    }

    #[test]
    fn yymmdd_decodes_exact_date() {
        assert_eq!(decode_yymmdd("260912"), Some(date(2026, 9, 12)));
    }

    #[test]
    fn yymmdd_day_zero_is_end_of_month() {
        assert_eq!(decode_yymmdd("260200"), Some(date(2026, 2, 28)));
        assert_eq!(decode_yymmdd("261200"), Some(date(2026, 12, 31)));
    }

    #[test]
    fn yymmdd_rejects_impossible_dates() {
        assert_eq!(decode_yymmdd("261332"), None);
        assert_eq!(decode_yymmdd("26091"), None);
        assert_eq!(decode_yymmdd("2609ab"), None);
    }

    #[test]
    fn flexible_date_formats() {
        assert_eq!(parse_flexible_date("12.03.2026"), Some(date(2026, 3, 12)));
        assert_eq!(parse_flexible_date("2026-03-12"), Some(date(2026, 3, 12)));
        assert_eq!(parse_flexible_date("15/06/2025"), Some(date(2025, 6, 15)));
        assert_eq!(parse_flexible_date("25.08.26"), Some(date(2026, 8, 25)));
        assert_eq!(parse_flexible_date("no date here"), None);
    }

    #[test]
    fn expiry_hint_with_keywords() {
        assert_eq!(parse_expiry_hint("SKT: 12.03.2026"), Some(date(2026, 3, 12)));
        assert_eq!(parse_expiry_hint("TETT 25.08.26"), Some(date(2026, 8, 25)));
        assert_eq!(parse_expiry_hint("Use by 30/11/2025"), Some(date(2025, 11, 30)));
        assert_eq!(
            parse_expiry_hint("Son kullanma tarihi: 15.07.2026"),
            Some(date(2026, 7, 15))
        );
    }

    #[test]
    fn expiry_hint_without_keyword_takes_first_date() {
        assert_eq!(parse_expiry_hint("lot A1 2026-12-31"), Some(date(2026, 12, 31)));
        assert_eq!(parse_expiry_hint(""), None);
        assert_eq!(parse_expiry_hint("just text"), None);
    }
}
