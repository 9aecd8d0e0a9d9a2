//! OCR text segmentation.
//!
//! Targets receipt layouts where a barcode-leading row carries the numbers
//! and the product name sits on the following line:
//!
//! ```text
//! 8682971085011  1,000 AD   47,50   20   .00   47,03
//! D. IÇIM SÜT 1/1 TAM YAĞLI
//! ```
//!
//! Fallback shapes: `name xQTY @PRICE` and numeric-tail rows
//! (`name QTY PRICE [TOTAL]`).

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use shelfline_core::LineError;

use crate::line::{LineOutcome, ParsedLine, ParserConfig};
use crate::numeric::{parse_decimal, parse_quantity};

const NUM: &str = r"\d+(?:[.,]\d+)?";

static BARCODE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<barcode>\d{{12,14}})\s+(?P<qty>{NUM})\s*(?P<unit>(?i:AD|KG|KOLI|PAKET))?\s+(?P<rest>.+)$"
    ))
    .unwrap()
});
static AT_PRICE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<name>.+?)\s+x\s*(?P<qty>{NUM})\s+@\s*(?P<price>{NUM})"
    ))
    .unwrap()
});
static TAIL3_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<name>.+?)\s+(?P<qty>{NUM})\s+(?P<price>{NUM})\s+(?P<total>{NUM})\s*$"
    ))
    .unwrap()
});
static TAIL2_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<name>.+?)\s+(?P<qty>{NUM})\s+(?P<price>{NUM})\s*$"
    ))
    .unwrap()
});
static NUM_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(NUM).unwrap());
static ALL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8,}$").unwrap());

fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

/// Keep letters (incl. Turkish), digits, and `+-.,/() `; drop other noise.
fn clean_name(s: &str) -> String {
    let filtered: String = s
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '+' | '-' | '.' | ',' | '/' | '(' | ')')
        })
        .collect();
    let collapsed = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches([',', '.', ';', ':', ')', ']', ' '])
        .to_string()
}

/// A line is a plausible product name when it has at least 3 characters,
/// is not a bare long digit run (a barcode), and is at least 40% letters.
fn looks_like_name(s: &str) -> bool {
    let s = s.trim();
    if s.len() < 3 || ALL_DIGITS.is_match(s) {
        return false;
    }
    let letters = s.chars().filter(|c| is_letter(*c)).count();
    letters >= 3.max(s.chars().count() * 2 / 5)
}

fn hits_denylist(row: &str, config: &ParserConfig) -> bool {
    let upper = row.to_uppercase();
    config.denylist.iter().any(|k| upper.contains(&k.to_uppercase()))
}

fn normalize_unit(unit: Option<&str>) -> String {
    match unit.map(|u| u.to_lowercase()) {
        Some(u) if u.starts_with("ad") => "adet".to_string(),
        Some(u) => u,
        None => "adet".to_string(),
    }
}

/// Segment one OCR text block into per-line outcomes.
pub fn parse_ocr_text(text: &str, source_confidence: f64, config: &ParserConfig) -> Vec<LineOutcome> {
    let mut out: Vec<LineOutcome> = Vec::new();
    if text.trim().is_empty() {
        return out;
    }

    let raw_lines: Vec<String> = text
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    let mut i = 0;
    while i < raw_lines.len() && out.len() < config.max_lines {
        let row = &raw_lines[i];
        if row.is_empty() || hits_denylist(row, config) {
            i += 1;
            continue;
        }

        if let Some(caps) = BARCODE_ROW.captures(row) {
            let mut consumed_next = false;
            let outcome = parse_barcode_row(
                &caps,
                &raw_lines,
                i,
                source_confidence,
                config,
                &mut consumed_next,
            );
            if let Some(outcome) = outcome {
                out.push(outcome);
            }
            i += if consumed_next { 2 } else { 1 };
            continue;
        }

        if let Some(caps) = AT_PRICE_ROW.captures(row) {
            if let Some(outcome) = parse_simple_row(
                &caps["name"],
                &caps["qty"],
                &caps["price"],
                None,
                i,
                source_confidence,
                config,
            ) {
                out.push(outcome);
            }
            i += 1;
            continue;
        }

        if let Some(caps) = TAIL3_ROW.captures(row) {
            if let Some(outcome) = parse_simple_row(
                &caps["name"],
                &caps["qty"],
                &caps["price"],
                Some(&caps["total"]),
                i,
                source_confidence,
                config,
            ) {
                out.push(outcome);
                i += 1;
                continue;
            }
        }

        if let Some(caps) = TAIL2_ROW.captures(row) {
            if let Some(outcome) = parse_simple_row(
                &caps["name"],
                &caps["qty"],
                &caps["price"],
                None,
                i,
                source_confidence,
                config,
            ) {
                out.push(outcome);
            }
        }
        i += 1;
    }

    tracing::debug!(
        lines_in = raw_lines.len(),
        lines_out = out.len(),
        "segmented ocr text"
    );
    out
}

/// Barcode-leading rows: numbers live on this row, the name usually on the
/// next. Candidate rows that fail validation produce a `LineError` (the row
/// clearly was an item row, unlike generic boilerplate).
fn parse_barcode_row(
    caps: &regex::Captures<'_>,
    raw_lines: &[String],
    index: usize,
    source_confidence: f64,
    config: &ParserConfig,
    consumed_next: &mut bool,
) -> Option<LineOutcome> {
    let qty = match parse_quantity(&caps["qty"]) {
        Some(q) if q > Decimal::ZERO => q,
        _ => {
            return Some(LineOutcome::Failed(LineError::out_of_range(
                index,
                "non-positive quantity",
            )));
        }
    };

    let rest = &caps["rest"];
    let money: Vec<Decimal> = NUM_TOKEN
        .find_iter(rest)
        .filter_map(|m| parse_decimal(m.as_str()))
        .filter(|v| *v > Decimal::ZERO)
        .collect();

    let mut unit_price = money.first().copied().unwrap_or_default();
    let mut total = money.last().copied().filter(|_| money.len() > 1);
    let mut derived = false;

    // A much smaller right-hand number next to qty≈1 is a VAT/discount
    // column, not the line total.
    if let (Some(t), true) = (total, qty >= Decimal::new(95, 2)) {
        if t < unit_price * Decimal::new(6, 1) {
            total = None;
        }
    }

    if (unit_price <= Decimal::ZERO || unit_price >= config.max_unit_price)
        && total.is_some()
        && qty > Decimal::ZERO
    {
        if let Some(t) = total {
            unit_price = t / qty;
            derived = true;
        }
    }

    if unit_price <= Decimal::ZERO || unit_price >= config.max_unit_price {
        return Some(LineOutcome::Failed(LineError::out_of_range(
            index,
            "unit price outside plausible range",
        )));
    }

    // Prefer the next line as the product name when it reads like one.
    let mut name_source = caps.get(0).map_or("", |m| m.as_str());
    if let Some(next) = raw_lines.get(index + 1) {
        if looks_like_name(next) && !hits_denylist(next, config) {
            name_source = next;
            *consumed_next = true;
        }
    }
    let name = clean_name(name_source);
    if !looks_like_name(&name) {
        return Some(LineOutcome::Failed(LineError::missing_field(index, "name")));
    }

    let mut line = ParsedLine::new(index, name);
    line.quantity = qty;
    line.unit = normalize_unit(caps.name("unit").map(|m| m.as_str()));
    line.unit_price = unit_price.round_dp(2);
    line.total_price = total;
    line.barcode_raw = Some(caps["barcode"].to_string());
    line.derived_unit_price = derived;
    line.expiry_date = shelfline_gs1::parse_expiry_hint(rest);
    line.reconcile_total(config.total_tolerance);
    line.score_confidence(source_confidence, config);
    Some(LineOutcome::Parsed(line))
}

/// `name xQTY @PRICE` and numeric-tail shapes. Rows whose numbers fail
/// validation are skipped silently; these shapes match prose too often to
/// treat every miss as an error.
fn parse_simple_row(
    name: &str,
    qty: &str,
    price: &str,
    total: Option<&str>,
    index: usize,
    source_confidence: f64,
    config: &ParserConfig,
) -> Option<LineOutcome> {
    // Numeric-tail shapes require a decimal-formatted price; bare integers
    // at end of line are usually addresses or phone numbers, not prices.
    if !price.contains([',', '.']) {
        return None;
    }
    let qty = parse_quantity(qty).filter(|q| *q > Decimal::ZERO)?;
    let price = parse_decimal(price)
        .filter(|p| *p > Decimal::ZERO && *p < config.max_unit_price)?;
    let name = clean_name(name);
    if !looks_like_name(&name) {
        return None;
    }

    let mut line = ParsedLine::new(index, name);
    line.quantity = qty;
    line.unit_price = price.round_dp(2);
    line.total_price = total.and_then(parse_decimal).filter(|t| *t > Decimal::ZERO);
    line.reconcile_total(config.total_tolerance);
    line.score_confidence(source_confidence, config);
    Some(LineOutcome::Parsed(line))
}
