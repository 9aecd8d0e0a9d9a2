//! Parsed line model and parser configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use shelfline_core::LineError;

/// One successfully extracted invoice line.
///
/// `quantity` and `unit_price` are always non-negative; a line that cannot
/// satisfy that never becomes a `ParsedLine` (it surfaces as a `LineError`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Zero-based position in the original input, for stable ordering and
    /// per-row rendering by callers.
    pub line_index: usize,
    pub raw_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    /// Printed line total, when the source carried one. Never recomputed.
    pub total_price: Option<Decimal>,
    /// Raw barcode string as seen on the line, preserved for audit.
    pub barcode_raw: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    /// Category column from delimited imports; OCR input never sets this.
    pub category: Option<String>,
    /// How many expected fields were unambiguously extracted, in [0, 1].
    pub line_confidence: f64,
    /// Printed total failed to reconcile with quantity * unit_price within
    /// tolerance. Parsed values are kept as-is, never silently corrected.
    pub total_mismatch: bool,
    /// Unit price was absent or implausible and was derived from
    /// total / quantity.
    pub derived_unit_price: bool,
    /// Confidence fell below the configured floor; route to manual review.
    pub needs_review: bool,
}

impl ParsedLine {
    pub fn new(line_index: usize, raw_name: impl Into<String>) -> Self {
        Self {
            line_index,
            raw_name: raw_name.into(),
            quantity: Decimal::ZERO,
            unit: "adet".to_string(),
            unit_price: Decimal::ZERO,
            total_price: None,
            barcode_raw: None,
            expiry_date: None,
            category: None,
            line_confidence: 0.0,
            total_mismatch: false,
            derived_unit_price: false,
            needs_review: false,
        }
    }

    /// Check the printed total against `quantity * unit_price` with a
    /// relative tolerance. Sets `total_mismatch`; values stay untouched.
    pub fn reconcile_total(&mut self, tolerance: Decimal) {
        let Some(total) = self.total_price else {
            return;
        };
        let expected = self.quantity * self.unit_price;
        let bound = (total.abs() * tolerance).max(Decimal::new(1, 2));
        self.total_mismatch = (expected - total).abs() > bound;
    }

    /// Fixed-increment confidence: usable name, quantity, unit price, and a
    /// reconciled total each contribute 0.25, capped at 1.0, then scaled by
    /// the source confidence (1.0 for delimited input).
    pub fn score_confidence(&mut self, source_confidence: f64, config: &ParserConfig) {
        let mut score: f64 = 0.0;
        if !self.raw_name.is_empty() {
            score += 0.25;
        }
        if self.quantity > Decimal::ZERO {
            score += 0.25;
        }
        if self.unit_price > Decimal::ZERO && !self.derived_unit_price {
            score += 0.25;
        }
        if self.total_price.is_some() && !self.total_mismatch {
            score += 0.25;
        }
        self.line_confidence = (score.min(1.0) * source_confidence.clamp(0.0, 1.0) * 100.0)
            .round()
            / 100.0;
        self.needs_review = self.line_confidence < config.review_floor;
    }

    /// Effective line value for summaries: printed total when trusted,
    /// otherwise quantity * unit_price.
    pub fn line_value(&self) -> Decimal {
        match self.total_price {
            Some(total) if !self.total_mismatch => total,
            _ => self.quantity * self.unit_price,
        }
    }

    pub fn line_value_f64(&self) -> f64 {
        self.line_value().to_f64().unwrap_or(0.0)
    }
}

/// Per-line parse result: tagged variants, never optional-field dictionaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineOutcome {
    Parsed(ParsedLine),
    Failed(LineError),
}

impl LineOutcome {
    pub fn line_index(&self) -> usize {
        match self {
            LineOutcome::Parsed(line) => line.line_index,
            LineOutcome::Failed(err) => err.line_index,
        }
    }

    pub fn as_parsed(&self) -> Option<&ParsedLine> {
        match self {
            LineOutcome::Parsed(line) => Some(line),
            LineOutcome::Failed(_) => None,
        }
    }
}

/// Parser tuning knobs. Defaults mirror observed receipt behavior; callers
/// may deserialize overrides from their own config source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Relative tolerance for total reconciliation (0.02 = 2%).
    pub total_tolerance: Decimal,
    /// Confidence floor below which a line is routed to manual review.
    pub review_floor: f64,
    /// Hard cap on emitted lines per invoice.
    pub max_lines: usize,
    /// Case-insensitive substrings marking header/footer boilerplate; the
    /// matching OCR lines are dropped, not reported as errors.
    pub denylist: Vec<String>,
    /// Unit prices at or above this are OCR junk, reject the candidate.
    pub max_unit_price: Decimal,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            total_tolerance: Decimal::new(2, 2),
            review_floor: 0.4,
            max_lines: 200,
            denylist: [
                "KDV", "TOPLAM", "FATURA", "NAKIT", "NAKİT", "VISA", "GENEL", "TOTAL", "TAX",
                "SUBTOTAL", "THANK", "TEŞEKKÜR",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_unit_price: Decimal::new(10_000, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn reconcile_within_tolerance() {
        let mut line = ParsedLine::new(0, "Süt");
        line.quantity = dec("24");
        line.unit_price = dec("28.50");
        line.total_price = Some(dec("684.10"));
        line.reconcile_total(dec("0.02"));
        // 24 * 28.50 = 684.00, within 2% of 684.10.
        assert!(!line.total_mismatch);
    }

    #[test]
    fn reconcile_flags_but_keeps_values() {
        let mut line = ParsedLine::new(0, "Süt");
        line.quantity = dec("24");
        line.unit_price = dec("28.50");
        line.total_price = Some(dec("500.00"));
        line.reconcile_total(dec("0.02"));
        assert!(line.total_mismatch);
        assert_eq!(line.total_price, Some(dec("500.00")));
        assert_eq!(line.unit_price, dec("28.50"));
    }

    #[test]
    fn confidence_increments_and_floor() {
        let config = ParserConfig::default();
        let mut line = ParsedLine::new(0, "Süt");
        line.quantity = dec("2");
        line.unit_price = dec("10");
        line.score_confidence(1.0, &config);
        assert!((line.line_confidence - 0.75).abs() < 1e-9);
        assert!(!line.needs_review);

        line.score_confidence(0.5, &config);
        assert!((line.line_confidence - 0.38).abs() < 1e-9);
        assert!(line.needs_review);
    }
}
