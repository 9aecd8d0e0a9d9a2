//! Parser → Matcher orchestration per invoice.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shelfline_core::CatalogEntry;
use shelfline_gs1::Gs1Fields;
use shelfline_matching::{MatchResult, MatchTier, MatcherConfig, gtin_eq, match_product};
use shelfline_parser::{LineOutcome, ParsedLine, ParserConfig, RawInvoiceInput};

use crate::resolved::{InvoiceResolution, LineResolution, ResolvedLine};

/// Coordinator configuration: the per-stage configs plus the OCR gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub parser: ParserConfig,
    pub matcher: MatcherConfig,
    /// OCR source confidence below this marks the invoice `low_confidence`
    /// so the caller can run its OCR fallback before persisting.
    pub ocr_floor: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            matcher: MatcherConfig::default(),
            ocr_floor: 0.6,
        }
    }
}

impl ResolveConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve one invoice against a catalog snapshot.
///
/// Stateless and synchronous: all context is passed in, nothing blocks on
/// I/O. Per-line matching is parallelized; the output sequence is in
/// `line_index` order regardless.
pub fn resolve_invoice(
    input: &RawInvoiceInput,
    catalog: &[CatalogEntry],
    config: &ResolveConfig,
) -> InvoiceResolution {
    let outcomes = shelfline_parser::parse(input, &config.parser);

    let low_confidence = matches!(
        input,
        RawInvoiceInput::OcrText { source_confidence, .. }
            if *source_confidence < config.ocr_floor
    );

    let lines: Vec<LineResolution> = outcomes
        .into_par_iter()
        .map(|outcome| match outcome {
            LineOutcome::Parsed(line) => {
                LineResolution::Resolved(resolve_line(line, catalog, &config.matcher))
            }
            LineOutcome::Failed(err) => LineResolution::Failed(err),
        })
        .collect();

    let resolution = InvoiceResolution::summarize(lines, low_confidence);
    tracing::info!(
        parsed = resolution.summary.parsed,
        failed = resolution.summary.failed,
        auto = resolution.summary.auto,
        suggested = resolution.summary.suggested,
        unmatched = resolution.summary.unmatched,
        low_confidence,
        "resolved invoice"
    );
    resolution
}

/// Link one parsed line: barcode fast path first, fuzzy fallback second.
fn resolve_line(
    mut line: ParsedLine,
    catalog: &[CatalogEntry],
    matcher: &MatcherConfig,
) -> ResolvedLine {
    let gs1 = line
        .barcode_raw
        .as_deref()
        .map(shelfline_gs1::decode)
        .unwrap_or_default();

    // Backfill expiry from the barcode payload; a printed date on the line
    // itself wins.
    if line.expiry_date.is_none() {
        line.expiry_date = gs1.expiry_date;
    }

    let gtin_candidate = gtin_candidate(&line, &gs1);

    // Fast path: exact barcode identity beats any fuzzy score.
    if let Some(gtin) = gtin_candidate {
        if let Some(entry) = catalog
            .iter()
            .find(|e| e.barcode_gtin.as_deref().is_some_and(|g| gtin_eq(g, gtin)))
        {
            return ResolvedLine {
                line,
                match_result: MatchResult {
                    product_id: Some(entry.product_id),
                    score: 1.0,
                    tier: MatchTier::Auto,
                },
                gs1,
            };
        }
    }

    // Fuzzy fallback; a check-digit-invalid GTIN must not steer tie-breaks.
    let hint = gtin_candidate.filter(|_| gs1.gtin.is_none() || gs1.gtin_valid);
    let match_result = match_product(&line.raw_name, catalog, hint, matcher);
    ResolvedLine {
        line,
        match_result,
        gs1,
    }
}

/// The GTIN to use for catalog identity: a decoded AI(01) payload when
/// present, else a bare 8–14 digit barcode string from the line.
fn gtin_candidate<'a>(line: &'a ParsedLine, gs1: &'a Gs1Fields) -> Option<&'a str> {
    if let Some(gtin) = gs1.gtin.as_deref() {
        return Some(gtin);
    }
    line.barcode_raw
        .as_deref()
        .filter(|b| (8..=14).contains(&b.len()) && b.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shelfline_core::ProductId;
    use shelfline_parser::ImportRow;

    fn entry(sku: &str, name: &str) -> CatalogEntry {
        CatalogEntry::new(ProductId::new(), sku, name, "Süt Ürünleri")
    }

    fn import_row(name: &str, barcode: Option<&str>, qty: &str, price: &str) -> ImportRow {
        ImportRow {
            name: Some(name.to_string()),
            barcode: barcode.map(Into::into),
            quantity: Some(qty.to_string()),
            unit_price: Some(price.to_string()),
            expiry_date: None,
            category: None,
        }
    }

    #[test]
    fn barcode_fast_path_wins_over_fuzzy() {
        let catalog = vec![
            entry("SKU-001", "Tam Yağlı Süt 1L").with_barcode("8690504321001"),
            entry("SKU-002", "Tam Yağlı Süt 1L"),
        ];
        let input = RawInvoiceInput::Rows(vec![import_row(
            "Sut",
            Some("8690504321001"),
            "24",
            "28.50",
        )]);
        let result = resolve_invoice(&input, &catalog, &ResolveConfig::new());
        let resolved = result.lines[0].as_resolved().unwrap();
        assert_eq!(resolved.match_result.tier, MatchTier::Auto);
        assert_eq!(resolved.match_result.score, 1.0);
        assert_eq!(resolved.match_result.product_id, Some(catalog[0].product_id));
    }

    #[test]
    fn fuzzy_fallback_when_barcode_unknown() {
        let catalog = vec![entry("SKU-001", "Tam Yağlı Süt 1L")];
        let input = RawInvoiceInput::Rows(vec![import_row(
            "TAM YAGLI SUT",
            Some("0000000000000"),
            "2",
            "28.50",
        )]);
        let result = resolve_invoice(&input, &catalog, &ResolveConfig::new());
        let resolved = result.lines[0].as_resolved().unwrap();
        assert_ne!(resolved.match_result.tier, MatchTier::None);
        assert_eq!(resolved.match_result.product_id, Some(catalog[0].product_id));
    }

    #[test]
    fn gs1_expiry_backfills_line() {
        let catalog = vec![entry("SKU-001", "Süt")];
        let input = RawInvoiceInput::Rows(vec![import_row(
            "Süt",
            Some("(01)08690000000012(17)261200(10)LOT9"),
            "1",
            "10",
        )]);
        let result = resolve_invoice(&input, &catalog, &ResolveConfig::new());
        let resolved = result.lines[0].as_resolved().unwrap();
        assert_eq!(
            resolved.line.expiry_date,
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert_eq!(resolved.gs1.batch_lot.as_deref(), Some("LOT9"));
    }

    #[test]
    fn failed_rows_keep_position_and_siblings_resolve() {
        let catalog = vec![entry("SKU-001", "Süt")];
        let rows = vec![
            import_row("Süt", None, "2", "10"),
            ImportRow {
                name: Some("Peynir".into()),
                quantity: None,
                ..ImportRow::default()
            },
            import_row("Süt", None, "1", "10"),
        ];
        let result = resolve_invoice(&RawInvoiceInput::Rows(rows), &catalog, &ResolveConfig::new());
        assert_eq!(result.lines.len(), 3);
        assert_eq!(result.lines[0].line_index(), 0);
        assert_eq!(result.lines[1].line_index(), 1);
        assert_eq!(result.lines[2].line_index(), 2);
        assert!(result.lines[1].as_resolved().is_none());
        assert_eq!(result.summary.parsed, 2);
        assert_eq!(result.summary.failed, 1);
    }

    #[test]
    fn low_ocr_confidence_marks_invoice() {
        let input = RawInvoiceInput::OcrText {
            text: "EKMEK x2 @7,50\n".to_string(),
            source_confidence: 0.4,
        };
        let result = resolve_invoice(&input, &[], &ResolveConfig::new());
        assert!(result.low_confidence);
        // Lines are still returned for preview.
        assert_eq!(result.summary.parsed, 1);
    }

    #[test]
    fn summary_counts_tiers() {
        let catalog = vec![entry("SKU-001", "Tam Yağlı Süt")];
        let rows = vec![
            import_row("Tam Yağlı Süt", None, "1", "10"),
            import_row("Krem Şanti", None, "1", "5"),
        ];
        let result = resolve_invoice(&RawInvoiceInput::Rows(rows), &catalog, &ResolveConfig::new());
        assert_eq!(result.summary.auto, 1);
        assert_eq!(result.summary.unmatched, 1);
    }
}
