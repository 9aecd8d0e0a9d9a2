//! Delimited import row parsing.
//!
//! Rows arrive already keyed to the fixed column set (see
//! [`crate::input::read_delimited`]). A bad row yields one `LineError` and
//! processing continues; the import is never rejected wholesale.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shelfline_core::{LineError, LineErrorKind};

use crate::input::ImportRow;
use crate::line::{LineOutcome, ParsedLine, ParserConfig};
use crate::numeric::parse_decimal;

/// Parse import rows into per-row outcomes, preserving input order.
pub fn parse_rows(rows: &[ImportRow], config: &ParserConfig) -> Vec<LineOutcome> {
    let mut out = Vec::with_capacity(rows.len().min(config.max_lines));
    for (index, row) in rows.iter().take(config.max_lines).enumerate() {
        out.push(parse_row(index, row, config));
    }
    let failed = out
        .iter()
        .filter(|o| matches!(o, LineOutcome::Failed(_)))
        .count();
    if failed > 0 {
        tracing::info!(rows = rows.len(), failed, "delimited import had bad rows");
    }
    out
}

fn parse_row(index: usize, row: &ImportRow, config: &ParserConfig) -> LineOutcome {
    let name = match row.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return LineOutcome::Failed(LineError::missing_field(index, "name")),
    };

    let quantity = match row.quantity.as_deref().map(str::trim) {
        None | Some("") => {
            return LineOutcome::Failed(LineError::missing_field(index, "quantity"));
        }
        Some(token) => match parse_decimal(token) {
            Some(q) if q > Decimal::ZERO => q,
            Some(_) => {
                return LineOutcome::Failed(LineError::out_of_range(
                    index,
                    "quantity must be positive",
                ));
            }
            None => return LineOutcome::Failed(LineError::invalid_number(index, token)),
        },
    };

    let unit_price = match row.unit_price.as_deref().map(str::trim) {
        None | Some("") => Decimal::ZERO,
        Some(token) => match parse_decimal(token) {
            Some(p) if p >= Decimal::ZERO => p,
            Some(_) => {
                return LineOutcome::Failed(LineError::out_of_range(
                    index,
                    "unit price must be non-negative",
                ));
            }
            None => return LineOutcome::Failed(LineError::invalid_number(index, token)),
        },
    };

    let expiry_date = match row.expiry_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(token) => match parse_import_date(token) {
            Some(date) => Some(date),
            None => return LineOutcome::Failed(LineError::malformed_date(index, token)),
        },
    };

    let mut line = ParsedLine::new(index, name);
    line.quantity = quantity;
    line.unit_price = unit_price;
    line.barcode_raw = row.barcode.as_deref().map(str::trim).map(str::to_string);
    line.expiry_date = expiry_date;
    line.category = row.category.clone();
    // Imports carry no OCR uncertainty; confidence reflects field coverage only.
    line.score_confidence(1.0, config);
    LineOutcome::Parsed(line)
}

/// `YYYY-MM-DD` is the canonical import form; the OCR-era formats are
/// accepted as fallbacks for hand-edited files.
fn parse_import_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .ok()
        .or_else(|| shelfline_gs1::parse_flexible_date(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        name: Option<&str>,
        barcode: Option<&str>,
        quantity: Option<&str>,
        unit_price: Option<&str>,
        expiry: Option<&str>,
        category: Option<&str>,
    ) -> ImportRow {
        ImportRow {
            name: name.map(Into::into),
            barcode: barcode.map(Into::into),
            quantity: quantity.map(Into::into),
            unit_price: unit_price.map(Into::into),
            expiry_date: expiry.map(Into::into),
            category: category.map(Into::into),
        }
    }

    #[test]
    fn canonical_row_parses() {
        let rows = [row(
            Some("Süt Tam Yağlı 1L"),
            Some("8690504321001"),
            Some("24"),
            Some("28.50"),
            Some("2024-12-03"),
            Some("Süt Ürünleri"),
        )];
        let out = parse_rows(&rows, &ParserConfig::default());
        assert_eq!(out.len(), 1);
        let line = out[0].as_parsed().unwrap();
        assert_eq!(line.raw_name, "Süt Tam Yağlı 1L");
        assert_eq!(line.quantity, "24".parse::<Decimal>().unwrap());
        assert_eq!(line.unit_price, "28.50".parse::<Decimal>().unwrap());
        assert_eq!(
            line.expiry_date,
            NaiveDate::from_ymd_opt(2024, 12, 3)
        );
        assert_eq!(line.barcode_raw.as_deref(), Some("8690504321001"));
        assert_eq!(line.category.as_deref(), Some("Süt Ürünleri"));
        assert!(!line.needs_review);
    }

    #[test]
    fn comma_decimal_accepted() {
        let rows = [row(Some("Yoğurt"), None, Some("3"), Some("45,90"), None, None)];
        let out = parse_rows(&rows, &ParserConfig::default());
        let line = out[0].as_parsed().unwrap();
        assert_eq!(line.unit_price, "45.90".parse::<Decimal>().unwrap());
    }

    #[test]
    fn missing_quantity_fails_only_that_row() {
        let rows = [
            row(Some("Peynir"), None, Some("2"), Some("90"), None, None),
            row(Some("Ekmek"), None, None, Some("7.5"), None, None),
            row(Some("Zeytin"), None, Some("1"), Some("120"), None, None),
        ];
        let out = parse_rows(&rows, &ParserConfig::default());
        assert_eq!(out.len(), 3);
        assert!(out[0].as_parsed().is_some());
        match &out[1] {
            LineOutcome::Failed(err) => {
                assert_eq!(err.line_index, 1);
                assert_eq!(err.kind, LineErrorKind::MissingField);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(out[2].as_parsed().is_some());
    }

    #[test]
    fn missing_name_fails() {
        let rows = [row(None, None, Some("2"), None, None, None)];
        match &parse_rows(&rows, &ParserConfig::default())[0] {
            LineOutcome::Failed(err) => assert_eq!(err.kind, LineErrorKind::MissingField),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_quantity_fails() {
        let rows = [row(Some("Peynir"), None, Some("0"), None, None, None)];
        match &parse_rows(&rows, &ParserConfig::default())[0] {
            LineOutcome::Failed(err) => assert_eq!(err.kind, LineErrorKind::OutOfRange),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_date_fails() {
        let rows = [row(Some("Peynir"), None, Some("2"), None, Some("soon"), None)];
        match &parse_rows(&rows, &ParserConfig::default())[0] {
            LineOutcome::Failed(err) => assert_eq!(err.kind, LineErrorKind::MalformedDate),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn fallback_date_formats_accepted() {
        let rows = [row(Some("Peynir"), None, Some("2"), None, Some("03.12.2024"), None)];
        let out = parse_rows(&rows, &ParserConfig::default());
        let line = out[0].as_parsed().unwrap();
        assert_eq!(line.expiry_date, NaiveDate::from_ymd_opt(2024, 12, 3));
    }
}
