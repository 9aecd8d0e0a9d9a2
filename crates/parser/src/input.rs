//! Raw invoice input shapes.

use serde::{Deserialize, Serialize};
use shelfline_core::{DomainError, DomainResult};

/// One row of a delimited import, already keyed to the fixed column set.
/// Unknown columns from the source file are dropped at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub name: Option<String>,
    pub barcode: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub expiry_date: Option<String>,
    pub category: Option<String>,
}

/// Raw invoice input. Immutable once received; the parser never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInvoiceInput {
    /// OCR-extracted receipt text plus the OCR engine's own confidence.
    OcrText {
        text: String,
        source_confidence: f64,
    },
    /// Header-driven delimited import rows, in file order.
    Rows(Vec<ImportRow>),
}

/// Read header-driven CSV text into import rows.
///
/// Headers are matched case-insensitively against the fixed column set
/// `name, barcode, quantity, unit_price, expiry_date, category`; anything
/// else is ignored. Ragged rows are tolerated (missing cells become `None`
/// and surface later as per-line errors, not a wholesale rejection).
pub fn read_delimited(text: &str) -> DomainResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DomainError::validation(format!("unreadable csv header: {e}")))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| DomainError::validation(format!("unreadable csv record: {e}")))?;
        let mut row = ImportRow::default();
        for (header, value) in headers.iter().zip(record.iter()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match header.as_str() {
                "name" => &mut row.name,
                "barcode" => &mut row.barcode,
                "quantity" => &mut row.quantity,
                "unit_price" => &mut row.unit_price,
                "expiry_date" => &mut row.expiry_date,
                "category" => &mut row.category,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}
