//! `shelfline-parser` — invoice line extraction.
//!
//! Turns one raw invoice input (an OCR text block or delimited import rows)
//! into an ordered sequence of parsed lines and per-line errors. One bad line
//! never aborts the rest of the invoice.

pub mod delimited;
pub mod input;
pub mod line;
pub mod numeric;
pub mod ocr;

pub use input::{ImportRow, RawInvoiceInput, read_delimited};
pub use line::{LineOutcome, ParsedLine, ParserConfig};

/// Parse one invoice input into per-line outcomes, ordered by `line_index`.
pub fn parse(input: &RawInvoiceInput, config: &ParserConfig) -> Vec<LineOutcome> {
    match input {
        RawInvoiceInput::OcrText {
            text,
            source_confidence,
        } => ocr::parse_ocr_text(text, *source_confidence, config),
        RawInvoiceInput::Rows(rows) => delimited::parse_rows(rows, config),
    }
}
