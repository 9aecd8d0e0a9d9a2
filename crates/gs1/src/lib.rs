//! `shelfline-gs1` — GS1 Application Identifier decoding.
//!
//! Decodes barcode payloads like `01<gtin>17<yymmdd>10<lot>` (raw AI
//! concatenation with FNC1 separators) or the human-readable
//! `(01)...(17)...(10)...` form into typed fields. The decoder never fails:
//! unknown or truncated segments are omitted and the caller keeps the raw
//! string for audit.

pub mod dates;
pub mod decode;
pub mod gtin;

pub use dates::{expand_two_digit_year, parse_expiry_hint, parse_flexible_date};
pub use decode::{Gs1Fields, decode};
pub use gtin::check_digit_valid;

/// FNC1 separator as it appears in scanned GS1-128 payloads (ASCII GS).
pub const FNC1: char = '\u{1D}';
