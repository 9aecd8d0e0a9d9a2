//! Resolution output model.

use serde::{Deserialize, Serialize};
use shelfline_core::LineError;
use shelfline_gs1::Gs1Fields;
use shelfline_matching::{MatchResult, MatchTier};
use shelfline_parser::ParsedLine;

/// A parsed line plus its catalog match — the unit handed to the external
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub line: ParsedLine,
    pub match_result: MatchResult,
    /// Decoded GS1 fields from the line's barcode, when one was present.
    /// Carries the batch/lot code the store needs for batch creation.
    pub gs1: Gs1Fields,
}

/// Per-line resolution outcome, tagged and ordered by `line_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineResolution {
    Resolved(ResolvedLine),
    Failed(LineError),
}

impl LineResolution {
    pub fn line_index(&self) -> usize {
        match self {
            LineResolution::Resolved(r) => r.line.line_index,
            LineResolution::Failed(e) => e.line_index,
        }
    }

    pub fn as_resolved(&self) -> Option<&ResolvedLine> {
        match self {
            LineResolution::Resolved(r) => Some(r),
            LineResolution::Failed(_) => None,
        }
    }
}

/// Invoice-level counts for the caller's per-row rendering and for the
/// all-or-nothing persistence decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub parsed: usize,
    pub failed: usize,
    pub auto: usize,
    pub suggested: usize,
    pub unmatched: usize,
    pub needs_review: usize,
}

/// The single aggregated result for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceResolution {
    /// Ordered by `line_index`; indices match the original input rows.
    pub lines: Vec<LineResolution>,
    pub summary: InvoiceSummary,
    /// OCR source confidence was below the configured floor; callers should
    /// run their OCR fallback before trusting these lines.
    pub low_confidence: bool,
}

impl InvoiceResolution {
    pub fn summarize(lines: Vec<LineResolution>, low_confidence: bool) -> Self {
        let mut summary = InvoiceSummary::default();
        for line in &lines {
            match line {
                LineResolution::Failed(_) => summary.failed += 1,
                LineResolution::Resolved(r) => {
                    summary.parsed += 1;
                    if r.line.needs_review {
                        summary.needs_review += 1;
                    }
                    match r.match_result.tier {
                        MatchTier::Auto => summary.auto += 1,
                        MatchTier::Suggested => summary.suggested += 1,
                        MatchTier::None => summary.unmatched += 1,
                    }
                }
            }
        }
        Self {
            lines,
            summary,
            low_confidence,
        }
    }
}
