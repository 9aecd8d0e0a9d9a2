//! `shelfline-resolve` — invoice resolution coordination.
//!
//! Orchestrates Parser → Matcher per invoice: each parsed line is linked to
//! the catalog via the barcode fast path or the fuzzy matcher, and the whole
//! invoice comes back as one aggregated result the external transactional
//! store can persist atomically. Lines carry no data dependency on each
//! other, so matching runs in parallel; output order is `line_index` order.

pub mod coordinator;
pub mod resolved;

pub use coordinator::{ResolveConfig, resolve_invoice};
pub use resolved::{InvoiceResolution, InvoiceSummary, LineResolution, ResolvedLine};
