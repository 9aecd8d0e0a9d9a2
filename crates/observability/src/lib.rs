//! `shelfline-observability` — shared tracing/logging setup.
//!
//! The engines emit `tracing` events; this crate is where a binary or
//! integration harness embedding them installs a subscriber. Library crates
//! never install one themselves.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
