//! `shelfline-alerts` — expiry alert computation.
//!
//! Computes and maintains time-sensitive expiry alerts over the current
//! batch set. The engine owns alert *state*, not delivery: notification
//! transport is an external collaborator. Recomputation is idempotent — the
//! same batch set never creates duplicates or downgrades human decisions.

pub mod alert;
pub mod engine;

pub use alert::{Alert, AlertStatus, Severity};
pub use engine::{AlertConfig, BatchSnapshot, RefreshOutcome, refresh};
