//! `shelfline-forecast` — reorder suggestions from sales history.
//!
//! A deterministic, pure computation: average daily demand over a trailing
//! window of sales observations, a simple-multiplier safety stock, and a
//! reorder quantity floored at zero. Sparse or empty history yields a zeroed
//! suggestion, never an error.

pub mod job;
pub mod suggestion;

pub use job::DemandForecastJob;
pub use suggestion::{ForecastSuggestion, SalesObservation};
