//! Deterministic reorder computation.

use chrono::Duration;
use rust_decimal::Decimal;
use shelfline_core::{DomainError, DomainResult, ProductId};

use crate::suggestion::{ForecastSuggestion, SalesObservation};

/// Demand forecast job for a single product.
///
/// Model:
/// - Average daily demand over a trailing window anchored at the most recent
///   observation date, clamped to the history actually available.
/// - `safety_stock = avg_daily_demand * safety_factor`.
/// - `suggested_reorder_qty = avg_daily_demand * lead_time_days +
///   safety_stock - current_stock`, floored at zero.
#[derive(Debug, Clone)]
pub struct DemandForecastJob {
    product_id: ProductId,
    history: Vec<SalesObservation>,
    lead_time_days: u32,
    current_stock: Decimal,
    /// Trailing window length in days (must be >= 1).
    window_days: u32,
    /// Simple demand-variance multiplier (must be positive).
    safety_factor: Decimal,
}

impl DemandForecastJob {
    pub fn new(
        product_id: ProductId,
        history: Vec<SalesObservation>,
        lead_time_days: u32,
        current_stock: Decimal,
    ) -> Self {
        Self {
            product_id,
            history,
            lead_time_days,
            current_stock,
            window_days: 28,
            safety_factor: Decimal::new(15, 1),
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn with_safety_factor(mut self, safety_factor: Decimal) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    pub fn run(&self) -> DomainResult<ForecastSuggestion> {
        if self.window_days == 0 {
            return Err(DomainError::validation("window_days must be >= 1"));
        }
        if self.safety_factor <= Decimal::ZERO {
            return Err(DomainError::validation("safety_factor must be positive"));
        }

        // Sparse data is expected, not exceptional.
        let Some(anchor) = self.history.iter().map(|o| o.date).max() else {
            return Ok(ForecastSuggestion::empty(self.product_id, self.lead_time_days));
        };
        let window_start = anchor - Duration::days(i64::from(self.window_days) - 1);
        let earliest = self
            .history
            .iter()
            .map(|o| o.date)
            .filter(|d| *d >= window_start)
            .min()
            .unwrap_or(anchor);

        let total_sold: Decimal = self
            .history
            .iter()
            .filter(|o| o.date >= window_start)
            .map(|o| o.qty_sold)
            .sum();

        // Calendar days covered, not observation count: gaps are zero-demand
        // days and must drag the average down.
        let basis_window_days = ((anchor - earliest).num_days() + 1) as u32;
        let avg_daily_demand =
            (total_sold / Decimal::from(basis_window_days)).round_dp(4);
        let safety_stock = (avg_daily_demand * self.safety_factor).round_dp(4);
        let suggested_reorder_qty = (avg_daily_demand * Decimal::from(self.lead_time_days)
            + safety_stock
            - self.current_stock)
            .round_dp(2)
            .max(Decimal::ZERO);

        tracing::debug!(
            product_id = %self.product_id,
            %avg_daily_demand,
            basis_window_days,
            %suggested_reorder_qty,
            "computed reorder suggestion"
        );

        Ok(ForecastSuggestion {
            product_id: self.product_id,
            avg_daily_demand,
            safety_stock,
            suggested_reorder_qty,
            lead_time_days: self.lead_time_days,
            basis_window_days,
        })
    }
}
