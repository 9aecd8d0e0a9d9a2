use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfline_core::ProductId;

/// One day's sales for a product. Multiple observations on the same date are
/// legal and are summed before averaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub date: NaiveDate,
    pub qty_sold: Decimal,
}

impl SalesObservation {
    pub fn new(date: NaiveDate, qty_sold: Decimal) -> Self {
        Self { date, qty_sold }
    }
}

/// Reorder suggestion for one product.
///
/// `avg_daily_demand` is the mean over the trailing basis window;
/// `safety_stock = avg_daily_demand * safety_factor` is a simple-multiplier
/// approximation, not a statistical variance model. `suggested_reorder_qty`
/// is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSuggestion {
    pub product_id: ProductId,
    pub avg_daily_demand: Decimal,
    pub safety_stock: Decimal,
    pub suggested_reorder_qty: Decimal,
    pub lead_time_days: u32,
    /// Days of history the average was actually computed over; zero when the
    /// history was empty.
    pub basis_window_days: u32,
}

impl ForecastSuggestion {
    /// The defined result for an empty sales history.
    pub fn empty(product_id: ProductId, lead_time_days: u32) -> Self {
        Self {
            product_id,
            avg_daily_demand: Decimal::ZERO,
            safety_stock: Decimal::ZERO,
            suggested_reorder_qty: Decimal::ZERO,
            lead_time_days,
            basis_window_days: 0,
        }
    }
}
