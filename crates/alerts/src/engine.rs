//! Idempotent alert recomputation over the current batch set.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfline_core::{AlertId, BatchId, ProductId};

use crate::alert::{Alert, AlertStatus, Severity};

/// The slice of a stock batch the engine needs. Batches are owned by the
/// external store; this is a read-only view passed per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    pub batch_id: BatchId,
    pub product_id: ProductId,
    pub expiry_date: Option<NaiveDate>,
    pub quantity: Decimal,
    pub lot_code: Option<String>,
}

/// Warning-window policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Batches expiring within this many days get an alert.
    pub window_days: i64,
    /// Within this many days the alert is red instead of yellow.
    pub red_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            red_days: 3,
        }
    }
}

impl AlertConfig {
    fn severity_for(&self, days_left: i64) -> Severity {
        if days_left <= self.red_days {
            Severity::Red
        } else {
            Severity::Yellow
        }
    }
}

/// Result of one refresh pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// The full post-refresh alert set, one per tracked (product, batch).
    pub alerts: Vec<Alert>,
    /// Alerts that became red during this pass (created red, or upgraded
    /// from yellow). Callers drive critical notifications off this list;
    /// delivery itself is out of scope here.
    pub newly_red: Vec<AlertId>,
}

/// Recompute the alert set for the given batches as of `today`.
///
/// Idempotent: one alert per (product_id, batch_id); re-running against an
/// unchanged batch set updates `days_left`/`severity` in place, never
/// duplicates, and never downgrades `ack`/`snoozed` back to `active` except
/// through the snooze-expiry rule.
pub fn refresh(
    existing: Vec<Alert>,
    batches: &[BatchSnapshot],
    today: NaiveDate,
    config: &AlertConfig,
) -> RefreshOutcome {
    let mut by_key: HashMap<(ProductId, BatchId), Alert> = existing
        .into_iter()
        .map(|mut a| {
            a.dirty = false;
            ((a.product_id, a.batch_id), a)
        })
        .collect();

    let mut alerts = Vec::new();
    let mut newly_red = Vec::new();

    for batch in batches {
        let Some(expiry) = batch.expiry_date else {
            continue;
        };
        let key = (batch.product_id, batch.batch_id);
        let days_left = (expiry - today).num_days();
        let prior = by_key.remove(&key);

        // Zero stock or already past expiry: terminal.
        if batch.quantity <= Decimal::ZERO || days_left < 0 {
            if let Some(mut alert) = prior {
                alert.expire();
                tracing::info!(batch_id = %batch.batch_id, "alert expired");
                alerts.push(alert);
            }
            continue;
        }

        // Outside the warning window no alert exists; a previously tracked
        // batch whose date moved out (data correction) is dropped.
        if days_left > config.window_days {
            continue;
        }

        let severity = config.severity_for(days_left);
        match prior {
            // Expired is terminal; a batch that reappears in the window (a
            // data correction upstream) does not revive its old alert.
            Some(alert) if alert.is_expired() => alerts.push(alert),
            Some(mut alert) => {
                let was_red = alert.severity == Severity::Red;
                if alert.days_left != days_left {
                    alert.days_left = days_left;
                    alert.dirty = true;
                }
                if alert.severity != severity {
                    alert.severity = severity;
                    alert.dirty = true;
                }
                if !was_red && severity == Severity::Red {
                    newly_red.push(alert.id);
                }
                revert_elapsed_snooze(&mut alert, today);
                alerts.push(alert);
            }
            None => {
                let alert = Alert::new(batch.product_id, batch.batch_id, expiry, days_left, severity);
                tracing::info!(
                    batch_id = %batch.batch_id,
                    days_left,
                    ?severity,
                    "created expiry alert"
                );
                if severity == Severity::Red {
                    newly_red.push(alert.id);
                }
                alerts.push(alert);
            }
        }
    }

    // Alerts whose batches vanished from the snapshot: consumed or deleted
    // upstream; close them out rather than orphaning active records.
    for (_, mut alert) in by_key {
        alert.expire();
        alerts.push(alert);
    }

    RefreshOutcome { alerts, newly_red }
}

/// Snoozed alerts revert to active once `today` reaches `snooze_until`,
/// provided the batch is still inside the warning window (the caller already
/// checked that by the time we get here).
fn revert_elapsed_snooze(alert: &mut Alert, today: NaiveDate) {
    if alert.status == AlertStatus::Snoozed {
        if let Some(until) = alert.snooze_until {
            if today >= until {
                alert.status = AlertStatus::Active;
                alert.snooze_until = None;
                alert.dirty = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 3, 1)
    }

    fn batch(expiry_in_days: i64) -> BatchSnapshot {
        BatchSnapshot {
            batch_id: BatchId::new(),
            product_id: ProductId::new(),
            expiry_date: Some(today() + Duration::days(expiry_in_days)),
            quantity: Decimal::TEN,
            lot_code: Some("LOT1".to_string()),
        }
    }

    #[test]
    fn near_expiry_batch_creates_red_alert() {
        let batches = [batch(2)];
        let outcome = refresh(Vec::new(), &batches, today(), &AlertConfig::default());
        assert_eq!(outcome.alerts.len(), 1);
        let alert = &outcome.alerts[0];
        assert_eq!(alert.severity, Severity::Red);
        assert_eq!(alert.days_left, 2);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(outcome.newly_red, vec![alert.id]);
    }

    #[test]
    fn mid_window_batch_is_yellow() {
        let batches = [batch(5)];
        let outcome = refresh(Vec::new(), &batches, today(), &AlertConfig::default());
        assert_eq!(outcome.alerts[0].severity, Severity::Yellow);
        assert!(outcome.newly_red.is_empty());
    }

    #[test]
    fn outside_window_creates_nothing() {
        let batches = [batch(10)];
        let outcome = refresh(Vec::new(), &batches, today(), &AlertConfig::default());
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn refresh_is_idempotent() {
        let batches = [batch(5)];
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &batches, today(), &config);
        let second = refresh(first.alerts.clone(), &batches, today(), &config);
        assert_eq!(second.alerts.len(), 1);
        assert_eq!(second.alerts[0].id, first.alerts[0].id);
        assert!(!second.alerts[0].dirty);
        assert!(second.newly_red.is_empty());
    }

    #[test]
    fn severity_upgrade_reports_newly_red() {
        let b = batch(5);
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &[b.clone()], today(), &config);
        // Three days later the same batch is 2 days out.
        let later = today() + Duration::days(3);
        let second = refresh(first.alerts.clone(), &[b], later, &config);
        assert_eq!(second.alerts[0].severity, Severity::Red);
        assert_eq!(second.alerts[0].days_left, 2);
        assert_eq!(second.newly_red, vec![first.alerts[0].id]);
    }

    #[test]
    fn ack_survives_refresh() {
        let b = batch(5);
        let config = AlertConfig::default();
        let mut outcome = refresh(Vec::new(), &[b.clone()], today(), &config);
        outcome.alerts[0].acknowledge().unwrap();
        let next = refresh(outcome.alerts, &[b], today(), &config);
        assert_eq!(next.alerts[0].status, AlertStatus::Ack);
    }

    #[test]
    fn snooze_reverts_after_elapse() {
        let b = batch(5);
        let config = AlertConfig::default();
        let mut outcome = refresh(Vec::new(), &[b.clone()], today(), &config);
        outcome.alerts[0].snooze(today(), 1).unwrap();
        assert_eq!(outcome.alerts[0].snooze_until, Some(today() + Duration::days(1)));

        // Same day: still snoozed.
        let same_day = refresh(outcome.alerts.clone(), &[b.clone()], today(), &config);
        assert_eq!(same_day.alerts[0].status, AlertStatus::Snoozed);

        // Next day: back to active, still in window.
        let next_day = refresh(same_day.alerts, &[b], today() + Duration::days(1), &config);
        assert_eq!(next_day.alerts[0].status, AlertStatus::Active);
        assert_eq!(next_day.alerts[0].snooze_until, None);
    }

    #[test]
    fn date_correction_out_of_window_drops_alert() {
        // The batch is healthy again (30 days out), so no alert exists for
        // it; the stale record is dropped, not marked expired.
        let mut b = batch(2);
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &[b.clone()], today(), &config);
        assert_eq!(first.alerts.len(), 1);
        b.expiry_date = Some(today() + Duration::days(30));
        let after = refresh(first.alerts, &[b], today(), &config);
        assert!(after.alerts.is_empty());
    }

    #[test]
    fn past_expiry_transitions_to_expired() {
        let b = batch(2);
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &[b.clone()], today(), &config);
        let after = refresh(first.alerts, &[b], today() + Duration::days(5), &config);
        assert_eq!(after.alerts[0].status, AlertStatus::Expired);
    }

    #[test]
    fn zero_quantity_expires_alert() {
        let mut b = batch(2);
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &[b.clone()], today(), &config);
        b.quantity = Decimal::ZERO;
        let after = refresh(first.alerts, &[b], today(), &config);
        assert_eq!(after.alerts[0].status, AlertStatus::Expired);
    }

    #[test]
    fn vanished_batch_closes_alert() {
        let b = batch(2);
        let config = AlertConfig::default();
        let first = refresh(Vec::new(), &[b], today(), &config);
        let after = refresh(first.alerts, &[], today(), &config);
        assert_eq!(after.alerts[0].status, AlertStatus::Expired);
    }

    #[test]
    fn batches_without_expiry_are_ignored() {
        let mut b = batch(2);
        b.expiry_date = None;
        let outcome = refresh(Vec::new(), &[b], today(), &AlertConfig::default());
        assert!(outcome.alerts.is_empty());
    }
}
