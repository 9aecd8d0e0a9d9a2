//! Alert record and its closed state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shelfline_core::{AlertId, BatchId, DomainError, DomainResult, ProductId};

/// Alert severity. `red` means the batch expires within the red window
/// (default 3 days); `yellow` covers the rest of the warning window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Yellow,
}

/// Alert lifecycle. A closed enumeration with explicit transitions; invalid
/// states (an expired alert reverting to active) are unrepresentable by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// In the warning window, awaiting attention.
    Active,
    /// A human acknowledged it; refresh must not flip it back to active.
    Ack,
    /// Muted until `snooze_until`; reverts to active once that date passes.
    Snoozed,
    /// Terminal: the batch expired or its quantity reached zero.
    Expired,
}

/// One expiry alert, unique per (product_id, batch_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub product_id: ProductId,
    pub batch_id: BatchId,
    pub expiry_date: NaiveDate,
    /// Days until expiry as of the last refresh; never negative while the
    /// alert is non-expired (a negative computation transitions to expired).
    pub days_left: i64,
    pub severity: Severity,
    pub status: AlertStatus,
    pub snooze_until: Option<NaiveDate>,
    /// Set by the engine when the last refresh changed this record; lets
    /// callers persist only what moved. Not part of the persisted state.
    #[serde(skip)]
    pub dirty: bool,
}

impl Alert {
    pub fn new(
        product_id: ProductId,
        batch_id: BatchId,
        expiry_date: NaiveDate,
        days_left: i64,
        severity: Severity,
    ) -> Self {
        Self {
            id: AlertId::new(),
            product_id,
            batch_id,
            expiry_date,
            days_left: days_left.max(0),
            severity,
            status: AlertStatus::Active,
            snooze_until: None,
            dirty: true,
        }
    }

    /// Acknowledge. Reachable only from `active`.
    pub fn acknowledge(&mut self) -> DomainResult<()> {
        if self.status != AlertStatus::Active {
            return Err(DomainError::invariant(format!(
                "cannot acknowledge alert in {:?} state",
                self.status
            )));
        }
        self.status = AlertStatus::Ack;
        self.dirty = true;
        Ok(())
    }

    /// Snooze for `days` starting at `today`. Reachable from `active` or
    /// `ack`.
    pub fn snooze(&mut self, today: NaiveDate, days: u32) -> DomainResult<()> {
        if !matches!(self.status, AlertStatus::Active | AlertStatus::Ack) {
            return Err(DomainError::invariant(format!(
                "cannot snooze alert in {:?} state",
                self.status
            )));
        }
        if days == 0 {
            return Err(DomainError::validation("snooze days must be positive"));
        }
        self.snooze_until = Some(today + chrono::Duration::days(i64::from(days)));
        self.status = AlertStatus::Snoozed;
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn expire(&mut self) {
        if self.status != AlertStatus::Expired {
            self.status = AlertStatus::Expired;
            self.days_left = 0;
            self.dirty = true;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.status == AlertStatus::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn alert() -> Alert {
        Alert::new(
            ProductId::new(),
            BatchId::new(),
            date(2026, 3, 10),
            5,
            Severity::Yellow,
        )
    }

    #[test]
    fn acknowledge_only_from_active() {
        let mut a = alert();
        a.acknowledge().unwrap();
        assert_eq!(a.status, AlertStatus::Ack);
        assert!(a.acknowledge().is_err());
    }

    #[test]
    fn snooze_from_active_and_ack() {
        let today = date(2026, 3, 5);

        let mut a = alert();
        a.snooze(today, 1).unwrap();
        assert_eq!(a.status, AlertStatus::Snoozed);
        assert_eq!(a.snooze_until, Some(date(2026, 3, 6)));

        let mut b = alert();
        b.acknowledge().unwrap();
        b.snooze(today, 2).unwrap();
        assert_eq!(b.status, AlertStatus::Snoozed);
    }

    #[test]
    fn snooze_rejects_expired_and_zero_days() {
        let today = date(2026, 3, 5);
        let mut a = alert();
        a.expire();
        assert!(a.snooze(today, 1).is_err());

        let mut b = alert();
        assert!(b.snooze(today, 0).is_err());
    }

    #[test]
    fn expired_is_terminal() {
        let mut a = alert();
        a.expire();
        assert!(a.acknowledge().is_err());
        assert!(a.snooze(date(2026, 3, 5), 1).is_err());
    }
}
