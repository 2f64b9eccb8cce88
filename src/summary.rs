//! Time-windowed rollups over the transaction history.
//!
//! Aggregation is a pure read: identical history and window produce
//! identical output regardless of append order.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::Amount;
use crate::model::{FuelTransaction, TxKind, VehicleId};

/// One calendar day in an explicit operator time zone.
///
/// Date-boundary semantics change the reported totals, so the zone is part
/// of the window rather than a hidden default, and the "current instant" is
/// injected by the caller rather than read from an ambient clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    date: NaiveDate,
    zone: FixedOffset,
}

impl DayWindow {
    /// The window covering the calendar date that `now` falls on in `zone`.
    pub fn containing(now: DateTime<Utc>, zone: FixedOffset) -> Self {
        Self {
            date: now.with_timezone(&zone).date_naive(),
            zone,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether `at` falls on this window's date in the window's zone.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at.with_timezone(&self.zone).date_naive() == self.date
    }

    /// The window as a half-open UTC instant range, for store-level filters.
    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_midnight = self.date.and_time(NaiveTime::MIN);
        let naive_utc = local_midnight - Duration::seconds(self.zone.local_minus_utc() as i64);
        let start = DateTime::<Utc>::from_naive_utc_and_offset(naive_utc, Utc);
        (start, start + Duration::days(1))
    }
}

/// Rollup of the transactions inside one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Number of dispense records in the window.
    pub record_count: usize,
    /// Liters dispensed to vehicles in the window.
    pub dispensed_volume: Amount,
    /// Total cost of dispensed fuel in the window.
    pub dispensed_cost: Amount,
    /// Per-vehicle totals, for downstream fuel-efficiency analysis.
    pub per_vehicle: HashMap<VehicleId, VehicleTotals>,
    /// Refills are excluded from dispensed totals but rolled up separately.
    pub refill_count: usize,
    pub refill_volume: Amount,
    pub refill_cost: Amount,
}

/// Summed dispenses for a single vehicle within a window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleTotals {
    pub volume: Amount,
    pub cost: Amount,
    pub records: usize,
}

/// Roll up the history entries that fall inside the window.
pub fn summarize<'a>(
    history: impl IntoIterator<Item = &'a FuelTransaction>,
    window: &DayWindow,
) -> Summary {
    let mut summary = Summary::default();

    for tx in history {
        if !window.contains(tx.occurred_at) {
            continue;
        }
        match tx.kind {
            TxKind::Dispense => {
                summary.record_count += 1;
                summary.dispensed_volume += tx.volume;
                summary.dispensed_cost += tx.total_cost;
                if let Some(vehicle) = &tx.vehicle {
                    let totals = summary.per_vehicle.entry(vehicle.clone()).or_default();
                    totals.volume += tx.volume;
                    totals.cost += tx.total_cost;
                    totals.records += 1;
                }
            }
            TxKind::Refill => {
                summary.refill_count += 1;
                summary.refill_volume += tx.volume;
                summary.refill_cost += tx.total_cost;
            }
        }
    }

    summary
}
