use chrono::{DateTime, Utc};

use crate::Amount;

/// Current tank state, derived by folding the transaction history.
///
/// Never stored independently; the ledger is the source of truth and this
/// read model is re-derivable from it at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct TankState {
    pub capacity: Amount,
    pub level: Amount,
    pub low_fuel_threshold_percent: f64,
    pub last_refill: Option<LastRefill>,
}

/// Metadata of the most recent refill in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct LastRefill {
    pub occurred_at: DateTime<Utc>,
    pub volume: Amount,
    pub unit_cost: Amount,
}

impl TankState {
    /// Level over capacity as a percentage, clamped to `[0, 100]`.
    pub fn fill_percentage(&self) -> f64 {
        self.level.percent_of(self.capacity).clamp(0.0, 100.0)
    }

    /// Whether the fill percentage is below the configured alert threshold.
    pub fn is_low_fuel(&self) -> bool {
        self.fill_percentage() < self.low_fuel_threshold_percent
    }
}
