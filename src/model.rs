//! Core domain types for the fuel reserve ledger.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::Amount;

/// Ledger transaction identifier, unique per tank, assigned at append time.
pub type TxId = u64;

/// Reserve tank identifier.
pub type TankId = String;

/// Vehicle (fleet truck) identifier.
pub type VehicleId = String;

/// Whether a transaction removes fuel from the tank or adds to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    /// Fuel dispensed from the tank to a vehicle.
    Dispense,
    /// Fuel added to the tank from an external supply.
    Refill,
}

/// A ledger transaction, immutable once appended.
///
/// Corrections are modeled as new offsetting transactions, never as edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTransaction {
    pub id: TxId,
    pub kind: TxKind,
    /// Positive liters moved by this transaction.
    pub volume: Amount,
    /// Per-liter rate, always derived from `total_cost / volume`.
    pub unit_cost: Amount,
    pub total_cost: Amount,
    /// When the fuel physically moved, distinct from append order.
    pub occurred_at: DateTime<Utc>,
    /// Receiving vehicle; present for `Dispense`, absent for `Refill`.
    pub vehicle: Option<VehicleId>,
    /// Odometer reading at dispense time, when the attendant recorded one.
    pub odometer: Option<u32>,
    /// External receipt reference for audit traceability; not unique.
    pub receipt: Option<String>,
}

/// A transaction that passed validation but has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub volume: Amount,
    pub unit_cost: Amount,
    pub total_cost: Amount,
    pub occurred_at: DateTime<Utc>,
    pub vehicle: Option<VehicleId>,
    pub odometer: Option<u32>,
    pub receipt: Option<String>,
}

impl NewTransaction {
    /// Finalize into a stored transaction with the id the store assigned.
    pub fn with_id(self, id: TxId) -> FuelTransaction {
        FuelTransaction {
            id,
            kind: self.kind,
            volume: self.volume,
            unit_cost: self.unit_cost,
            total_cost: self.total_cost,
            occurred_at: self.occurred_at,
            vehicle: self.vehicle,
            odometer: self.odometer,
            receipt: self.receipt,
        }
    }
}

/// Request to record fuel dispensed from a tank to a vehicle.
#[derive(Debug, Clone)]
pub struct DispenseRequest {
    pub tank: TankId,
    pub vehicle: VehicleId,
    pub volume: Amount,
    pub total_cost: Amount,
    pub occurred_at: DateTime<Utc>,
    pub odometer: Option<u32>,
    pub receipt: Option<String>,
}

/// Request to record a tank refill from an external supply.
#[derive(Debug, Clone)]
pub struct RefillRequest {
    pub tank: TankId,
    pub volume: Amount,
    pub total_cost: Amount,
    pub occurred_at: DateTime<Utc>,
    pub receipt: Option<String>,
}

/// A request representing the possible inputs of the engine.
#[derive(Debug, Clone)]
pub enum Command {
    Dispense(DispenseRequest),
    Refill(RefillRequest),
}

/// Per-tank configuration, supplied by the persistence collaborator.
#[derive(Debug, Clone)]
pub struct TankConfig {
    /// Fixed positive capacity in liters.
    pub capacity: Amount,
    /// Level the fold starts from; zero for a tank tracked from empty.
    pub initial_level: Amount,
    /// Fill percentage below which the tank is in the low-fuel condition.
    pub low_fuel_threshold_percent: f64,
    /// Operator time zone used to bucket transactions into calendar days.
    pub time_zone: FixedOffset,
    /// Optional plausibility bounds on the derived per-liter rate.
    pub unit_cost_range: Option<(Amount, Amount)>,
}

impl TankConfig {
    pub fn new(capacity: Amount) -> Self {
        Self {
            capacity,
            initial_level: Amount::ZERO,
            low_fuel_threshold_percent: 25.0,
            time_zone: Utc.fix(),
            unit_cost_range: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn new_transaction_with_id_keeps_fields() {
        let tx = NewTransaction {
            kind: TxKind::Dispense,
            volume: Amount::from_float(500.0),
            unit_cost: Amount::from_float(165.0),
            total_cost: Amount::from_float(82_500.0),
            occurred_at: Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap(),
            vehicle: Some("KBX-101".to_string()),
            odometer: Some(120_340),
            receipt: Some("R-1001".to_string()),
        };

        let stored = tx.clone().with_id(7);
        assert_eq!(stored.id, 7);
        assert_eq!(stored.kind, TxKind::Dispense);
        assert_eq!(stored.volume, tx.volume);
        assert_eq!(stored.vehicle.as_deref(), Some("KBX-101"));
        assert_eq!(stored.odometer, Some(120_340));
    }

    #[test]
    fn tank_config_defaults() {
        let config = TankConfig::new(Amount::from_float(30_000.0));
        assert_eq!(config.initial_level, Amount::ZERO);
        assert_eq!(config.low_fuel_threshold_percent, 25.0);
        assert_eq!(config.time_zone.local_minus_utc(), 0);
        assert!(config.unit_cost_range.is_none());
    }
}
