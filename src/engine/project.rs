//! Tank state projection: a pure fold over the transaction history.

use crate::model::{FuelTransaction, TankConfig, TxKind};

use super::state::{LastRefill, TankState};

/// Fold the history into the current tank state.
///
/// Transactions are applied in ascending `occurred_at` order, with append
/// order breaking ties. Starting from the configured initial level, each
/// refill adds its volume and each dispense subtracts it; the most recent
/// refill is surfaced as `last_refill`.
///
/// The fold is idempotent: projecting the same history twice yields the same
/// state, so any cached counter can be checked against it.
pub fn project(config: &TankConfig, history: &[FuelTransaction]) -> TankState {
    let mut ordered: Vec<&FuelTransaction> = history.iter().collect();
    // stable sort: ties on occurred_at keep append order
    ordered.sort_by_key(|tx| tx.occurred_at);

    let mut level = config.initial_level;
    let mut last_refill = None;

    for tx in ordered {
        match tx.kind {
            TxKind::Refill => {
                level += tx.volume;
                last_refill = Some(LastRefill {
                    occurred_at: tx.occurred_at,
                    volume: tx.volume,
                    unit_cost: tx.unit_cost,
                });
            }
            TxKind::Dispense => {
                level -= tx.volume;
            }
        }
    }

    TankState {
        capacity: config.capacity,
        level,
        low_fuel_threshold_percent: config.low_fuel_threshold_percent,
        last_refill,
    }
}
