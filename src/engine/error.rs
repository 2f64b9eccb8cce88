//! Error types for the accounting engine.

use thiserror::Error;

use crate::Amount;
use crate::model::TankId;
use crate::store::StoreError;

/// Top-level rejection returned by the engine's record operations.
///
/// None of these are fatal; the engine keeps serving requests after any
/// rejection, and a rejected or failed request leaves tank state unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("insufficient reserve in tank {tank}: available {available}, requested {requested}")]
    InsufficientReserve {
        tank: TankId,
        available: Amount,
        requested: Amount,
    },

    #[error("refill exceeds capacity of tank {tank}: level {level} + {requested} > {capacity}")]
    CapacityExceeded {
        tank: TankId,
        level: Amount,
        capacity: Amount,
        requested: Amount,
    },

    #[error("tank {0} is not configured")]
    UnknownTank(TankId),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// A proposed transaction with missing or out-of-range fields.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("volume must be positive, got {0}")]
    NonPositiveVolume(Amount),

    #[error("total cost must be non-negative, got {0}")]
    NegativeCost(Amount),

    #[error("dispense requires a vehicle reference")]
    MissingVehicle,

    #[error("derived unit cost {rate} outside plausible range {min}..{max}")]
    ImplausibleUnitCost {
        rate: Amount,
        min: Amount,
        max: Amount,
    },
}
