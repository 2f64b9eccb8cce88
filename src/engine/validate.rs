//! Transaction validation: pure checks of a proposed transaction against
//! business rules and the projected tank level. No side effects.

use crate::Amount;
use crate::model::{DispenseRequest, RefillRequest, TankConfig};

use super::error::{EngineError, InputError};

/// Validate a dispense against the current level.
///
/// `level` is the tank level after every previously admitted transaction;
/// the caller holds the tank's admission lock while calling this.
pub(super) fn dispense(
    req: &DispenseRequest,
    config: &TankConfig,
    level: Amount,
) -> Result<(), EngineError> {
    amounts(req.volume, req.total_cost, config)?;

    if req.vehicle.trim().is_empty() {
        return Err(InputError::MissingVehicle.into());
    }

    if (level - req.volume).is_negative() {
        return Err(EngineError::InsufficientReserve {
            tank: req.tank.clone(),
            available: level,
            requested: req.volume,
        });
    }

    Ok(())
}

/// Validate a refill against the current level and capacity.
pub(super) fn refill(
    req: &RefillRequest,
    config: &TankConfig,
    level: Amount,
) -> Result<(), EngineError> {
    amounts(req.volume, req.total_cost, config)?;

    if level + req.volume > config.capacity {
        return Err(EngineError::CapacityExceeded {
            tank: req.tank.clone(),
            level,
            capacity: config.capacity,
            requested: req.volume,
        });
    }

    Ok(())
}

/// Field checks shared by both transaction kinds.
fn amounts(volume: Amount, total_cost: Amount, config: &TankConfig) -> Result<(), InputError> {
    if !volume.is_positive() {
        return Err(InputError::NonPositiveVolume(volume));
    }
    if total_cost.is_negative() {
        return Err(InputError::NegativeCost(total_cost));
    }

    if let Some((min, max)) = config.unit_cost_range {
        let rate = Amount::per_unit(total_cost, volume);
        if rate < min || rate > max {
            return Err(InputError::ImplausibleUnitCost { rate, min, max });
        }
    }

    Ok(())
}
