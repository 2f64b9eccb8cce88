//! Fuel reserve accounting engine.
//!
//! The engine accepts dispense and refill requests, validates them against
//! the projected tank state, appends accepted transactions to the ledger
//! store, and exposes the read models derived from the history. Also
//! supports an async stream of commands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::model::{
    Command, DispenseRequest, NewTransaction, RefillRequest, TankConfig, TankId, TxId, TxKind,
};
use crate::store::LedgerStore;
use crate::summary::{DayWindow, Summary, summarize};

mod error;
pub use error::{EngineError, InputError};

mod state;
pub use state::{LastRefill, TankState};

mod project;
pub use project::project;

mod validate;

/// The accounting engine façade.
///
/// Admission (validate, append, cache update) is serialized per tank, so
/// validation always sees the level after every previously admitted
/// transaction; concurrent requests on different tanks do not contend.
pub struct Engine<S> {
    store: S,
    /// Admission locks and cached levels, keyed by tank.
    tanks: RwLock<HashMap<TankId, Arc<TankSlot>>>,
}

struct TankSlot {
    config: TankConfig,
    reserve: Mutex<Reserve>,
}

/// Cached fold result, maintained under the admission lock.
///
/// The ledger history stays the source of truth; this cache must agree with
/// a full re-projection at all times.
struct Reserve {
    level: Amount,
}

/// Public API
impl<S: LedgerStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tanks: RwLock::new(HashMap::new()),
        }
    }

    /// The persistence collaborator, for read-side access to raw history.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drain a stream of commands, applying each in arrival order.
    ///
    /// Rejections never stop the engine; they are logged and skipped.
    pub async fn run(&self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current engine state.
    pub fn apply(&self, command: Command) -> Result<TxId, EngineError> {
        match command {
            Command::Dispense(req) => self.record_dispense(req),
            Command::Refill(req) => self.record_refill(req),
        }
    }

    /// Record fuel dispensed from a tank to a vehicle.
    ///
    /// Success is reported only after the store confirms the append.
    pub fn record_dispense(&self, req: DispenseRequest) -> Result<TxId, EngineError> {
        let slot = self.slot(&req.tank)?;
        let result = self.admit_dispense(&slot, &req);
        Self::log_result("dispense", &req.tank, req.volume, &result);
        result
    }

    /// Record a tank refill from an external supply.
    pub fn record_refill(&self, req: RefillRequest) -> Result<TxId, EngineError> {
        let slot = self.slot(&req.tank)?;
        let result = self.admit_refill(&slot, &req);
        Self::log_result("refill", &req.tank, req.volume, &result);
        result
    }

    /// Current tank state, projected from the full stored history.
    pub fn tank_state(&self, tank: &str) -> Result<TankState, EngineError> {
        let slot = self.slot(tank)?;
        let history = self.store.list(tank, None)?;
        Ok(project(&slot.config, &history))
    }

    /// Rollup of the calendar day that `now` falls on in the tank's
    /// configured time zone.
    ///
    /// `now` is injected by the caller so tests and replays can supply
    /// deterministic instants.
    pub fn today_summary(&self, tank: &str, now: DateTime<Utc>) -> Result<Summary, EngineError> {
        let slot = self.slot(tank)?;
        let window = DayWindow::containing(now, slot.config.time_zone);
        let history = self.store.list(tank, Some(window.utc_range()))?;
        Ok(summarize(&history, &window))
    }
}

/// Private API
impl<S: LedgerStore> Engine<S> {
    /// Small helper to log admission results
    fn log_result(op: &str, tank: &str, volume: Amount, result: &Result<TxId, EngineError>) {
        match result {
            Ok(id) => {
                info!(tank, tx = *id, volume = %volume, "{op} applied");
            }
            Err(e) => {
                info!(tank, volume = %volume, reason = %e, "{op} rejected");
            }
        }
    }

    /// Look up the slot for a tank, loading config and seeding the cached
    /// level from the stored history on first touch.
    fn slot(&self, tank: &str) -> Result<Arc<TankSlot>, EngineError> {
        if let Some(slot) = self
            .tanks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tank)
        {
            return Ok(Arc::clone(slot));
        }

        let config = self
            .store
            .tank_config(tank)?
            .ok_or_else(|| EngineError::UnknownTank(tank.to_string()))?;
        let history = self.store.list(tank, None)?;
        let seeded = project(&config, &history).level;

        let mut tanks = self.tanks.write().unwrap_or_else(PoisonError::into_inner);
        // another attendant may have raced us here; keep the existing slot
        let slot = tanks.entry(tank.to_string()).or_insert_with(|| {
            Arc::new(TankSlot {
                config,
                reserve: Mutex::new(Reserve { level: seeded }),
            })
        });
        Ok(Arc::clone(slot))
    }

    /// Validate-and-append as one atomic unit under the tank's admission
    /// lock. The cache is updated only after the store confirms the append;
    /// a validation or persistence failure leaves it untouched.
    fn admit_dispense(&self, slot: &TankSlot, req: &DispenseRequest) -> Result<TxId, EngineError> {
        let mut reserve = slot
            .reserve
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        validate::dispense(req, &slot.config, reserve.level)?;

        let stored = self.store.append(
            &req.tank,
            NewTransaction {
                kind: TxKind::Dispense,
                volume: req.volume,
                unit_cost: Amount::per_unit(req.total_cost, req.volume),
                total_cost: req.total_cost,
                occurred_at: req.occurred_at,
                vehicle: Some(req.vehicle.clone()),
                odometer: req.odometer,
                receipt: req.receipt.clone(),
            },
        )?;

        reserve.level -= req.volume;
        Ok(stored.id)
    }

    fn admit_refill(&self, slot: &TankSlot, req: &RefillRequest) -> Result<TxId, EngineError> {
        let mut reserve = slot
            .reserve
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        validate::refill(req, &slot.config, reserve.level)?;

        let stored = self.store.append(
            &req.tank,
            NewTransaction {
                kind: TxKind::Refill,
                volume: req.volume,
                unit_cost: Amount::per_unit(req.total_cost, req.volume),
                total_cost: req.total_cost,
                occurred_at: req.occurred_at,
                vehicle: None,
                odometer: None,
                receipt: req.receipt.clone(),
            },
        )?;

        reserve.level += req.volume;
        Ok(stored.id)
    }

    #[cfg(test)]
    fn cached_level(&self, tank: &str) -> Option<Amount> {
        let tanks = self.tanks.read().unwrap_or_else(PoisonError::into_inner);
        let slot = tanks.get(tank)?;
        let level = slot
            .reserve
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .level;
        Some(level)
    }
}
