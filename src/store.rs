//! Persistence boundary for the transaction ledger.
//!
//! The engine reads and writes through [`LedgerStore`]; the storage substrate
//! behind it is a collaborator concern. [`MemoryLedger`] is the in-memory
//! implementation used by tests, the CLI, and embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{FuelTransaction, NewTransaction, TankConfig, TankId, TxId};

/// Failure surfaced by the persistence collaborator.
///
/// The engine reports these to the caller and never retries on its own;
/// retry policy belongs to the collaborator or the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ledger backend failure: {0}")]
    Backend(String),
}

/// Durable, append-only record keeper for fuel transactions.
///
/// `append` must make the transaction durable before returning; the returned
/// record carries the id the store assigned. `list` returns transactions in
/// append order.
pub trait LedgerStore: Send + Sync {
    /// Configuration for a tank, or `None` if the tank is not provisioned.
    fn tank_config(&self, tank: &str) -> Result<Option<TankConfig>, StoreError>;

    /// Append a validated transaction and return it with its assigned id.
    fn append(&self, tank: &str, tx: NewTransaction) -> Result<FuelTransaction, StoreError>;

    /// Transactions for a tank in append order, optionally restricted to
    /// those with `occurred_at` in the half-open range `[from, to)`.
    fn list(
        &self,
        tank: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<FuelTransaction>, StoreError>;
}

/// In-memory ledger for tests, local replays, and embedding.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<LedgerInner>,
}

#[derive(Default)]
struct LedgerInner {
    configs: HashMap<TankId, TankConfig>,
    streams: HashMap<TankId, Vec<FuelTransaction>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a tank with its configuration.
    pub fn register_tank(&self, tank: &str, config: TankConfig) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.configs.insert(tank.to_string(), config);
    }

    fn next_id(stream: &[FuelTransaction]) -> TxId {
        stream.last().map(|tx| tx.id + 1).unwrap_or(1)
    }
}

impl LedgerStore for MemoryLedger {
    fn tank_config(&self, tank: &str) -> Result<Option<TankConfig>, StoreError> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(inner.configs.get(tank).cloned())
    }

    fn append(&self, tank: &str, tx: NewTransaction) -> Result<FuelTransaction, StoreError> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let stream = inner.streams.entry(tank.to_string()).or_default();
        let stored = tx.with_id(Self::next_id(stream));
        stream.push(stored.clone());
        Ok(stored)
    }

    fn list(
        &self,
        tank: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<FuelTransaction>, StoreError> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let stream = inner.streams.get(tank).map(Vec::as_slice).unwrap_or(&[]);
        let txs = match range {
            Some((from, to)) => stream
                .iter()
                .filter(|tx| tx.occurred_at >= from && tx.occurred_at < to)
                .cloned()
                .collect(),
            None => stream.to_vec(),
        };
        Ok(txs)
    }
}
