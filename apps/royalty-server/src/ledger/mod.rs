// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Record Ledger
//!
//! The registry persists everything through a [`RecordStore`]: a flat
//! key-value ledger with an availability probe. The store is an external
//! collaborator; this module defines its contract and ships three adapters.
//!
//! ## Contract
//!
//! - `get` returns empty bytes for an absent key, never an error
//! - `set` is an atomic single-key upsert
//! - there are no multi-key transactions
//!
//! ## Adapters
//!
//! - [`InMemoryLedger`] - process-local map, used by tests
//! - [`RedbLedger`] - embedded ACID database file
//! - [`ContractLedger`] - EVM contract exposing `getData` / `setData`

use std::future::Future;

pub mod contract;
pub mod embedded;
pub mod keys;
pub mod memory;

pub use contract::ContractLedger;
pub use embedded::RedbLedger;
pub use keys::LedgerKeys;
pub use memory::InMemoryLedger;

/// Error type for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The ledger is not reachable or not initialized.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger rejected or failed the operation.
    #[error("ledger backend error: {0}")]
    Backend(String),
}

/// Result type for ledger operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value ledger consumed by the registry.
///
/// Every method is a suspension point with no internal timeout.
pub trait RecordStore: Send + Sync {
    /// Whether the ledger is reachable and initialized.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Read a key. Empty bytes mean the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Vec<u8>>> + Send;

    /// Upsert a single key.
    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Ledger backend selected at startup.
pub enum LedgerStore {
    Memory(InMemoryLedger),
    Redb(RedbLedger),
    Contract(ContractLedger),
}

impl LedgerStore {
    /// Short backend name for logs and health output.
    pub fn backend_name(&self) -> &'static str {
        match self {
            LedgerStore::Memory(_) => "memory",
            LedgerStore::Redb(_) => "redb",
            LedgerStore::Contract(_) => "contract",
        }
    }
}

impl RecordStore for LedgerStore {
    async fn is_available(&self) -> bool {
        match self {
            LedgerStore::Memory(store) => store.is_available().await,
            LedgerStore::Redb(store) => store.is_available().await,
            LedgerStore::Contract(store) => store.is_available().await,
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        match self {
            LedgerStore::Memory(store) => store.get(key).await,
            LedgerStore::Redb(store) => store.get(key).await,
            LedgerStore::Contract(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        match self {
            LedgerStore::Memory(store) => store.set(key, value).await,
            LedgerStore::Redb(store) => store.set(key, value).await,
            LedgerStore::Contract(store) => store.set(key, value).await,
        }
    }
}

impl<T: RecordStore> RecordStore for std::sync::Arc<T> {
    fn is_available(&self) -> impl Future<Output = bool> + Send {
        (**self).is_available()
    }

    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Vec<u8>>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).set(key, value)
    }
}
