// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded ledger backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `ledger`: key → raw value bytes
//!
//! Each `set` is its own write transaction, which gives the single-key
//! atomic upsert the registry relies on and nothing more.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

use super::{RecordStore, StoreError, StoreResult};

/// Ledger table: key → value bytes.
const LEDGER: TableDefinition<&str, &[u8]> = TableDefinition::new("ledger");

/// File name of the ledger database inside the data directory.
pub const LEDGER_FILE: &str = "ledger.redb";

#[derive(Debug, thiserror::Error)]
pub enum RedbLedgerError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RedbLedgerError> for StoreError {
    fn from(e: RedbLedgerError) -> Self {
        match e {
            RedbLedgerError::RedbDatabase(_) | RedbLedgerError::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Durable key-value ledger stored in a single redb file.
pub struct RedbLedger {
    db: Database,
}

impl RedbLedger {
    /// Open (or create) the ledger database at the given path.
    pub fn open(path: &Path) -> Result<Self, RedbLedgerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LEDGER)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open the ledger file inside a data directory.
    pub fn open_in(data_dir: &Path) -> Result<Self, RedbLedgerError> {
        Self::open(&data_dir.join(LEDGER_FILE))
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, RedbLedgerError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LEDGER)?;
        match table.get(key)? {
            Some(value) => Ok(value.value().to_vec()),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), RedbLedgerError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LEDGER)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl RecordStore for RedbLedger {
    async fn is_available(&self) -> bool {
        self.db.begin_read().is_ok()
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        Ok(self.read(key)?)
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        Ok(self.write(key, value)?)
    }
}
