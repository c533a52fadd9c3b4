// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Royalty Registry
//!
//! Typed record management on top of a [`RecordStore`].
//!
//! ## Protocol
//!
//! - `create` writes the record under its derived key first, then appends the
//!   id to the index (read, append, write). The two writes are not atomic as
//!   a pair: if the append fails the record is reachable by id only.
//! - Index appends are serialized inside one registry. Across processes the
//!   ledger offers no compare-and-swap, so the last writer wins.
//! - Batch reads (`list_ids`, `load_all`) never fail. Unreadable entries are
//!   logged and skipped.
//! - `set_status` rewrites the whole document with only `status` replaced.

use chrono::Utc;
use serde_json::Map;
use tokio::sync::Mutex;

use crate::encoding::{EncodingTransform, TaggedBase64Transform};
use crate::ledger::{LedgerKeys, RecordStore};

pub mod error;
pub mod ownership;
pub mod record;

pub use error::{ErrorKind, RegistryError, RegistryResult};
pub use ownership::{NotOwner, OwnedResource, OwnershipEnforcer};
pub use record::{NewRoyalty, RoyaltyDescriptor, RoyaltyFilter, RoyaltyRecord, RoyaltyStatus};

use record::{decode_document, decode_index, encode_document, encode_index, RecordDocument};

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a record id: `royalty-<unix millis>-<4 random base36 chars>`.
pub fn generate_record_id(now_millis: i64) -> String {
    let mut entropy = uuid::Uuid::new_v4().as_u128();
    let suffix: String = (0..4)
        .map(|_| {
            let c = ID_ALPHABET[(entropy % 36) as usize] as char;
            entropy /= 36;
            c
        })
        .collect();
    format!("royalty-{now_millis}-{suffix}")
}

/// Registry of royalty records kept in a key-value ledger.
pub struct RecordRegistry<S, T = TaggedBase64Transform> {
    store: S,
    transform: T,
    keys: LedgerKeys,
    index_lock: Mutex<()>,
}

impl<S: RecordStore, T: EncodingTransform> RecordRegistry<S, T> {
    /// Create a registry using the default key layout.
    pub fn new(store: S, transform: T) -> Self {
        Self::with_keys(store, transform, LedgerKeys::default())
    }

    pub fn with_keys(store: S, transform: T, keys: LedgerKeys) -> Self {
        Self {
            store,
            transform,
            keys,
            index_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn keys(&self) -> &LedgerKeys {
        &self.keys
    }

    // ========== Enumeration ==========

    /// Ids in the index, in append order.
    ///
    /// An unavailable ledger or an unreadable index yields an empty list.
    pub async fn list_ids(&self) -> Vec<String> {
        if !self.store.is_available().await {
            tracing::warn!("Ledger unavailable, listing no records");
            return Vec::new();
        }

        match self.read_index().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(key = %self.keys.index(), error = %e, "Failed to read record index");
                Vec::new()
            }
        }
    }

    /// All readable indexed records, newest first.
    ///
    /// Records sharing a timestamp keep their index order.
    pub async fn load_all(&self) -> Vec<RoyaltyRecord> {
        let ids = self.list_ids().await;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&id).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(record_id = %id, error = %e, "Skipping unreadable record");
                }
            }
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    // ========== Single-record operations ==========

    /// Look up a record directly by id, indexed or not.
    pub async fn get(&self, id: &str) -> RegistryResult<RoyaltyRecord> {
        let doc = self.read_document(id).await?;
        Ok(RoyaltyRecord::from_document(id, doc))
    }

    /// Register a new royalty valuation owned by `owner`.
    ///
    /// The plaintext value is encoded before anything is written.
    ///
    /// # Errors
    /// - `StoreUnavailable` if the ledger is down; nothing is written
    /// - `Unindexed` if the record was written but the index append failed
    pub async fn create(&self, new: NewRoyalty, owner: &str) -> RegistryResult<RoyaltyRecord> {
        if !self.store.is_available().await {
            return Err(RegistryError::StoreUnavailable(
                "ledger is not available".to_string(),
            ));
        }

        let now = Utc::now();
        let id = generate_record_id(now.timestamp_millis());
        let doc = RecordDocument {
            artist: new.descriptor.artist,
            song_title: new.descriptor.song_title,
            encrypted_royalty_value: self.transform.encode(new.royalty_value),
            token_amount: new.token_amount,
            timestamp: now.timestamp(),
            owner: Some(owner.to_string()),
            status: RoyaltyStatus::Pending,
            extra: Map::new(),
        };

        let bytes = encode_document(&doc)?;
        self.store.set(&self.keys.record(&id), &bytes).await?;

        if let Err(e) = self.append_to_index(&id).await {
            tracing::error!(
                record_id = %id,
                error = %e,
                "Record persisted but index append failed, reachable by id only"
            );
            return Err(RegistryError::Unindexed {
                id,
                source: Box::new(e),
            });
        }

        tracing::info!(record_id = %id, owner, "Royalty record created");
        Ok(RoyaltyRecord::from_document(id, doc))
    }

    /// Move a record to `status`, keeping every other field as stored.
    ///
    /// # Errors
    /// - `NotFound` if no record is stored under `id`
    /// - `InvalidTransition` unless the move is `pending -> active`
    pub async fn set_status(
        &self,
        id: &str,
        status: RoyaltyStatus,
    ) -> RegistryResult<RoyaltyRecord> {
        if !self.store.is_available().await {
            return Err(RegistryError::StoreUnavailable(
                "ledger is not available".to_string(),
            ));
        }

        let mut doc = self.read_document(id).await?;
        if !doc.status.can_advance_to(status) {
            return Err(RegistryError::InvalidTransition {
                from: doc.status,
                to: status,
            });
        }

        let previous = doc.status;
        doc.status = status;
        let bytes = encode_document(&doc)?;
        self.store.set(&self.keys.record(id), &bytes).await?;

        tracing::info!(record_id = %id, from = %previous, to = %status, "Royalty status changed");
        Ok(RoyaltyRecord::from_document(id, doc))
    }

    /// Shorthand for `set_status(id, Active)`.
    pub async fn activate(&self, id: &str) -> RegistryResult<RoyaltyRecord> {
        self.set_status(id, RoyaltyStatus::Active).await
    }

    // ========== Internals ==========

    async fn read_index(&self) -> RegistryResult<Vec<String>> {
        let bytes = self.store.get(&self.keys.index()).await?;
        Ok(decode_index(&bytes)?)
    }

    async fn read_document(&self, id: &str) -> RegistryResult<RecordDocument> {
        if self.keys.is_reserved(id) {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        let bytes = self.store.get(&self.keys.record(id)).await?;
        if bytes.is_empty() {
            return Err(RegistryError::NotFound(id.to_string()));
        }
        Ok(decode_document(&bytes)?)
    }

    /// Read-modify-write of the index. A corrupt index is left untouched.
    async fn append_to_index(&self, id: &str) -> RegistryResult<()> {
        let _guard = self.index_lock.lock().await;

        let mut ids = self.read_index().await?;
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }

        let bytes = encode_index(&ids)?;
        self.store.set(&self.keys.index(), &bytes).await?;
        Ok(())
    }
}
