// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key layout inside the record ledger.
//!
//! ```text
//! {namespace}_keys    # index: JSON array of record ids, creation order
//! {namespace}_{id}    # one JSON record document per id
//! ```
//!
//! The default namespace `token` matches the keys written by the existing web
//! client, so ledgers it populated stay readable.

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "token";

/// Key derivation for the index and per-record entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerKeys {
    namespace: String,
}

impl Default for LedgerKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl LedgerKeys {
    /// Create a key layout under a custom namespace (useful for testing).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Well-known key holding the record index.
    pub fn index(&self) -> String {
        format!("{}_keys", self.namespace)
    }

    /// Key of a specific record.
    pub fn record(&self, record_id: &str) -> String {
        format!("{}_{record_id}", self.namespace)
    }

    /// Whether `record_id` would derive the index key.
    pub fn is_reserved(&self, record_id: &str) -> bool {
        self.record(record_id) == self.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_legacy_keys() {
        let keys = LedgerKeys::default();
        assert_eq!(keys.index(), "token_keys");
        assert_eq!(
            keys.record("royalty-1700000000000-ab12"),
            "token_royalty-1700000000000-ab12"
        );
    }

    #[test]
    fn index_suffix_is_reserved() {
        let keys = LedgerKeys::default();
        assert!(keys.is_reserved("keys"));
        assert!(!keys.is_reserved("royalty-1-abcd"));
        assert!(!keys.is_reserved("Keys"));
    }

    #[test]
    fn custom_namespace_for_testing() {
        let keys = LedgerKeys::new("test");
        assert_eq!(keys.namespace(), "test");
        assert_eq!(keys.index(), "test_keys");
        assert_eq!(keys.record("r1"), "test_r1");
    }
}
