// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use alloy::primitives::Address;

use crate::auth::{ConfiguredVerifier, LedgerBinding};
use crate::config::AppConfig;
use crate::decryption::RevealFlow;
use crate::encoding::TaggedBase64Transform;
use crate::ledger::{InMemoryLedger, LedgerKeys, LedgerStore};
use crate::registry::RecordRegistry;

/// Values bound into every issued challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeParams {
    pub contract_address: Address,
    pub chain_id: u64,
    pub duration_days: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RecordRegistry<LedgerStore>>,
    pub reveal: Arc<RevealFlow>,
    pub challenge: ChallengeParams,
}

impl AppState {
    pub fn new(ledger: LedgerStore, config: &AppConfig) -> Self {
        let registry = RecordRegistry::with_keys(
            ledger,
            TaggedBase64Transform::new(),
            LedgerKeys::new(config.namespace.clone()),
        );
        let reveal = RevealFlow::new(
            TaggedBase64Transform::new(),
            ConfiguredVerifier::for_policy(config.signature_policy),
        )
        .bound_to(LedgerBinding {
            contract_address: config.contract_address,
            chain_id: config.chain_id,
        });

        Self {
            registry: Arc::new(registry),
            reveal: Arc::new(reveal),
            challenge: ChallengeParams {
                contract_address: config.contract_address,
                chain_id: config.chain_id,
                duration_days: config.auth_window_days,
            },
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            LedgerStore::Memory(InMemoryLedger::new()),
            &AppConfig::default(),
        )
    }
}
