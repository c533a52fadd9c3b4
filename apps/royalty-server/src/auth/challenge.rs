// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization challenge.
//!
//! The challenge is the text a wallet signs to justify revealing a record.
//! Its format is fixed, five `name:value` lines joined by `\n`:
//!
//! ```text
//! publickey:<public key material>
//! contractAddresses:<ledger address>
//! contractsChainId:<chain id>
//! startTimestamp:<unix seconds>
//! durationDays:<days>
//! ```
//!
//! The window is informational. Nothing in this module checks wall-clock time.

use std::str::FromStr;

use alloy::primitives::Address;
use chrono::{DateTime, TimeDelta, Utc};
use k256::elliptic_curve::rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::verifier::VerifyError;

/// Size of the random public-key material, in bytes (hex-encoded to 2000 chars).
pub const PUBLIC_KEY_BYTES: usize = 1000;

/// Ledger a challenge must name to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerBinding {
    pub contract_address: Address,
    pub chain_id: u64,
}

/// Parameters bound into the authorization message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationChallenge {
    /// Public-key material (`0x`-prefixed hex)
    pub public_key: String,
    /// Ledger contract address, as it appears in the message
    pub contract_address: String,
    pub chain_id: u64,
    /// Window start (Unix seconds)
    pub start_timestamp: i64,
    pub duration_days: u32,
}

impl AuthorizationChallenge {
    /// Issue a fresh challenge starting at `now`.
    pub fn issue(contract: Address, chain_id: u64, now: DateTime<Utc>, duration_days: u32) -> Self {
        let mut material = vec![0u8; PUBLIC_KEY_BYTES];
        OsRng.fill_bytes(&mut material);

        Self {
            public_key: alloy::hex::encode_prefixed(&material),
            contract_address: contract.to_string(),
            chain_id,
            start_timestamp: now.timestamp(),
            duration_days,
        }
    }

    /// The canonical message a signer must sign.
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\n\
             startTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.contract_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }

    /// Require the challenge to name `binding`'s ledger and chain.
    ///
    /// Addresses compare by value, so checksum casing does not matter.
    pub fn check_binding(&self, binding: &LedgerBinding) -> Result<(), VerifyError> {
        let named = Address::from_str(self.contract_address.trim()).ok();
        if named != Some(binding.contract_address) || self.chain_id != binding.chain_id {
            return Err(VerifyError::ForeignLedger {
                contract_address: self.contract_address.clone(),
                chain_id: self.chain_id,
            });
        }
        Ok(())
    }

    /// End of the stated window, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_timestamp, 0)?
            .checked_add_signed(TimeDelta::days(i64::from(self.duration_days)))
    }
}
