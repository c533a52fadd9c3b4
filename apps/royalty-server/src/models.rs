// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Registry types
//! ([`RoyaltyRecord`](crate::registry::RoyaltyRecord) and friends) are
//! returned as they are; this module only holds the HTTP-specific shapes.
//!
//! ## Identities
//!
//! Identities are EVM addresses (`0x` + 40 hex characters). Lowercase and
//! checksummed forms are both accepted; responses use the checksummed form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthorizationChallenge;

// =============================================================================
// Royalty Models
// =============================================================================

/// Request to register a royalty valuation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoyaltyRequest {
    pub artist: String,
    pub song_title: String,
    /// Plaintext valuation. Stored only in encoded form.
    pub royalty_value: f64,
    pub token_amount: u64,
    /// Identity registering the record; becomes its owner.
    pub owner: String,
}

/// Request to activate a pending record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRoyaltyRequest {
    /// Must match the record owner.
    pub identity: String,
}

// =============================================================================
// Authorization Models
// =============================================================================

/// A freshly issued challenge and the exact text to sign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub challenge: AuthorizationChallenge,
    /// `challenge` rendered as the message to sign (EIP-191 personal message)
    pub message: String,
    /// End of the stated window (RFC 3339). Informational, not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Request to reveal a record's value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    /// Identity that signed the challenge.
    pub identity: String,
    /// 65-byte signature as hex. Absent when the wallet declined to sign.
    #[serde(default)]
    pub signature: Option<String>,
    /// The challenge that was signed, echoed back unchanged.
    pub challenge: AuthorizationChallenge,
}

/// Revealed plaintext value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealResponse {
    pub id: String,
    pub royalty_value: f64,
}
