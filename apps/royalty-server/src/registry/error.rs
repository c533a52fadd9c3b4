// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registry and reveal errors.

use crate::auth::VerifyError;
use crate::encoding::DecodeError;
use crate::ledger::StoreError;

use super::record::{RoyaltyStatus, WireError};

/// Failure category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StoreUnavailable,
    DeserializationFailure,
    NotFound,
    InvalidTransition,
    AuthorizationDeclined,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::DeserializationFailure => "deserialization_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::AuthorizationDeclined => "authorization_declined",
        }
    }
}

/// Error returned by single-record registry and reveal operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("malformed ledger data: {0}")]
    Deserialization(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: RoyaltyStatus,
        to: RoyaltyStatus,
    },

    #[error("authorization declined: {0}")]
    AuthorizationDeclined(String),

    /// The signer produced a signature that does not prove the claimed identity.
    #[error("authorization proof rejected: {0}")]
    InvalidProof(#[from] VerifyError),

    /// The record was written but the index append failed. The record is
    /// reachable by id only.
    #[error("record {id} persisted but not indexed: {source}")]
    Unindexed {
        id: String,
        #[source]
        source: Box<RegistryError>,
    },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            RegistryError::Deserialization(_) => ErrorKind::DeserializationFailure,
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            RegistryError::AuthorizationDeclined(_) | RegistryError::InvalidProof(_) => {
                ErrorKind::AuthorizationDeclined
            }
            RegistryError::Unindexed { source, .. } => source.kind(),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        RegistryError::StoreUnavailable(e.to_string())
    }
}

impl From<WireError> for RegistryError {
    fn from(e: WireError) -> Self {
        RegistryError::Deserialization(e.to_string())
    }
}

impl From<DecodeError> for RegistryError {
    fn from(e: DecodeError) -> Self {
        RegistryError::Deserialization(format!("encrypted value: {e}"))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
