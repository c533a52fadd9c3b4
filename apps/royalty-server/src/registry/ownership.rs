// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership checks for owner-only record operations.
//!
//! Identities are EVM addresses. Comparison ignores case, so a checksummed
//! address matches its lowercase form.

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// The owner's identity, if one was recorded.
    fn owner_identity(&self) -> Option<&str>;
}

/// Error returned when a caller does not own a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity {identity} does not own this record")]
pub struct NotOwner {
    pub identity: String,
}

/// Trait for enforcing ownership.
pub trait OwnershipEnforcer {
    /// Verify that `identity` owns this resource.
    ///
    /// Resources without a recorded owner are owned by nobody.
    fn verify_owner(&self, identity: &str) -> Result<(), NotOwner>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_owner(&self, identity: &str) -> Result<(), NotOwner> {
        match self.owner_identity() {
            Some(owner) if same_identity(owner, identity) => Ok(()),
            _ => Err(NotOwner {
                identity: identity.to_string(),
            }),
        }
    }
}

/// Case-insensitive identity comparison.
pub fn same_identity(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
