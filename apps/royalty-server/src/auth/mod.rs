// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Signature-gated access to encrypted royalty values.
//!
//! ## Flow
//!
//! 1. The service issues an [`AuthorizationChallenge`] bound to fresh public-key
//!    material, the ledger address, the chain id and a validity window
//! 2. A reveal only accepts challenges naming this service's [`LedgerBinding`]
//! 3. The caller's wallet signs the challenge message (EIP-191)
//! 4. A [`SignatureVerifier`] checks the signature against the claimed identity
//!
//! ## Security
//!
//! - The default verifier recovers the signer and requires it to match
//! - The permissive verifier exists only in `dev` builds
//! - Window expiry is not enforced here

pub mod challenge;
pub mod signer;
pub mod verifier;

pub use challenge::{AuthorizationChallenge, LedgerBinding};
pub use signer::{
    signer_from_pem, KeyError, LocalWalletSigner, MessageSigner, PresentedSignature, SignerError,
};
#[cfg(any(test, feature = "dev"))]
pub use verifier::PermissiveVerifier;
pub use verifier::{
    ConfiguredVerifier, RecoveringVerifier, SignaturePolicy, SignatureVerifier, VerifyError,
};
