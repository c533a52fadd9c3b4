// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature verification.
//!
//! A proof is valid when the EIP-191 signer recovered from the signature over
//! the exact challenge message equals the claimed identity.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Signature};

/// Reasons a signature is not accepted as proof.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("claimed identity is not an address: {0}")]
    InvalidIdentity(String),

    #[error("signer could not be recovered: {0}")]
    Recovery(String),

    #[error("signature was made by {recovered}, not {claimed}")]
    IdentityMismatch { claimed: String, recovered: String },

    #[error("challenge names ledger {contract_address} on chain {chain_id}")]
    ForeignLedger {
        contract_address: String,
        chain_id: u64,
    },
}

/// Decides whether `signature` proves `identity` signed `message`.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &str, signature: &Signature, identity: &str)
        -> Result<(), VerifyError>;
}

/// Verifier recovering the signing address from the signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveringVerifier;

impl SignatureVerifier for RecoveringVerifier {
    fn verify(
        &self,
        message: &str,
        signature: &Signature,
        identity: &str,
    ) -> Result<(), VerifyError> {
        let claimed = Address::from_str(identity.trim())
            .map_err(|_| VerifyError::InvalidIdentity(identity.to_string()))?;

        let recovered = signature
            .recover_address_from_msg(message.as_bytes())
            .map_err(|e| VerifyError::Recovery(e.to_string()))?;

        if recovered != claimed {
            return Err(VerifyError::IdentityMismatch {
                claimed: claimed.to_string(),
                recovered: recovered.to_string(),
            });
        }
        Ok(())
    }
}

/// Accepts any signature. Development builds only.
#[cfg(any(test, feature = "dev"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveVerifier;

#[cfg(any(test, feature = "dev"))]
impl SignatureVerifier for PermissiveVerifier {
    fn verify(&self, _: &str, _: &Signature, identity: &str) -> Result<(), VerifyError> {
        tracing::warn!(identity, "Accepting signature without verification");
        Ok(())
    }
}

/// How reveal requests are verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignaturePolicy {
    #[default]
    Verify,
    Permissive,
}

impl SignaturePolicy {
    /// Whether this build can run under the policy.
    pub fn is_supported(&self) -> bool {
        match self {
            SignaturePolicy::Verify => true,
            SignaturePolicy::Permissive => cfg!(any(test, feature = "dev")),
        }
    }
}

impl fmt::Display for SignaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignaturePolicy::Verify => f.write_str("verify"),
            SignaturePolicy::Permissive => f.write_str("permissive"),
        }
    }
}

impl FromStr for SignaturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verify" => Ok(SignaturePolicy::Verify),
            "permissive" => Ok(SignaturePolicy::Permissive),
            other => Err(format!("unknown signature policy `{other}`")),
        }
    }
}

/// Verifier selected from configuration.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredVerifier {
    Recovering(RecoveringVerifier),
    #[cfg(any(test, feature = "dev"))]
    Permissive(PermissiveVerifier),
}

impl ConfiguredVerifier {
    pub fn for_policy(policy: SignaturePolicy) -> Self {
        match policy {
            SignaturePolicy::Verify => ConfiguredVerifier::Recovering(RecoveringVerifier),
            #[cfg(any(test, feature = "dev"))]
            SignaturePolicy::Permissive => ConfiguredVerifier::Permissive(PermissiveVerifier),
            #[cfg(not(any(test, feature = "dev")))]
            SignaturePolicy::Permissive => {
                tracing::warn!("Permissive signature policy unsupported in this build, verifying");
                ConfiguredVerifier::Recovering(RecoveringVerifier)
            }
        }
    }
}

impl SignatureVerifier for ConfiguredVerifier {
    fn verify(
        &self,
        message: &str,
        signature: &Signature,
        identity: &str,
    ) -> Result<(), VerifyError> {
        match self {
            ConfiguredVerifier::Recovering(v) => v.verify(message, signature, identity),
            #[cfg(any(test, feature = "dev"))]
            ConfiguredVerifier::Permissive(v) => v.verify(message, signature, identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const OTHER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn sign(message: &str) -> Signature {
        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        signer.sign_message_sync(message.as_bytes()).unwrap()
    }

    #[test]
    fn matching_signer_is_accepted() {
        let signature = sign("challenge");
        assert_eq!(
            RecoveringVerifier.verify("challenge", &signature, DEV_ADDRESS),
            Ok(())
        );
        // Lowercase form of the same address
        assert_eq!(
            RecoveringVerifier.verify("challenge", &signature, &DEV_ADDRESS.to_lowercase()),
            Ok(())
        );
    }

    #[test]
    fn other_identity_is_rejected() {
        let signature = sign("challenge");
        let err = RecoveringVerifier
            .verify("challenge", &signature, OTHER_ADDRESS)
            .unwrap_err();
        assert!(matches!(err, VerifyError::IdentityMismatch { .. }));
    }

    #[test]
    fn signature_over_other_message_is_rejected() {
        let signature = sign("a different challenge");
        assert!(RecoveringVerifier
            .verify("challenge", &signature, DEV_ADDRESS)
            .is_err());
    }

    #[test]
    fn non_address_identity_is_rejected() {
        let signature = sign("challenge");
        assert_eq!(
            RecoveringVerifier.verify("challenge", &signature, "alice"),
            Err(VerifyError::InvalidIdentity("alice".to_string()))
        );
    }

    #[test]
    fn permissive_accepts_anything() {
        let signature = sign("a different challenge");
        assert!(PermissiveVerifier
            .verify("challenge", &signature, OTHER_ADDRESS)
            .is_ok());
    }

    #[test]
    fn policy_parses_and_selects_verifier() {
        assert_eq!("Verify".parse::<SignaturePolicy>(), Ok(SignaturePolicy::Verify));
        assert_eq!(
            "permissive".parse::<SignaturePolicy>(),
            Ok(SignaturePolicy::Permissive)
        );
        assert!("trust-me".parse::<SignaturePolicy>().is_err());
        assert!(SignaturePolicy::Verify.is_supported());

        let signature = sign("a different challenge");
        let strict = ConfiguredVerifier::for_policy(SignaturePolicy::Verify);
        assert!(strict.verify("challenge", &signature, DEV_ADDRESS).is_err());

        let lax = ConfiguredVerifier::for_policy(SignaturePolicy::Permissive);
        assert!(lax.verify("challenge", &signature, DEV_ADDRESS).is_ok());
    }
}
