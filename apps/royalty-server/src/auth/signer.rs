// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Message signers.
//!
//! A [`MessageSigner`] is one identity's capability to sign an authorization
//! message. The holder may decline.

use std::future::Future;

use alloy::{
    primitives::{Address, Signature},
    signers::{local::PrivateKeySigner, Signer},
};
use k256::SecretKey;

/// Errors from a signing capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The holder refused to sign.
    #[error("signature request declined: {0}")]
    Declined(String),

    /// Signing was attempted and failed.
    #[error("signing failed: {0}")]
    Failed(String),
}

/// Errors loading a private key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Capability to sign messages on behalf of one identity.
pub trait MessageSigner: Send + Sync {
    /// Address the signature is claimed to come from.
    fn identity(&self) -> &str;

    /// Sign `message` as an EIP-191 personal message.
    fn sign_message(
        &self,
        message: &str,
    ) -> impl Future<Output = Result<Signature, SignerError>> + Send;
}

/// Parse a PEM private key (SEC1 or PKCS#8) to a hex string without `0x`.
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, KeyError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| KeyError::InvalidPrivateKey(format!("Invalid UTF-8: {e}")))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| KeyError::InvalidPrivateKey(format!("Invalid PEM: {e}")))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| {
            use k256::pkcs8::DecodePrivateKey;
            SecretKey::from_pkcs8_der(pem.contents()).map_err(|e| e.to_string())
        })
        .map_err(|e| KeyError::InvalidPrivateKey(format!("Invalid key format: {e}")))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

/// Create an alloy signer from a hex private key (with or without `0x`).
pub fn signer_from_hex(hex_key: &str) -> Result<PrivateKeySigner, KeyError> {
    let hex_key = hex_key.trim();
    let hex_key = hex_key.strip_prefix("0x").unwrap_or(hex_key);
    let bytes = alloy::hex::decode(hex_key)
        .map_err(|e| KeyError::InvalidPrivateKey(format!("Invalid hex: {e}")))?;
    PrivateKeySigner::from_slice(&bytes).map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))
}

/// Create an alloy signer from a PEM private key.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, KeyError> {
    signer_from_hex(&pem_to_hex(pem_bytes)?)
}

/// Signer backed by a private key held by this process.
#[derive(Debug, Clone)]
pub struct LocalWalletSigner {
    signer: PrivateKeySigner,
    identity: String,
}

impl LocalWalletSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        let identity = signer.address().to_string();
        Self { signer, identity }
    }

    pub fn from_hex(hex_key: &str) -> Result<Self, KeyError> {
        signer_from_hex(hex_key).map(Self::new)
    }

    pub fn from_pem(pem_bytes: &[u8]) -> Result<Self, KeyError> {
        signer_from_pem(pem_bytes).map(Self::new)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl MessageSigner for LocalWalletSigner {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn sign_message(&self, message: &str) -> Result<Signature, SignerError> {
        Signer::sign_message(&self.signer, message.as_bytes())
            .await
            .map_err(|e| SignerError::Failed(e.to_string()))
    }
}

/// A signature produced elsewhere (e.g. by a browser wallet) and submitted
/// together with the identity it claims.
#[derive(Debug, Clone)]
pub struct PresentedSignature {
    identity: String,
    signature: Option<String>,
}

impl PresentedSignature {
    /// `signature` is the 65-byte signature as hex; `None` means the holder
    /// declined to sign.
    pub fn new(identity: impl Into<String>, signature: Option<String>) -> Self {
        Self {
            identity: identity.into(),
            signature,
        }
    }
}

impl MessageSigner for PresentedSignature {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn sign_message(&self, _message: &str) -> Result<Signature, SignerError> {
        let hex_sig = match self.signature.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(SignerError::Declined("no signature presented".to_string()))
            }
            Some(s) => s,
        };

        let bytes = alloy::hex::decode(hex_sig)
            .map_err(|e| SignerError::Failed(format!("signature is not hex: {e}")))?;
        Signature::try_from(&bytes[..])
            .map_err(|e| SignerError::Failed(format!("malformed signature: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use k256::pkcs8::{EncodePrivateKey, LineEnding};

    // Well-known development key (anvil/hardhat account #0)
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn dev_key_pem() -> String {
        let bytes = alloy::hex::decode(DEV_KEY).unwrap();
        let key = SigningKey::from_slice(&bytes).unwrap();
        key.to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn test_pem_to_hex() {
        let hex = pem_to_hex(dev_key_pem().as_bytes()).unwrap();
        assert_eq!(hex, DEV_KEY);
    }

    #[test]
    fn test_signer_from_pem() {
        let signer = LocalWalletSigner::from_pem(dev_key_pem().as_bytes()).unwrap();
        assert_eq!(signer.identity(), DEV_ADDRESS);
    }

    #[test]
    fn from_hex_accepts_prefixed_keys() {
        let signer = LocalWalletSigner::from_hex(&format!("0x{DEV_KEY}")).unwrap();
        assert_eq!(signer.address().to_string(), DEV_ADDRESS);
    }

    #[test]
    fn invalid_keys_are_rejected() {
        assert!(pem_to_hex(b"not a pem").is_err());
        assert!(pem_to_hex(&[0xff, 0xfe]).is_err());
        assert!(signer_from_hex("zz").is_err());
        assert!(signer_from_hex("00").is_err());
    }

    #[tokio::test]
    async fn local_signature_recovers_to_identity() {
        let signer = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let signature = signer.sign_message("hello").await.unwrap();
        let recovered = signature.recover_address_from_msg("hello").unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[tokio::test]
    async fn presented_signature_parses_hex() {
        let local = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let signature = local.sign_message("msg").await.unwrap();
        let hex_sig = alloy::hex::encode_prefixed(signature.as_bytes());

        let presented = PresentedSignature::new(DEV_ADDRESS, Some(hex_sig));
        assert_eq!(presented.identity(), DEV_ADDRESS);
        assert_eq!(presented.sign_message("msg").await.unwrap(), signature);
    }

    #[tokio::test]
    async fn missing_signature_is_declined() {
        let presented = PresentedSignature::new(DEV_ADDRESS, None);
        assert!(matches!(
            presented.sign_message("msg").await,
            Err(SignerError::Declined(_))
        ));

        let blank = PresentedSignature::new(DEV_ADDRESS, Some("  ".to_string()));
        assert!(matches!(
            blank.sign_message("msg").await,
            Err(SignerError::Declined(_))
        ));
    }

    #[tokio::test]
    async fn malformed_signature_fails() {
        let presented = PresentedSignature::new(DEV_ADDRESS, Some("0x1234".to_string()));
        assert!(matches!(
            presented.sign_message("msg").await,
            Err(SignerError::Failed(_))
        ));
    }
}
