// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reveal of encrypted royalty values.
//!
//! Order of operations: check the challenge's ledger binding, sign, verify,
//! decode. A failed step stops the flow before anything is decoded.

use crate::auth::{
    AuthorizationChallenge, ConfiguredVerifier, LedgerBinding, MessageSigner, SignatureVerifier,
};
use crate::encoding::{EncodingTransform, TaggedBase64Transform};
use crate::registry::{RegistryError, RegistryResult, RoyaltyRecord};

/// Reveals a record's plaintext value to a caller holding a valid proof.
pub struct RevealFlow<T = TaggedBase64Transform, V = ConfiguredVerifier> {
    transform: T,
    verifier: V,
    binding: Option<LedgerBinding>,
}

impl<T: EncodingTransform, V: SignatureVerifier> RevealFlow<T, V> {
    pub fn new(transform: T, verifier: V) -> Self {
        Self {
            transform,
            verifier,
            binding: None,
        }
    }

    /// Only accept challenges naming `binding`'s ledger and chain.
    pub fn bound_to(mut self, binding: LedgerBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Reveal `record`'s value to the holder of `signer`.
    ///
    /// # Errors
    /// - `AuthorizationDeclined` if the signer refuses or fails
    /// - `InvalidProof` if the challenge names another ledger or the signature
    ///   does not prove the signer's identity
    /// - `Deserialization` if the stored value cannot be decoded
    pub async fn reveal<S: MessageSigner>(
        &self,
        record: &RoyaltyRecord,
        challenge: &AuthorizationChallenge,
        signer: &S,
    ) -> RegistryResult<f64> {
        let identity = signer.identity();
        if let Some(binding) = &self.binding {
            if let Err(e) = challenge.check_binding(binding) {
                tracing::warn!(
                    record_id = %record.id,
                    identity,
                    error = %e,
                    "Reveal challenge rejected"
                );
                return Err(e.into());
            }
        }

        let message = challenge.message();

        let signature = match signer.sign_message(&message).await {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(
                    record_id = %record.id,
                    identity,
                    error = %e,
                    "Reveal authorization declined"
                );
                return Err(RegistryError::AuthorizationDeclined(e.to_string()));
            }
        };

        if let Err(e) = self.verifier.verify(&message, &signature, identity) {
            tracing::warn!(record_id = %record.id, identity, error = %e, "Reveal proof rejected");
            return Err(e.into());
        }

        let value = self.transform.decode(&record.encrypted_royalty_value)?;
        tracing::info!(record_id = %record.id, identity, "Royalty value revealed");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Signature};
    use chrono::Utc;

    use crate::auth::{
        LocalWalletSigner, PermissiveVerifier, PresentedSignature, RecoveringVerifier, SignerError,
        VerifyError,
    };
    use crate::ledger::InMemoryLedger;
    use crate::registry::{ErrorKind, NewRoyalty, RecordRegistry, RoyaltyDescriptor, RoyaltyStatus};

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const SECOND_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    /// Signer whose holder always refuses.
    struct DecliningSigner {
        identity: String,
    }

    impl MessageSigner for DecliningSigner {
        fn identity(&self) -> &str {
            &self.identity
        }

        async fn sign_message(&self, _message: &str) -> Result<Signature, SignerError> {
            Err(SignerError::Declined("user rejected the request".to_string()))
        }
    }

    fn challenge() -> AuthorizationChallenge {
        AuthorizationChallenge::issue(Address::ZERO, 43113, Utc::now(), 30)
    }

    fn strict_flow() -> RevealFlow<TaggedBase64Transform, RecoveringVerifier> {
        RevealFlow::new(TaggedBase64Transform::new(), RecoveringVerifier)
    }

    fn record_with_value(encrypted: &str) -> RoyaltyRecord {
        RoyaltyRecord {
            id: "royalty-1-abcd".to_string(),
            artist: "A".to_string(),
            song_title: "S".to_string(),
            encrypted_royalty_value: encrypted.to_string(),
            token_amount: 1,
            timestamp: 1,
            owner: None,
            status: RoyaltyStatus::Pending,
        }
    }

    #[tokio::test]
    async fn create_activate_and_reveal_end_to_end() {
        let registry = RecordRegistry::new(InMemoryLedger::new(), TaggedBase64Transform::new());
        let owner = LocalWalletSigner::from_hex(DEV_KEY).unwrap();

        let created = registry
            .create(
                NewRoyalty {
                    descriptor: RoyaltyDescriptor::new("Artist A", "Song B"),
                    royalty_value: 1000.0,
                    token_amount: 50,
                },
                owner.identity(),
            )
            .await
            .unwrap();

        let all = registry.load_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, RoyaltyStatus::Pending);
        assert_eq!(
            registry.transform().decode(&all[0].encrypted_royalty_value),
            Ok(1000.0)
        );

        registry.set_status(&created.id, RoyaltyStatus::Active).await.unwrap();
        let all = registry.load_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, RoyaltyStatus::Active);
        assert_eq!(
            RoyaltyRecord {
                status: RoyaltyStatus::Pending,
                ..all[0].clone()
            },
            created
        );

        let flow = strict_flow();
        let record = registry.get(&created.id).await.unwrap();
        let value = flow.reveal(&record, &challenge(), &owner).await.unwrap();
        assert_eq!(value, 1000.0);

        let declining = DecliningSigner {
            identity: owner.identity().to_string(),
        };
        let err = flow.reveal(&record, &challenge(), &declining).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthorizationDeclined);
        assert!(matches!(err, RegistryError::AuthorizationDeclined(_)));
        assert_eq!(registry.get(&created.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn presented_signature_over_the_challenge_is_accepted() {
        let wallet = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let challenge = challenge();
        let signature = wallet.sign_message(&challenge.message()).await.unwrap();
        let presented = PresentedSignature::new(
            wallet.identity(),
            Some(alloy::hex::encode_prefixed(signature.as_bytes())),
        );

        let value = strict_flow()
            .reveal(&record_with_value("FHE-MjUwLjU="), &challenge, &presented)
            .await
            .unwrap();
        assert_eq!(value, 250.5);
    }

    #[tokio::test]
    async fn signature_from_another_wallet_is_an_invalid_proof() {
        let claimed = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let impostor = LocalWalletSigner::from_hex(SECOND_KEY).unwrap();
        let challenge = challenge();
        let signature = impostor.sign_message(&challenge.message()).await.unwrap();
        let presented = PresentedSignature::new(
            claimed.identity(),
            Some(alloy::hex::encode_prefixed(signature.as_bytes())),
        );

        let err = strict_flow()
            .reveal(&record_with_value("FHE-MTAwMA=="), &challenge, &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidProof(_)));
        assert_eq!(err.kind(), ErrorKind::AuthorizationDeclined);
    }

    #[tokio::test]
    async fn signature_over_a_stale_challenge_is_rejected() {
        let wallet = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let signature = wallet.sign_message(&challenge().message()).await.unwrap();
        let presented = PresentedSignature::new(
            wallet.identity(),
            Some(alloy::hex::encode_prefixed(signature.as_bytes())),
        );

        let err = strict_flow()
            .reveal(&record_with_value("FHE-MTAwMA=="), &challenge(), &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidProof(_)));
    }

    #[tokio::test]
    async fn bound_flow_rejects_challenge_for_another_ledger() {
        let wallet = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let flow = strict_flow().bound_to(LedgerBinding {
            contract_address: Address::ZERO,
            chain_id: 43113,
        });

        let own = challenge();
        let value = flow
            .reveal(&record_with_value("FHE-MTAwMA=="), &own, &wallet)
            .await
            .unwrap();
        assert_eq!(value, 1000.0);

        let elsewhere = AuthorizationChallenge::issue(
            "0x000000000000000000000000000000000000dEaD".parse().unwrap(),
            1,
            Utc::now(),
            30,
        );
        let err = flow
            .reveal(&record_with_value("FHE-MTAwMA=="), &elsewhere, &wallet)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidProof(VerifyError::ForeignLedger { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::AuthorizationDeclined);

        let other_chain = AuthorizationChallenge {
            chain_id: 1,
            ..challenge()
        };
        let err = flow
            .reveal(&record_with_value("FHE-MTAwMA=="), &other_chain, &wallet)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidProof(_)));
    }

    #[tokio::test]
    async fn permissive_flow_accepts_any_signature() {
        let claimed = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let impostor = LocalWalletSigner::from_hex(SECOND_KEY).unwrap();
        let signature = impostor.sign_message("unrelated").await.unwrap();
        let presented = PresentedSignature::new(
            claimed.identity(),
            Some(alloy::hex::encode_prefixed(signature.as_bytes())),
        );

        let flow = RevealFlow::new(TaggedBase64Transform::new(), PermissiveVerifier);
        let value = flow
            .reveal(&record_with_value("1000"), &challenge(), &presented)
            .await
            .unwrap();
        assert_eq!(value, 1000.0);
    }

    #[tokio::test]
    async fn undecodable_value_is_a_deserialization_failure() {
        let wallet = LocalWalletSigner::from_hex(DEV_KEY).unwrap();
        let err = strict_flow()
            .reveal(&record_with_value("FHE-!!!"), &challenge(), &wallet)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailure);
    }
}
