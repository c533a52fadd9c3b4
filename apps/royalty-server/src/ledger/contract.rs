// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! On-chain ledger contract.
//!
//! The contract is a plain key-value store: reads are `view` calls, each
//! `setData` is one transaction signed by the service wallet. A write is
//! reported as successful only once its receipt shows success.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol,
};

use super::{RecordStore, StoreError, StoreResult};

// Define the ledger interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IRecordLedger {
        function isAvailable() external view returns (bool);
        function getData(string key) external view returns (bytes);
        function setData(string key, bytes value) external;
    }
}

/// Ledger contract wrapper.
pub struct ContractLedger {
    contract: IRecordLedger::IRecordLedgerInstance<DynProvider>,
    address: Address,
}

impl ContractLedger {
    /// Connect to a ledger contract through an HTTP JSON-RPC endpoint.
    ///
    /// `signer` pays for and signs every `setData` transaction.
    pub fn connect(
        rpc_url: &str,
        contract_address: &str,
        signer: PrivateKeySigner,
    ) -> StoreResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| {
            StoreError::Unavailable(format!("Invalid RPC URL: {e}"))
        })?;
        let address = Address::from_str(contract_address)
            .map_err(|e| StoreError::Unavailable(format!("Invalid contract address: {e}")))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        let contract = IRecordLedger::new(address, provider);

        Ok(Self { contract, address })
    }

    /// Address of the ledger contract.
    pub fn address(&self) -> Address {
        self.address
    }
}

impl RecordStore for ContractLedger {
    async fn is_available(&self) -> bool {
        match self.contract.isAvailable().call().await {
            Ok(available) => available,
            Err(e) => {
                tracing::warn!(
                    contract = %self.address,
                    error = %e,
                    "Ledger availability probe failed"
                );
                false
            }
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let data: Bytes = self
            .contract
            .getData(key.to_string())
            .call()
            .await
            .map_err(|e| StoreError::Unavailable(format!("getData({key}) failed: {e}")))?;
        Ok(data.to_vec())
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let pending = self
            .contract
            .setData(key.to_string(), Bytes::copy_from_slice(value))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("setData({key}) not sent: {e}")))?;

        let tx_hash = *pending.tx_hash();
        let receipt = pending.get_receipt().await.map_err(|e| {
            StoreError::Backend(format!("setData({key}) receipt unavailable: {e}"))
        })?;

        if !receipt.status() {
            return Err(StoreError::Backend(format!(
                "setData({key}) reverted in {tx_hash:?}"
            )));
        }

        tracing::debug!(key, tx_hash = ?tx_hash, "Ledger key written");
        Ok(())
    }
}
