// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LEDGER_BACKEND` | `memory`, `redb` or `contract` | `redb` |
//! | `DATA_DIR` | Directory of the redb ledger file | `/data` |
//! | `LEDGER_NAMESPACE` | Ledger key namespace | `token` |
//! | `LEDGER_CONTRACT_ADDRESS` | Ledger contract address (bound into challenges) | zero address |
//! | `LEDGER_RPC_URL` | JSON-RPC endpoint for the `contract` backend | Avalanche Fuji public RPC |
//! | `LEDGER_SIGNER_PEM` | PEM key that signs ledger writes | Required for `contract` |
//! | `CHAIN_ID` | Chain id bound into challenges | `43113` |
//! | `AUTH_WINDOW_DAYS` | Challenge window length | `30` |
//! | `SIGNATURE_POLICY` | `verify`, or `permissive` in `dev` builds | `verify` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::auth::SignaturePolicy;
use crate::ledger::keys::DEFAULT_NAMESPACE;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable selecting the ledger backend.
pub const LEDGER_BACKEND_ENV: &str = "LEDGER_BACKEND";

/// Environment variable name for the data directory path.
///
/// Only used by the `redb` backend.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const LEDGER_NAMESPACE_ENV: &str = "LEDGER_NAMESPACE";
pub const LEDGER_CONTRACT_ADDRESS_ENV: &str = "LEDGER_CONTRACT_ADDRESS";
pub const LEDGER_RPC_URL_ENV: &str = "LEDGER_RPC_URL";

/// Path to a PEM private key. The key pays for and signs `setData` calls.
pub const LEDGER_SIGNER_PEM_ENV: &str = "LEDGER_SIGNER_PEM";

pub const CHAIN_ID_ENV: &str = "CHAIN_ID";
pub const AUTH_WINDOW_DAYS_ENV: &str = "AUTH_WINDOW_DAYS";
pub const SIGNATURE_POLICY_ENV: &str = "SIGNATURE_POLICY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Avalanche Fuji C-Chain public RPC
pub const DEFAULT_RPC_URL: &str = "https://api.avax-test.network/ext/bc/C/rpc";

/// Avalanche Fuji C-Chain
pub const DEFAULT_CHAIN_ID: u64 = 43113;

pub const DEFAULT_AUTH_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors, reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} is required by the selected ledger backend")]
    Missing(&'static str),
}

/// Ledger backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LedgerBackend {
    /// Process-local; data is lost on exit
    Memory,
    /// Embedded redb file under `DATA_DIR`
    #[default]
    Redb,
    /// On-chain key-value contract
    Contract,
}

impl FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(LedgerBackend::Memory),
            "redb" => Ok(LedgerBackend::Redb),
            "contract" => Ok(LedgerBackend::Contract),
            other => Err(format!("unknown ledger backend `{other}`")),
        }
    }
}

impl fmt::Display for LedgerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedgerBackend::Memory => "memory",
            LedgerBackend::Redb => "redb",
            LedgerBackend::Contract => "contract",
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything other than `json` is pretty.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: LedgerBackend,
    pub data_dir: PathBuf,
    pub namespace: String,
    pub contract_address: Address,
    pub rpc_url: String,
    pub signer_pem: Option<PathBuf>,
    pub chain_id: u64,
    pub auth_window_days: u32,
    pub signature_policy: SignaturePolicy,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            backend: LedgerBackend::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
            contract_address: Address::ZERO,
            rpc_url: DEFAULT_RPC_URL.to_string(),
            signer_pem: None,
            chain_id: DEFAULT_CHAIN_ID,
            auth_window_days: DEFAULT_AUTH_WINDOW_DAYS,
            signature_policy: SignaturePolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let config = Self {
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port: parse_var(PORT_ENV, get(PORT_ENV))?.unwrap_or(defaults.port),
            backend: parse_var(LEDGER_BACKEND_ENV, get(LEDGER_BACKEND_ENV))?
                .unwrap_or(defaults.backend),
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            namespace: get(LEDGER_NAMESPACE_ENV).unwrap_or(defaults.namespace),
            contract_address: parse_var(
                LEDGER_CONTRACT_ADDRESS_ENV,
                get(LEDGER_CONTRACT_ADDRESS_ENV),
            )?
            .unwrap_or(defaults.contract_address),
            rpc_url: get(LEDGER_RPC_URL_ENV).unwrap_or(defaults.rpc_url),
            signer_pem: get(LEDGER_SIGNER_PEM_ENV).map(PathBuf::from),
            chain_id: parse_var(CHAIN_ID_ENV, get(CHAIN_ID_ENV))?.unwrap_or(defaults.chain_id),
            auth_window_days: parse_var(AUTH_WINDOW_DAYS_ENV, get(AUTH_WINDOW_DAYS_ENV))?
                .unwrap_or(defaults.auth_window_days),
            signature_policy: parse_var(SIGNATURE_POLICY_ENV, get(SIGNATURE_POLICY_ENV))?
                .unwrap_or(defaults.signature_policy),
            log_format: LogFormat::parse(get(LOG_FORMAT_ENV).as_deref()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == LedgerBackend::Contract && self.signer_pem.is_none() {
            return Err(ConfigError::Missing(LEDGER_SIGNER_PEM_ENV));
        }
        if !self.signature_policy.is_supported() {
            return Err(ConfigError::Invalid {
                var: SIGNATURE_POLICY_ENV,
                reason: format!(
                    "`{}` requires a build with the `dev` feature",
                    self.signature_policy
                ),
            });
        }
        Ok(())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: HOST_ENV,
                reason: e.to_string(),
            })
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|v| {
            v.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.namespace, "token");
        assert_eq!(config.chain_id, 43113);
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn values_override_defaults() {
        let config = load(&[
            (PORT_ENV, "9000"),
            (LEDGER_BACKEND_ENV, "Memory"),
            (LEDGER_NAMESPACE_ENV, "royalty"),
            (
                LEDGER_CONTRACT_ADDRESS_ENV,
                "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            ),
            (CHAIN_ID_ENV, "31337"),
            (AUTH_WINDOW_DAYS_ENV, "7"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.backend, LedgerBackend::Memory);
        assert_eq!(config.namespace, "royalty");
        assert_eq!(
            config.contract_address.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.auth_window_days, 7);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[(PORT_ENV, "  "), (LEDGER_NAMESPACE_ENV, "")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn malformed_values_name_their_variable() {
        let err = load(&[(PORT_ENV, "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: PORT_ENV, .. }));

        let err = load(&[(LEDGER_BACKEND_ENV, "postgres")]).unwrap_err();
        assert!(err.to_string().starts_with(LEDGER_BACKEND_ENV));

        let err = load(&[(LEDGER_CONTRACT_ADDRESS_ENV, "0x123")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: LEDGER_CONTRACT_ADDRESS_ENV,
                ..
            }
        ));
    }

    #[test]
    fn contract_backend_requires_signer_key() {
        let err = load(&[(LEDGER_BACKEND_ENV, "contract")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(LEDGER_SIGNER_PEM_ENV)));

        let config = load(&[
            (LEDGER_BACKEND_ENV, "contract"),
            (LEDGER_SIGNER_PEM_ENV, "/run/secrets/ledger.pem"),
        ])
        .unwrap();
        assert_eq!(
            config.signer_pem,
            Some(PathBuf::from("/run/secrets/ledger.pem"))
        );
    }

    #[test]
    fn signature_policy_is_parsed() {
        // Test builds support the permissive policy
        let config = load(&[(SIGNATURE_POLICY_ENV, "permissive")]).unwrap();
        assert_eq!(config.signature_policy, SignaturePolicy::Permissive);

        assert!(load(&[(SIGNATURE_POLICY_ENV, "none")]).is_err());
    }
}
