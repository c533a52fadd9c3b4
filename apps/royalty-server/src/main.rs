// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use royalty_server::{
    api::router,
    auth::{signer_from_pem, SignaturePolicy},
    config::{AppConfig, LedgerBackend, LogFormat, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    ledger::{ContractLedger, InMemoryLedger, LedgerStore, RedbLedger},
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref()));

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Royalty server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    let ledger = open_ledger(&config)?;

    if config.signature_policy == SignaturePolicy::Permissive {
        tracing::warn!("Signature verification disabled: any signature reveals values");
    }

    tracing::info!(
        backend = ledger.backend_name(),
        namespace = %config.namespace,
        contract = %config.contract_address,
        chain_id = config.chain_id,
        "Ledger configured"
    );

    let state = AppState::new(ledger, &config);
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Royalty server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_ctrl_c(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Royalty server stopped");
    Ok(())
}

fn open_ledger(config: &AppConfig) -> Result<LedgerStore, BoxError> {
    match config.backend {
        LedgerBackend::Memory => {
            tracing::warn!("Using in-memory ledger, records are lost on exit");
            Ok(LedgerStore::Memory(InMemoryLedger::new()))
        }
        LedgerBackend::Redb => {
            let ledger = RedbLedger::open_in(&config.data_dir)?;
            tracing::info!(data_dir = %config.data_dir.display(), "Opened embedded ledger");
            Ok(LedgerStore::Redb(ledger))
        }
        LedgerBackend::Contract => {
            let pem_path = config
                .signer_pem
                .as_ref()
                .ok_or("LEDGER_SIGNER_PEM is required for the contract backend")?;
            let pem = std::fs::read(pem_path)?;
            let signer = signer_from_pem(&pem)?;
            tracing::info!(
                signer = %signer.address(),
                rpc_url = %config.rpc_url,
                "Connecting to ledger contract"
            );

            let ledger = ContractLedger::connect(
                &config.rpc_url,
                &config.contract_address.to_string(),
                signer,
            )?;
            Ok(LedgerStore::Contract(ledger))
        }
    }
}

async fn wait_for_ctrl_c(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
