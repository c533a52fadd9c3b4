// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Royalty Server - Encrypted Royalty Registry
//!
//! This crate registers royalty valuations in a key-value ledger in encoded
//! form and reveals them only to callers presenting a wallet signature over
//! an authorization challenge.
//!
//! ## Modules
//!
//! - `encoding` - Reversible value encoding (stand-in for a real cipher)
//! - `ledger` - Key-value ledger contract and adapters (memory, redb, EVM contract)
//! - `registry` - Record index and lifecycle on top of the ledger
//! - `auth` - Authorization challenges, signers and signature verification
//! - `decryption` - Signature-gated reveal of encoded values
//! - `api` - HTTP API handlers (Axum)

pub mod api;
pub mod auth;
pub mod config;
pub mod decryption;
pub mod encoding;
pub mod error;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod state;
