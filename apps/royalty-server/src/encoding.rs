// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encrypted amount representation.
//!
//! The registry only ever stores the output of an [`EncodingTransform`].
//! [`TaggedBase64Transform`] is the reference backend: it is reversible and
//! offers no confidentiality. A real homomorphic backend replaces it by
//! implementing the same trait; the registry and the reveal flow are generic
//! over it.
//!
//! ## Format
//!
//! ```text
//! FHE-<base64(decimal text of the amount)>
//! ```
//!
//! Values without the marker are legacy plaintext and are parsed as a
//! number literal.

use base64ct::{Base64, Encoding};

/// Marker prefixed to every value produced by [`TaggedBase64Transform`].
pub const ENCRYPTED_VALUE_TAG: &str = "FHE-";

/// Errors returned when an encrypted value cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("tagged payload is not valid base64")]
    InvalidBase64,

    #[error("tagged payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("not a numeric value: {0:?}")]
    NotNumeric(String),
}

/// Bidirectional mapping between a plaintext amount and its stored form.
///
/// Implementations must satisfy `decode(&encode(x)) == Ok(x)` for every
/// finite `x`, and `encode` must be deterministic.
pub trait EncodingTransform: Send + Sync {
    /// Encode a plaintext amount.
    fn encode(&self, plain: f64) -> String;

    /// Decode a stored value back to its plaintext amount.
    fn decode(&self, cipher: &str) -> Result<f64, DecodeError>;
}

/// Reference transform: tagged base64 of the amount's decimal text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaggedBase64Transform;

impl TaggedBase64Transform {
    pub fn new() -> Self {
        Self
    }
}

impl EncodingTransform for TaggedBase64Transform {
    fn encode(&self, plain: f64) -> String {
        // `Display` for f64 is the shortest text that parses back to the same value
        let payload = Base64::encode_string(plain.to_string().as_bytes());
        format!("{ENCRYPTED_VALUE_TAG}{payload}")
    }

    fn decode(&self, cipher: &str) -> Result<f64, DecodeError> {
        match cipher.strip_prefix(ENCRYPTED_VALUE_TAG) {
            Some(payload) => {
                let bytes =
                    Base64::decode_vec(payload).map_err(|_| DecodeError::InvalidBase64)?;
                let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                parse_literal(&text)
            }
            None => parse_literal(cipher),
        }
    }
}

fn parse_literal(text: &str) -> Result<f64, DecodeError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| DecodeError::NotNumeric(text.to_string()))
}
