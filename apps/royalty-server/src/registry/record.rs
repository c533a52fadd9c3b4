// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Royalty records and their ledger wire format.
//!
//! A record is stored as a flat JSON document under its derived key:
//!
//! ```json
//! {"artist":"…","songTitle":"…","encryptedRoyaltyValue":"FHE-…",
//!  "tokenAmount":50,"timestamp":1700000000,"owner":"0x…","status":"pending"}
//! ```
//!
//! The id is not part of the document; it is the key suffix. The index is a
//! JSON array of ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Lifecycle status of a royalty record.
///
/// `pending -> active` is the only transition this service performs. `sold`
/// is set by an external trading process and is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoyaltyStatus {
    #[default]
    Pending,
    Active,
    Sold,
}

impl RoyaltyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoyaltyStatus::Pending => "pending",
            RoyaltyStatus::Active => "active",
            RoyaltyStatus::Sold => "sold",
        }
    }

    /// Whether the registry may move a record from `self` to `next`.
    pub fn can_advance_to(&self, next: RoyaltyStatus) -> bool {
        matches!((self, next), (RoyaltyStatus::Pending, RoyaltyStatus::Active))
    }
}

impl fmt::Display for RoyaltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoyaltyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RoyaltyStatus::Pending),
            "active" => Ok(RoyaltyStatus::Active),
            "sold" => Ok(RoyaltyStatus::Sold),
            other => Err(format!("unknown royalty status `{other}`")),
        }
    }
}

/// Human-readable description of the royalty stream. Stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyDescriptor {
    pub artist: String,
    pub song_title: String,
}

impl RoyaltyDescriptor {
    pub fn new(artist: impl Into<String>, song_title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song_title: song_title.into(),
        }
    }
}

/// Input to [`RecordRegistry::create`](super::RecordRegistry::create).
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoyalty {
    pub descriptor: RoyaltyDescriptor,
    /// Plaintext valuation; only its encoded form is persisted.
    pub royalty_value: f64,
    pub token_amount: u64,
}

/// A registered royalty valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyRecord {
    /// Record identifier (`royalty-<millis>-<suffix>`)
    pub id: String,
    pub artist: String,
    pub song_title: String,
    /// Output of the encoding transform, opaque to everything else
    pub encrypted_royalty_value: String,
    pub token_amount: u64,
    /// Creation time (Unix seconds)
    pub timestamp: i64,
    /// Identity that created the record (absent on some legacy entries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub status: RoyaltyStatus,
}

impl RoyaltyRecord {
    pub(crate) fn from_document(id: impl Into<String>, doc: RecordDocument) -> Self {
        Self {
            id: id.into(),
            artist: doc.artist,
            song_title: doc.song_title,
            encrypted_royalty_value: doc.encrypted_royalty_value,
            token_amount: doc.token_amount,
            timestamp: doc.timestamp,
            owner: doc.owner,
            status: doc.status,
        }
    }
}

impl super::OwnedResource for RoyaltyRecord {
    fn owner_identity(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}

/// Persisted form of a record.
///
/// Fields this service does not know about are kept in `extra` and written
/// back unchanged on status updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordDocument {
    pub artist: String,
    pub song_title: String,
    pub encrypted_royalty_value: String,
    pub token_amount: u64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: RoyaltyStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Null and empty status values are pending.
fn status_or_pending<'de, D>(deserializer: D) -> Result<RoyaltyStatus, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(RoyaltyStatus::Pending),
        Some(s) if s.trim().is_empty() => Ok(RoyaltyStatus::Pending),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Errors decoding ledger bytes.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("value is not UTF-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn decode_document(bytes: &[u8]) -> Result<RecordDocument, WireError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn encode_document(doc: &RecordDocument) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(doc)?)
}

/// Decode the index. Empty or whitespace-only content is an empty index.
pub(crate) fn decode_index(bytes: &[u8]) -> Result<Vec<String>, WireError> {
    let text = std::str::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn encode_index(ids: &[String]) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(ids)?)
}

/// List filter: free-text search over artist and song title plus status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoyaltyFilter {
    pub search: Option<String>,
    pub status: Option<RoyaltyStatus>,
}

impl RoyaltyFilter {
    pub fn matches(&self, record: &RoyaltyRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.artist.to_lowercase().contains(&term)
                    || record.song_title.to_lowercase().contains(&term)
            }
        };
        let matches_status = self.status.is_none_or(|status| record.status == status);
        matches_search && matches_status
    }

    pub fn apply(&self, records: Vec<RoyaltyRecord>) -> Vec<RoyaltyRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: &str, artist: &str, song: &str, status: RoyaltyStatus) -> RoyaltyRecord {
        RoyaltyRecord {
            id: id.to_string(),
            artist: artist.to_string(),
            song_title: song.to_string(),
            encrypted_royalty_value: "FHE-MTAwMA==".to_string(),
            token_amount: 50,
            timestamp: 1_700_000_000,
            owner: Some("0x1111111111111111111111111111111111111111".to_string()),
            status,
        }
    }

    #[test]
    fn only_pending_to_active_is_allowed() {
        use RoyaltyStatus::*;
        assert!(Pending.can_advance_to(Active));
        for (from, to) in [
            (Pending, Pending),
            (Pending, Sold),
            (Active, Active),
            (Active, Pending),
            (Active, Sold),
            (Sold, Pending),
            (Sold, Active),
        ] {
            assert!(!from.can_advance_to(to), "{from} -> {to}");
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Active".parse::<RoyaltyStatus>(), Ok(RoyaltyStatus::Active));
        assert_eq!(" sold ".parse::<RoyaltyStatus>(), Ok(RoyaltyStatus::Sold));
        assert!("traded".parse::<RoyaltyStatus>().is_err());
    }

    #[test]
    fn null_or_empty_status_is_pending() {
        for status in ["null", r#""""#, r#""  ""#] {
            let json = format!(
                r#"{{"artist":"A","songTitle":"S","encryptedRoyaltyValue":"FHE-MQ==","tokenAmount":3,"timestamp":10,"status":{status}}}"#
            );
            let doc = decode_document(json.as_bytes()).unwrap();
            assert_eq!(doc.status, RoyaltyStatus::Pending, "status {status}");
        }

        let json = br#"{"artist":"A","songTitle":"S","encryptedRoyaltyValue":"FHE-MQ==","tokenAmount":3,"timestamp":10,"status":"traded"}"#;
        assert!(decode_document(json).is_err());
    }

    #[test]
    fn legacy_document_without_status_or_owner_is_pending() {
        let json = br#"{"artist":"A","songTitle":"S","encryptedRoyaltyValue":"FHE-MQ==","tokenAmount":3,"timestamp":10}"#;
        let doc = decode_document(json).unwrap();
        assert_eq!(doc.status, RoyaltyStatus::Pending);
        assert_eq!(doc.owner, None);

        let record = RoyaltyRecord::from_document("r1", doc);
        assert_eq!(record.id, "r1");
        assert_eq!(record.token_amount, 3);
    }

    #[test]
    fn document_uses_camel_case_field_names_and_keeps_extras() {
        let json = br#"{"artist":"A","songTitle":"S","encryptedRoyaltyValue":"FHE-MQ==","tokenAmount":3,"timestamp":10,"owner":"0xabc","status":"active","isrc":"US-XYZ"}"#;
        let doc = decode_document(json).unwrap();
        assert_eq!(doc.extra.get("isrc"), Some(&Value::from("US-XYZ")));

        let encoded: Value = serde_json::from_slice(&encode_document(&doc).unwrap()).unwrap();
        assert_eq!(encoded["songTitle"], "S");
        assert_eq!(encoded["encryptedRoyaltyValue"], "FHE-MQ==");
        assert_eq!(encoded["tokenAmount"], 3);
        assert_eq!(encoded["status"], "active");
        assert_eq!(encoded["isrc"], "US-XYZ");
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(decode_document(b"{not json").is_err());
        assert!(decode_document(&[0xff, 0xfe]).is_err());
        assert!(decode_document(br#"{"artist":"A"}"#).is_err());
    }

    #[test]
    fn index_treats_blank_content_as_empty() {
        assert!(decode_index(b"").unwrap().is_empty());
        assert!(decode_index(b"  \n\t").unwrap().is_empty());
        assert_eq!(
            decode_index(br#"["a","b"]"#).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(decode_index(b"{}").is_err());
    }

    #[test]
    fn filter_matches_search_and_status() {
        let records = vec![
            sample_record("1", "Nina Simone", "Feeling Good", RoyaltyStatus::Pending),
            sample_record("2", "Miles Davis", "So What", RoyaltyStatus::Active),
            sample_record("3", "Nina Hagen", "Du Hast Den Farbfilm", RoyaltyStatus::Sold),
        ];

        let by_artist = RoyaltyFilter {
            search: Some("nina".to_string()),
            status: None,
        };
        let ids: Vec<_> = by_artist.apply(records.clone()).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let by_song_and_status = RoyaltyFilter {
            search: Some("WHAT".to_string()),
            status: Some(RoyaltyStatus::Active),
        };
        assert_eq!(by_song_and_status.apply(records.clone()).len(), 1);

        let mismatched_status = RoyaltyFilter {
            search: Some("nina".to_string()),
            status: Some(RoyaltyStatus::Active),
        };
        assert!(mismatched_status.apply(records.clone()).is_empty());

        assert_eq!(RoyaltyFilter::default().apply(records).len(), 3);
    }
}
