//! # Wire Protocol
//!
//! JSON bodies exchanged with the remote `/codes` service.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Method  Path          Request              Response                   │
//! │  ──────  ────────────  ───────────────────  ────────────────────────── │
//! │  GET     /codes        -                    [CodeDto]                  │
//! │  POST    /codes        CreateCodeRequest    CodeDto (id allocated)     │
//! │  GET     /codes/{id}   -                    CodeDto | 404              │
//! │  DELETE  /codes/{id}   -                    2xx | 404                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No auth, pagination or versioning. Unknown response fields are ignored.

use chrono::{DateTime, Utc};
use scanqr_core::{Record, DEFAULT_CODE_TYPE};
use serde::{Deserialize, Deserializer, Serialize};

/// Collection path of the service.
pub const CODES_PATH: &str = "/codes";

/// Body of `POST /codes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCodeRequest {
    #[serde(default)]
    pub data: String,
    #[serde(rename = "type", default = "default_code_type")]
    pub code_type: String,
}

/// A record as the service returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDto {
    /// Servers may hand out numeric ids; they are read as strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub data: String,
    #[serde(rename = "type", default = "default_code_type")]
    pub code_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_code_type() -> String {
    DEFAULT_CODE_TYPE.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}

impl CodeDto {
    /// Converts to a Record, stamping `received_at` when the server sent no
    /// timestamp.
    pub fn into_record(self, received_at: DateTime<Utc>) -> Record {
        Record {
            id: self.id,
            data: self.data,
            code_type: self.code_type,
            timestamp: self.timestamp.unwrap_or(received_at),
        }
    }
}

impl From<Record> for CodeDto {
    fn from(record: Record) -> Self {
        CodeDto {
            id: record.id,
            data: record.data,
            code_type: record.code_type,
            timestamp: Some(record.timestamp),
        }
    }
}
