//! # Domain Types
//!
//! Core domain types used throughout ScanQR.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Record      │   │  LocationFix    │   │  DisplayRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (backend)   │   │  coords         │   │  record         │       │
//! │  │  data           │   │  acquired_at    │   │  location?      │       │
//! │  │  type           │   └─────────────────┘   └─────────────────┘       │
//! │  │  timestamp      │            ▲                     │                │
//! │  └─────────────────┘            └── in memory only ───┘                │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  BackendKind    │   │   ListOrder     │                             │
//! │  │  Sqlite         │   │  Insertion…     │                             │
//! │  │  KeyValue       │   │  NewestFirst    │                             │
//! │  │  Remote         │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Lifecycle
//! A Record is produced only by a backend `create`, is never mutated, and is
//! destroyed only by `delete_one` / `delete_all`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::StoreError;

// =============================================================================
// Record
// =============================================================================

/// A persisted scanned-code entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Record {
    /// Opaque identifier allocated by the backend. Never client-supplied.
    pub id: String,

    /// Decoded payload of the scanned code. May be empty.
    pub data: String,

    /// Symbolic code format ("qr", "ean13", ...). Treated as opaque.
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub code_type: String,

    /// Creation time, non-decreasing with insertion order.
    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "created_at"))]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Location
// =============================================================================

/// Device coordinates as reported by the location capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, when the device reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
}

impl Coordinates {
    /// Creates coordinates without accuracy or altitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
            accuracy_m: None,
            altitude_m: None,
        }
    }

    /// Sets the accuracy radius.
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_m = Some(meters);
        self
    }
}

/// A resolved position plus the moment it was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocationFix {
    pub coords: Coordinates,
    #[ts(as = "String")]
    pub acquired_at: DateTime<Utc>,
}

impl LocationFix {
    /// Creates a fix acquired now.
    pub fn now(coords: Coordinates) -> Self {
        LocationFix {
            coords,
            acquired_at: Utc::now(),
        }
    }
}

/// A Record decorated with the location known at capture time.
///
/// The location is joined in memory only. It is never required for, nor
/// written by, persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationFix>,
}

impl DisplayRecord {
    pub fn new(record: Record, location: Option<LocationFix>) -> Self {
        DisplayRecord { record, location }
    }
}

impl From<Record> for DisplayRecord {
    fn from(record: Record) -> Self {
        DisplayRecord {
            record,
            location: None,
        }
    }
}

// =============================================================================
// Backend Kind
// =============================================================================

/// Which persistence implementation is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Embedded relational store (SQLite).
    #[default]
    Sqlite,
    /// Device key-value store holding one serialized sequence.
    KeyValue,
    /// Remote HTTP service.
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::KeyValue => write!(f, "key_value"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sql" | "relational" => Ok(BackendKind::Sqlite),
            "key_value" | "key-value" | "kv" => Ok(BackendKind::KeyValue),
            "remote" | "http" => Ok(BackendKind::Remote),
            other => Err(StoreError::BackendUnavailable(format!(
                "Unknown backend: '{}'. Valid options: sqlite, key_value, remote",
                other
            ))),
        }
    }
}

/// Order in which a backend natively returns `list()` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Oldest record first.
    InsertionAscending,
    /// Newest record first.
    NewestFirst,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> Record {
        Record {
            id: "a1".to_string(),
            data: "ABC123".to_string(),
            code_type: "qr".to_string(),
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_record_serializes_type_field() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["type"], "qr");
        assert!(json.get("code_type").is_none());
    }

    #[test]
    fn test_display_record_flattens_record() {
        let display = DisplayRecord::new(
            sample_record(),
            Some(LocationFix::now(Coordinates::new(19.43, -99.13))),
        );
        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["data"], "ABC123");
        assert_eq!(json["location"]["coords"]["latitude"], 19.43);

        let bare: DisplayRecord = sample_record().into();
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("sqlite".parse::<BackendKind>().unwrap(), BackendKind::Sqlite);
        assert_eq!("kv".parse::<BackendKind>().unwrap(), BackendKind::KeyValue);
        assert_eq!("HTTP".parse::<BackendKind>().unwrap(), BackendKind::Remote);
        assert!("mongo".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_display_round_trips() {
        for kind in [BackendKind::Sqlite, BackendKind::KeyValue, BackendKind::Remote] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }
}
