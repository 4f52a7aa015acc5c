//! # Validation Module
//!
//! Input validation for the few values ScanQR actually constrains.
//!
//! ## What Is (and Is Not) Validated
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Scope                                   │
//! │                                                                         │
//! │  Validated                                                              │
//! │  ├── record id      (travels in URL paths: /codes/{id})                │
//! │  └── coordinates    (latitude / longitude ranges)                      │
//! │                                                                         │
//! │  Never validated                                                        │
//! │  ├── data           (empty decode is valid input)                      │
//! │  └── type           (opaque, owned by the scanning capability)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanqr_core::validation::validate_record_id;
//!
//! assert!(validate_record_id("4f1c9a").is_ok());
//! assert!(validate_record_id("").is_err());
//! assert!(validate_record_id("a/b").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Coordinates;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest id any backend hands out, with headroom.
pub const MAX_RECORD_ID_LEN: usize = 128;

/// Validates a record id supplied by a caller.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 128 characters
/// - Must not contain `/`
pub fn validate_record_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > MAX_RECORD_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_RECORD_ID_LEN,
        });
    }

    if id.contains('/') {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must not contain '/'".to_string(),
        });
    }

    Ok(())
}

/// Validates a coordinate pair.
pub fn validate_coordinates(coords: &Coordinates) -> ValidationResult<()> {
    check_range("latitude", coords.latitude, -90.0, 90.0)?;
    check_range("longitude", coords.longitude, -180.0, 180.0)?;
    Ok(())
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    // NaN fails both comparisons, so test inclusion rather than exclusion
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
