//! # Location State Machine
//!
//! Pure transition logic for best-effort location acquisition. The task that
//! drives it lives in `scanqr-store`; this module does no I/O.
//!
//! ## States
//! ```text
//!   Unrequested
//!        │ PermissionRequested
//!        ▼
//!   PermissionRequested ──PermissionDenied──► Denied        (terminal)
//!        │ PermissionGranted
//!        ▼
//!   Acquiring ──PositionFailed──► Unavailable               (terminal)
//!        │ PositionAcquired(fix)
//!        ▼
//!   Available(fix)                                          (terminal)
//! ```
//!
//! No state ever gates persistence. A scan is stored while `Acquiring`,
//! `Denied` or `Unavailable` just the same.

use serde::{Deserialize, Serialize};

use crate::error::{LocationError, LocationResult};
use crate::types::LocationFix;
use crate::{LOCATION_DENIED_TEXT, LOCATION_LOADING_TEXT};

/// Where location acquisition stands for the current session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    #[default]
    Unrequested,
    PermissionRequested,
    Denied {
        message: String,
    },
    Acquiring,
    Available(LocationFix),
    Unavailable {
        reason: String,
    },
}

/// Inputs from the location capability.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    PermissionRequested,
    PermissionGranted,
    PermissionDenied,
    PositionAcquired(LocationFix),
    PositionFailed(String),
}

impl LocationEvent {
    fn name(&self) -> &'static str {
        match self {
            LocationEvent::PermissionRequested => "permission_requested",
            LocationEvent::PermissionGranted => "permission_granted",
            LocationEvent::PermissionDenied => "permission_denied",
            LocationEvent::PositionAcquired(_) => "position_acquired",
            LocationEvent::PositionFailed(_) => "position_failed",
        }
    }
}

impl LocationState {
    /// Returns the state after `event`, or an error when the current state
    /// does not accept it. Terminal states accept nothing.
    pub fn apply(self, event: LocationEvent) -> LocationResult<LocationState> {
        use LocationEvent as E;
        use LocationState as S;

        match (self, event) {
            (S::Unrequested, E::PermissionRequested) => Ok(S::PermissionRequested),
            (S::PermissionRequested, E::PermissionDenied) => Ok(S::Denied {
                message: LOCATION_DENIED_TEXT.to_string(),
            }),
            (S::PermissionRequested, E::PermissionGranted) => Ok(S::Acquiring),
            (S::Acquiring, E::PositionAcquired(fix)) => Ok(S::Available(fix)),
            (S::Acquiring, E::PositionFailed(reason)) => Ok(S::Unavailable { reason }),
            (from, event) => Err(LocationError::InvalidTransition {
                from: from.name().to_string(),
                event: event.name().to_string(),
            }),
        }
    }

    /// Denied, Available and Unavailable never change again this session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LocationState::Denied { .. }
                | LocationState::Available(_)
                | LocationState::Unavailable { .. }
        )
    }

    /// The resolved fix, if any.
    pub fn fix(&self) -> Option<&LocationFix> {
        match self {
            LocationState::Available(fix) => Some(fix),
            _ => None,
        }
    }

    /// The user-visible status line.
    pub fn status_text(&self) -> String {
        match self {
            LocationState::Unrequested
            | LocationState::PermissionRequested
            | LocationState::Acquiring => LOCATION_LOADING_TEXT.to_string(),
            LocationState::Denied { message } => message.clone(),
            LocationState::Available(fix) => serde_json::to_string(fix).unwrap_or_else(|_| {
                format!("{}, {}", fix.coords.latitude, fix.coords.longitude)
            }),
            LocationState::Unavailable { reason } => reason.clone(),
        }
    }

    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            LocationState::Unrequested => "unrequested",
            LocationState::PermissionRequested => "permission_requested",
            LocationState::Denied { .. } => "denied",
            LocationState::Acquiring => "acquiring",
            LocationState::Available(_) => "available",
            LocationState::Unavailable { .. } => "unavailable",
        }
    }
}

impl std::fmt::Display for LocationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;

    fn fix() -> LocationFix {
        LocationFix::now(Coordinates::new(19.4326, -99.1332))
    }

    #[test]
    fn test_happy_path_reaches_available() {
        let fix = fix();
        let state = LocationState::Unrequested
            .apply(LocationEvent::PermissionRequested)
            .and_then(|s| s.apply(LocationEvent::PermissionGranted))
            .and_then(|s| s.apply(LocationEvent::PositionAcquired(fix)))
            .unwrap();

        assert!(state.is_terminal());
        assert_eq!(state.fix(), Some(&fix));
        assert!(state.status_text().contains("19.4326"));
    }

    #[test]
    fn test_pending_states_show_loading() {
        assert_eq!(LocationState::Unrequested.status_text(), "Loading...");
        assert_eq!(LocationState::PermissionRequested.status_text(), "Loading...");
        assert_eq!(LocationState::Acquiring.status_text(), "Loading...");
    }

    #[test]
    fn test_denied_is_terminal() {
        let denied = LocationState::PermissionRequested
            .apply(LocationEvent::PermissionDenied)
            .unwrap();
        assert_eq!(denied.status_text(), "Location permission denied.");

        let err = denied
            .apply(LocationEvent::PermissionGranted)
            .unwrap_err();
        assert_eq!(
            err,
            LocationError::InvalidTransition {
                from: "denied".to_string(),
                event: "permission_granted".to_string(),
            }
        );
    }

    #[test]
    fn test_position_failure_is_unavailable() {
        let state = LocationState::Acquiring
            .apply(LocationEvent::PositionFailed("GPS timeout".to_string()))
            .unwrap();
        assert!(state.is_terminal());
        assert!(state.fix().is_none());
        assert_eq!(state.status_text(), "GPS timeout");
    }

    #[test]
    fn test_fix_cannot_arrive_before_permission() {
        assert!(LocationState::Unrequested
            .apply(LocationEvent::PositionAcquired(fix()))
            .is_err());
    }
}
