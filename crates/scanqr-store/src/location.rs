//! # Location Correlator
//!
//! Acquires one position per session, independently of scanning.
//!
//! ```text
//!   LocationCorrelator::start(provider)
//!        │
//!        └─► tokio::spawn ──► request_permission ──► current_position
//!                 │                                        │
//!                 └──────── watch::Sender<LocationState> ◄─┘
//!                                      │
//!                   state() / current_fix() / status_text() / settled()
//! ```
//!
//! The capture path only ever reads the latest published state. It never
//! waits for location.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scanqr_core::error::LocationResult;
use scanqr_core::validation::validate_coordinates;
use scanqr_core::{Coordinates, LocationError, LocationEvent, LocationFix, LocationState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Source of permission decisions and positions.
#[async_trait]
pub trait LocationProvider: Send + Sync + std::fmt::Debug {
    /// Asks for location permission. `false` means denied.
    async fn request_permission(&self) -> bool;

    /// Reads the current position. Only called after permission was granted.
    async fn current_position(&self) -> LocationResult<LocationFix>;
}

#[derive(Debug, Clone)]
enum Outcome {
    Granted(Coordinates),
    Denied,
    Failing(String),
}

/// Provider with a fixed answer. Used by the CLI and in tests.
#[derive(Debug, Clone)]
pub struct StaticLocationProvider {
    outcome: Outcome,
    delay: Duration,
}

impl StaticLocationProvider {
    /// Grants permission and reports `coords`.
    pub fn granted(coords: Coordinates) -> Self {
        Self::with_outcome(Outcome::Granted(coords))
    }

    /// Refuses permission.
    pub fn denied() -> Self {
        Self::with_outcome(Outcome::Denied)
    }

    /// Grants permission, then fails to produce a position.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Failing(reason.into()))
    }

    /// Delays the position answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn with_outcome(outcome: Outcome) -> Self {
        StaticLocationProvider {
            outcome,
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn request_permission(&self) -> bool {
        !matches!(self.outcome, Outcome::Denied)
    }

    async fn current_position(&self) -> LocationResult<LocationFix> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Outcome::Granted(coords) => Ok(LocationFix::now(*coords)),
            Outcome::Denied => Err(LocationError::PermissionDenied(
                "permission was not granted".into(),
            )),
            Outcome::Failing(reason) => Err(LocationError::PositionUnavailable(reason.clone())),
        }
    }
}

// =============================================================================
// Correlator
// =============================================================================

/// Drives the location state machine on its own task.
///
/// Dropping the correlator aborts the task. A position that arrives after
/// that is discarded.
#[derive(Debug)]
pub struct LocationCorrelator {
    state_rx: watch::Receiver<LocationState>,
    task: JoinHandle<()>,
}

impl LocationCorrelator {
    /// Starts acquisition in the background and returns immediately.
    pub fn start(provider: Arc<dyn LocationProvider>) -> Self {
        let (state_tx, state_rx) = watch::channel(LocationState::default());
        let task = tokio::spawn(acquire(provider, state_tx));
        LocationCorrelator { state_rx, task }
    }

    /// Latest published state.
    pub fn state(&self) -> LocationState {
        self.state_rx.borrow().clone()
    }

    /// The fix, once available.
    pub fn current_fix(&self) -> Option<LocationFix> {
        self.state_rx.borrow().fix().copied()
    }

    pub fn status_text(&self) -> String {
        self.state_rx.borrow().status_text()
    }

    /// Waits for a terminal state.
    ///
    /// If the task ended without reaching one (for example after
    /// [`abandon`](Self::abandon)), the last published state is returned.
    pub async fn settled(&self) -> LocationState {
        let mut rx = self.state_rx.clone();
        let terminal = match rx.wait_for(LocationState::is_terminal).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        terminal.unwrap_or_else(|| rx.borrow().clone())
    }

    /// Stops acquisition. The published state stays where it was.
    pub fn abandon(&self) {
        if !self.task.is_finished() {
            debug!("Abandoning location acquisition");
            self.task.abort();
        }
    }
}

impl Drop for LocationCorrelator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn acquire(provider: Arc<dyn LocationProvider>, tx: watch::Sender<LocationState>) {
    step(&tx, LocationEvent::PermissionRequested);

    if !provider.request_permission().await {
        step(&tx, LocationEvent::PermissionDenied);
        return;
    }
    step(&tx, LocationEvent::PermissionGranted);

    let event = match provider.current_position().await {
        Ok(fix) => match validate_coordinates(&fix.coords) {
            Ok(()) => LocationEvent::PositionAcquired(fix),
            Err(e) => LocationEvent::PositionFailed(e.to_string()),
        },
        Err(e) => LocationEvent::PositionFailed(e.to_string()),
    };
    step(&tx, event);
}

fn step(tx: &watch::Sender<LocationState>, event: LocationEvent) {
    let current = tx.borrow().clone();
    match current.apply(event) {
        Ok(next) => {
            debug!(state = %next, "Location state changed");
            tx.send_replace(next);
        }
        Err(e) => warn!(error = %e, "Ignored location event"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
