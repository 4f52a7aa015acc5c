//! # Scan Session
//!
//! One capture screen's worth of state: the store, the location correlator,
//! and the list the user is looking at.
//!
//! ## Capture Flow
//! ```text
//!   capture(data, type)
//!       │
//!       ├─► fix = correlator.current_fix()      (never awaited)
//!       ├─► store.create(data, type)
//!       │      ├─ Err ──► notice = "...", list unchanged, return Err
//!       │      └─ Ok(record)
//!       ├─► locations[record.id] = fix          (in memory only)
//!       └─► refresh()                           (list newest first)
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use scanqr_core::{DisplayRecord, LocationFix, StoreResult};
use scanqr_remote::{retry, RetryPolicy};
use tracing::{debug, warn};

use crate::location::{LocationCorrelator, LocationProvider};
use crate::store::ScanRecordStore;

/// Explicitly owned capture session.
#[derive(Debug)]
pub struct ScanSession {
    store: ScanRecordStore,
    correlator: Option<LocationCorrelator>,
    locations: HashMap<String, LocationFix>,
    records: Vec<DisplayRecord>,
    notice: Option<String>,
    retry: Option<RetryPolicy>,
}

impl ScanSession {
    /// A session over `store` without location or retries.
    pub fn new(store: ScanRecordStore) -> Self {
        ScanSession {
            store,
            correlator: None,
            locations: HashMap::new(),
            records: Vec::new(),
            notice: None,
            retry: None,
        }
    }

    /// Starts location acquisition for this session.
    pub fn with_location(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.correlator = Some(LocationCorrelator::start(provider));
        self
    }

    /// Retries transient store failures with `policy`.
    ///
    /// A retried create may store the scan twice on a remote backend.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Persists a scan and returns it with whatever location was known.
    pub async fn capture(&mut self, data: &str, code_type: &str) -> StoreResult<DisplayRecord> {
        let fix = self.correlator.as_ref().and_then(|c| c.current_fix());
        let store = &self.store;

        let record = match attempt(self.retry.as_ref(), || store.create(data, code_type)).await {
            Ok(record) => record,
            Err(e) => {
                self.notice = Some(format!("Could not save scan: {e}"));
                return Err(e);
            }
        };

        debug!(id = %record.id, located = fix.is_some(), "Scan captured");
        if let Some(fix) = fix {
            self.locations.insert(record.id.clone(), fix);
        }
        let display = DisplayRecord::new(record, fix);

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Scan saved but list refresh failed");
        }
        Ok(display)
    }

    /// Reloads the display list from the store.
    ///
    /// On failure the previous list is kept.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        let store = &self.store;
        match attempt(self.retry.as_ref(), || store.list()).await {
            Ok(records) => {
                self.records = records
                    .into_iter()
                    .map(|r| {
                        let location = self.locations.get(&r.id).copied();
                        DisplayRecord::new(r, location)
                    })
                    .collect();
                Ok(())
            }
            Err(e) => {
                self.notice = Some(format!("Could not load scans: {e}"));
                Err(e)
            }
        }
    }

    pub async fn delete_one(&mut self, id: &str) -> StoreResult<()> {
        let store = &self.store;
        if let Err(e) = attempt(self.retry.as_ref(), || store.delete_one(id)).await {
            self.notice = Some(format!("Could not delete scan: {e}"));
            return Err(e);
        }
        self.locations.remove(id);
        self.records.retain(|r| r.record.id != id);
        Ok(())
    }

    pub async fn delete_all(&mut self) -> StoreResult<()> {
        let store = &self.store;
        if let Err(e) = attempt(self.retry.as_ref(), || store.delete_all()).await {
            self.notice = Some(format!("Could not delete scans: {e}"));
            return Err(e);
        }
        self.locations.clear();
        self.records.clear();
        Ok(())
    }

    // =========================================================================
    // View State
    // =========================================================================

    /// The display list, newest first.
    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    /// Location status line, if location was requested for this session.
    pub fn location_status(&self) -> Option<String> {
        self.correlator.as_ref().map(LocationCorrelator::status_text)
    }

    /// The pending one-shot notice. Returns it once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn correlator(&self) -> Option<&LocationCorrelator> {
        self.correlator.as_ref()
    }

    pub fn store(&self) -> &ScanRecordStore {
        &self.store
    }

    /// Ends the session: abandons location, then closes the store.
    pub async fn end(self) -> StoreResult<()> {
        if let Some(correlator) = &self.correlator {
            correlator.abandon();
        }
        self.store.close().await
    }
}

async fn attempt<T, F, Fut>(policy: Option<&RetryPolicy>, mut op: F) -> StoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    match policy {
        Some(policy) => retry(policy, op).await,
        None => op().await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
