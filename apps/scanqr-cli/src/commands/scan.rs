//! # Scan Command
//!
//! ```text
//!  $ scanqr scan "https://example.com" --lat 51.5 --lon -0.12
//!       │
//!       ├─► location correlator started (static provider from flags)
//!       ├─► short grace period, like a camera screen being open
//!       ├─► session.capture(data, type)   (persisted whatever the location)
//!       └─► Saved 7f3a… [qr] https://example.com
//!           Location: {"coords":{"latitude":51.5,...}}
//! ```

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use scanqr_core::validation::validate_coordinates;
use scanqr_core::Coordinates;
use scanqr_store::{LocationProvider, ScanSession, StaticLocationProvider};
use tracing::debug;

use crate::cli::ScanArgs;
use crate::error::CliError;

/// How long a scan gives location to resolve before saving anyway.
const LOCATION_GRACE: Duration = Duration::from_millis(250);

/// Builds the location provider the flags describe, if any.
pub fn location_provider(args: &ScanArgs) -> Result<Option<Arc<dyn LocationProvider>>, CliError> {
    if args.deny_location {
        return Ok(Some(Arc::new(StaticLocationProvider::denied())));
    }

    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let coords = Coordinates::new(lat, lon);
            validate_coordinates(&coords).map_err(|e| CliError::validation(e.to_string()))?;
            Ok(Some(Arc::new(StaticLocationProvider::granted(coords))))
        }
        _ => Ok(None),
    }
}

pub async fn scan<W: Write>(
    session: &mut ScanSession,
    args: &ScanArgs,
    out: &mut W,
) -> Result<(), CliError> {
    if let Some(correlator) = session.correlator() {
        if tokio::time::timeout(LOCATION_GRACE, correlator.settled())
            .await
            .is_err()
        {
            debug!("Location still pending, saving without it");
        }
    }

    let display = session.capture(&args.data, &args.code_type).await?;
    let record = &display.record;
    writeln!(out, "Saved {} [{}] {}", record.id, record.code_type, record.data)?;

    if let Some(status) = session.location_status() {
        writeln!(out, "Location: {}", status)?;
    }
    if let Some(notice) = session.take_notice() {
        writeln!(out, "{}", notice)?;
    }
    Ok(())
}
