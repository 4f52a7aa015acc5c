//! # Command-Line Arguments
//!
//! ```text
//! scanqr [--backend sqlite|key_value|remote] [--config FILE]
//!        [--db FILE] [--kv-dir DIR] [--remote-url URL] [--retry]
//!        <COMMAND>
//!
//!   scan <DATA> [--type T] [--lat LAT --lon LON | --deny-location]
//!   list [--json]
//!   delete <ID>
//!   clear
//! ```
//!
//! Flags win over environment variables, which win over `scanqr.toml`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scanqr_core::{BackendKind, DEFAULT_CODE_TYPE};
use scanqr_store::{BackendConfig, ConfigResult, StoreSettings};

#[derive(Debug, Parser)]
#[command(name = "scanqr", version, about = "Record, list and delete barcode scans")]
pub struct Cli {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Retry network and timeout failures with exponential backoff
    #[arg(long, global = true)]
    pub retry: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Backend selection flags.
#[derive(Debug, Default, Args)]
pub struct BackendArgs {
    /// Which backend to use
    #[arg(long, global = true, value_parser = parse_kind)]
    pub backend: Option<BackendKind>,

    /// Path to scanqr.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Key-value storage directory
    #[arg(long, global = true)]
    pub kv_dir: Option<PathBuf>,

    /// Base URL of the /codes service
    #[arg(long, global = true)]
    pub remote_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a scanned code
    Scan(ScanArgs),

    /// List stored scans, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete one scan by id
    Delete { id: String },

    /// Delete every scan
    Clear,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// The decoded payload
    pub data: String,

    /// Symbology (qr, ean13, code128, ...)
    #[arg(long = "type", short = 't', default_value = DEFAULT_CODE_TYPE)]
    pub code_type: String,

    /// Latitude of the device
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the device
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Simulate a refused location permission
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub deny_location: bool,
}

fn parse_kind(s: &str) -> Result<BackendKind, String> {
    s.parse().map_err(|e: scanqr_core::StoreError| e.to_string())
}

impl BackendArgs {
    /// Loads `scanqr.toml` and the environment, then applies these flags.
    pub fn resolve(&self) -> ConfigResult<StoreSettings> {
        let mut settings = StoreSettings::load(self.config.clone())?;
        self.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Applies flag overrides on top of `settings`.
    pub fn apply(&self, settings: &mut StoreSettings) {
        if let Some(kind) = self.backend {
            if kind != settings.backend.kind() {
                settings.backend = BackendConfig::default_for(kind);
            }
        }

        match &mut settings.backend {
            BackendConfig::Sqlite { path, .. } => {
                if let Some(db) = &self.db {
                    *path = db.clone();
                }
            }
            BackendConfig::KeyValue { dir } => {
                if let Some(kv_dir) = &self.kv_dir {
                    *dir = kv_dir.clone();
                }
            }
            BackendConfig::Remote(remote) => {
                if let Some(url) = &self.remote_url {
                    remote.base_url = url.clone();
                }
            }
        }
    }
}
