//! # ScanQR Command-Line Capture Controller
//!
//! Stands in for the capture screen: every command opens one
//! [`ScanSession`](scanqr_store::ScanSession), does its work through the
//! store façade, and ends the session.
//!
//! ## Module Organization
//! ```text
//! scanqr_cli/
//! ├── lib.rs          ◄─── You are here (run, logging)
//! ├── cli.rs          ◄─── clap arguments, flag → settings overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Session setup and dispatch
//! │   ├── scan.rs     ◄─── scan
//! │   └── records.rs  ◄─── list, delete, clear
//! └── error.rs        ◄─── CliError for user-visible failures
//! ```

pub mod cli;
pub mod commands;
pub mod error;

use std::io::Write;

use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::CliError;

/// Resolves the backend from config, environment and flags, then runs the
/// command.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    let settings = cli.backend.resolve()?;
    commands::execute(&settings.backend, cli.retry, cli.command, out).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `list --json` output stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanqr=trace` - Show trace for scanqr crates only
/// - Default: `info,scanqr=debug,sqlx=warn` with `--verbose`, `warn` otherwise
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,scanqr=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
