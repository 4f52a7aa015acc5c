//! # ScanQR CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Load scanqr.toml, apply environment and flag overrides
//! 4. Open the configured backend and run the command
//! 5. Close the backend

use clap::Parser;
use scanqr_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    scanqr_cli::init_tracing(cli.verbose);

    let mut stdout = std::io::stdout();
    scanqr_cli::run(cli, &mut stdout).await?;
    Ok(())
}
