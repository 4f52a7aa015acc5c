//! # Commands
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (session setup, dispatch)
//! ├── scan.rs     ◄─── scan
//! └── records.rs  ◄─── list, delete, clear
//! ```
//!
//! Every command runs inside one [`ScanSession`] that is ended (location
//! abandoned, store closed) before the process exits, whether the command
//! succeeded or not.

pub mod records;
pub mod scan;

use std::io::Write;

use scanqr_remote::RetryPolicy;
use scanqr_store::{BackendConfig, ScanRecordStore, ScanSession};
use tracing::{debug, warn};

use crate::cli::Command;
use crate::error::CliError;

/// Opens a session on `backend` and runs `command`, writing to `out`.
pub async fn execute<W: Write>(
    backend: &BackendConfig,
    retry: bool,
    command: Command,
    out: &mut W,
) -> Result<(), CliError> {
    let store = ScanRecordStore::open(backend).await?;
    let mut session = ScanSession::new(store);

    if retry {
        session = session.with_retry(RetryPolicy::default());
    }
    if let Command::Scan(args) = &command {
        if let Some(provider) = scan::location_provider(args)? {
            session = session.with_location(provider);
        }
    }

    debug!(kind = %backend.kind(), ?command, "Running command");
    let result = match &command {
        Command::Scan(args) => scan::scan(&mut session, args, out).await,
        Command::List { json } => records::list(&mut session, *json, out).await,
        Command::Delete { id } => records::delete(&mut session, id, out).await,
        Command::Clear => records::clear(&mut session, out).await,
    };

    if let Err(e) = session.end().await {
        warn!(error = %e, "Failed to close store");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScanArgs;
    use crate::error::ErrorCode;
    use scanqr_core::Record;

    fn scan(data: &str) -> Command {
        Command::Scan(ScanArgs {
            data: data.into(),
            code_type: "qr".into(),
            lat: None,
            lon: None,
            deny_location: false,
        })
    }

    async fn run(backend: &BackendConfig, command: Command) -> Result<String, CliError> {
        let mut out = Vec::new();
        execute(backend, false, command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    async fn list_json(backend: &BackendConfig) -> Vec<Record> {
        let output = run(backend, Command::List { json: true }).await.unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[tokio::test]
    async fn test_scan_then_list_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let backend = BackendConfig::Sqlite {
            path: dir.path().join("scans.db"),
            reset_on_connect: false,
        };

        let output = run(&backend, scan("first")).await.unwrap();
        assert!(output.contains("first"));
        run(&backend, scan("second")).await.unwrap();

        let data: Vec<String> = list_json(&backend).await.into_iter().map(|r| r.data).collect();
        assert_eq!(data, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_and_clear_on_key_value_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = BackendConfig::KeyValue {
            dir: dir.path().to_path_buf(),
        };
        run(&backend, scan("a")).await.unwrap();
        run(&backend, scan("b")).await.unwrap();

        let records = list_json(&backend).await;
        run(&backend, Command::Delete { id: records[0].id.clone() })
            .await
            .unwrap();
        assert_eq!(list_json(&backend).await.len(), 1);

        let output = run(&backend, Command::Clear).await.unwrap();
        assert!(output.contains("Deleted all"));
        assert!(list_json(&backend).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = BackendConfig::KeyValue {
            dir: dir.path().to_path_buf(),
        };

        let err = run(&backend, Command::Delete { id: "12345".into() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_empty_list_table() {
        let dir = tempfile::tempdir().unwrap();
        let backend = BackendConfig::KeyValue {
            dir: dir.path().to_path_buf(),
        };

        let output = run(&backend, Command::List { json: false }).await.unwrap();
        assert_eq!(output.trim(), records::EMPTY_LIST_TEXT);
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_transient() {
        let backend = BackendConfig::Remote(
            scanqr_remote::RemoteConfig::new("http://127.0.0.1:9")
                .timeout(std::time::Duration::from_millis(500)),
        );

        let err = run(&backend, Command::List { json: true }).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TransientIo);
    }
}
