//! List, delete and clear.

use std::io::Write;

use scanqr_store::ScanSession;
use tracing::info;

use crate::error::CliError;

pub const EMPTY_LIST_TEXT: &str = "No scans yet.";

pub async fn list<W: Write>(session: &mut ScanSession, json: bool, out: &mut W) -> Result<(), CliError> {
    session.refresh().await?;
    let records = session.records();

    if json {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(out, "{}", EMPTY_LIST_TEXT)?;
        return Ok(());
    }

    for entry in records {
        let r = &entry.record;
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            r.id,
            r.code_type,
            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            r.data
        )?;
    }
    Ok(())
}

pub async fn delete<W: Write>(session: &mut ScanSession, id: &str, out: &mut W) -> Result<(), CliError> {
    session.delete_one(id).await?;
    info!(id = %id, "Scan deleted");
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}

pub async fn clear<W: Write>(session: &mut ScanSession, out: &mut W) -> Result<(), CliError> {
    session.delete_all().await?;
    info!("All scans deleted");
    writeln!(out, "Deleted all scans")?;
    Ok(())
}
