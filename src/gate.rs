use crate::{
    record::Record,
    store::{RecordStore, COLUMNS},
    util::{ensure_dir, write_atomic},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub accepted: usize,
    pub skipped: usize,
    pub missing_id: usize,
}

/// Dedup key of a record: its `JobID`, else its `JobUrl`.
pub fn identifier(record: &Record) -> Option<String> {
    ["JobID", "JobUrl"]
        .iter()
        .filter_map(|c| record.text(c))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// The positional store row for `record`.
pub fn to_row(record: &Record, discovery_date: &str) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|&c| match c {
            "DiscoveryDate" => discovery_date.to_string(),
            "Swipe" => String::new(),
            other => record.text(other).unwrap_or_default(),
        })
        .collect()
}

/// Forwards records the store has not seen yet. Records already stored, or
/// without any identifier, are skipped.
pub fn forward_new(
    batch: &[Record],
    store: &mut dyn RecordStore,
    discovery_date: &str,
) -> Result<GateOutcome> {
    let mut outcome = GateOutcome::default();

    for record in batch {
        let Some(id) = identifier(record) else {
            warn!("record without JobID/JobUrl not forwarded");
            outcome.missing_id += 1;
            continue;
        };

        if store.exists(&id).with_context(|| format!("store lookup for {id}"))? {
            debug!("skip {id}: already stored");
            outcome.skipped += 1;
            continue;
        }

        store
            .append_row(&to_row(record, discovery_date))
            .with_context(|| format!("appending {id}"))?;
        info!(
            "accepted {id}: {}",
            record.text("JobTitle").unwrap_or_default()
        );
        outcome.accepted += 1;
    }

    Ok(outcome)
}

/// `<out_dir>/<site><suffix>`
pub fn batch_path(out_dir: &Path, site: &str, suffix: &str) -> PathBuf {
    out_dir.join(format!("{site}{suffix}"))
}

/// Persists the whole batch as a pretty JSON array, atomically replacing
/// any previous file for the site.
pub fn write_batch(path: &Path, batch: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(batch)?;
    write_atomic(path, json.as_bytes())?;
    info!("wrote {} records to {}", batch.len(), path.display());
    Ok(())
}
