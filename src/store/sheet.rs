use super::{RecordStore, COLUMNS};
use crate::util::ensure_dir;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A tab-separated sheet on disk: one header row, then one row per posting.
/// Rows are only ever appended.
pub struct SheetStore {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl SheetStore {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            std::fs::write(path, format!("{}\n", COLUMNS.join("\t")))
                .with_context(|| format!("creating sheet: {}", path.display()))?;
            return Ok(Self {
                path: path.to_path_buf(),
                rows: Vec::new(),
            });
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading sheet: {}", path.display()))?;
        let rows: Vec<Vec<String>> = raw
            .lines()
            .skip(1)
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split('\t').map(str::to_string).collect())
            .collect();
        debug!("sheet {} has {} rows", path.display(), rows.len());

        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RecordStore for SheetStore {
    fn list_column_values(&mut self, column: usize) -> Result<Vec<String>> {
        Ok(self
            .rows
            .iter()
            .filter_map(|r| r.get(column).cloned())
            .collect())
    }

    fn append_row(&mut self, fields: &[String]) -> Result<()> {
        let cells: Vec<String> = fields.iter().map(|f| sanitize_cell(f)).collect();
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening sheet: {}", self.path.display()))?;
        writeln!(file, "{}", cells.join("\t"))
            .with_context(|| format!("appending to sheet: {}", self.path.display()))?;
        self.rows.push(cells);
        Ok(())
    }
}

fn sanitize_cell(s: &str) -> String {
    s.replace(['\t', '\r', '\n'], " ")
}
