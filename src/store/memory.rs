use super::RecordStore;
use anyhow::Result;

/// Store held in memory for dry runs. Starts from whatever rows it is
/// seeded with.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub rows: Vec<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

impl RecordStore for MemoryStore {
    fn list_column_values(&mut self, column: usize) -> Result<Vec<String>> {
        Ok(self
            .rows
            .iter()
            .filter_map(|r| r.get(column).cloned())
            .collect())
    }

    fn append_row(&mut self, fields: &[String]) -> Result<()> {
        self.rows.push(fields.to_vec());
        Ok(())
    }
}
