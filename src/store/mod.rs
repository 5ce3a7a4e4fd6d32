pub mod memory;
pub mod sheet;

use anyhow::Result;

pub use memory::MemoryStore;
pub use sheet::SheetStore;

/// Positional row schema shared with the review sheet.
pub const COLUMNS: [&str; 9] = [
    "JobID",
    "JobTitle",
    "JobUrl",
    "Keywords",
    "JobDesc",
    "JobLevel",
    "JobPay",
    "Swipe",
    "DiscoveryDate",
];

pub const ID_INDEX: usize = 0;
pub const URL_INDEX: usize = 2;

/// The durable record store postings are deduplicated against.
pub trait RecordStore {
    fn list_column_values(&mut self, column: usize) -> Result<Vec<String>>;
    fn append_row(&mut self, fields: &[String]) -> Result<()>;

    /// Whether `id` is already stored, as a `JobID` or as a `JobUrl`.
    fn exists(&mut self, id: &str) -> Result<bool> {
        if self.list_column_values(ID_INDEX)?.iter().any(|v| v == id) {
            return Ok(true);
        }
        Ok(self.list_column_values(URL_INDEX)?.iter().any(|v| v == id))
    }
}
