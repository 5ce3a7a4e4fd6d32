use crate::gate::GateOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteReport {
    pub site: String,
    pub started: String,
    pub finished: String,
    pub records: usize,
    pub records_dropped: usize,
    pub canned_sentences_removed: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub missing_id: usize,
    pub output: Option<String>,
    pub aborted: Option<String>,
}

impl SiteReport {
    pub fn apply_gate(&mut self, gate: &GateOutcome) {
        self.accepted = gate.accepted;
        self.skipped = gate.skipped;
        self.missing_id = gate.missing_id;
    }
}
