use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobLevel {
    Leader,
    Senior,
    Junior,
    Architect,
    Unknown,
}

impl fmt::Display for JobLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobLevel::Leader => "Leader",
            JobLevel::Senior => "Senior",
            JobLevel::Junior => "Junior",
            JobLevel::Architect => "Architect",
            JobLevel::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

// Checked in order; the first bucket with a hit wins.
const BUCKETS: &[(JobLevel, &[&str])] = &[
    (JobLevel::Leader, &["vp", "director", "manager", "head", "chief"]),
    (JobLevel::Senior, &["senior", "sr.", "lead", "iii"]),
    (JobLevel::Junior, &["junior", "jr.", "entry-level", "associate", "trainee"]),
    (JobLevel::Architect, &["architect", "principal"]),
];

/// Case-insensitive substring classification of a job title.
pub fn classify_level(title: &str) -> JobLevel {
    let title = title.to_lowercase();
    BUCKETS
        .iter()
        .find(|(_, words)| words.iter().any(|w| title.contains(w)))
        .map(|(level, _)| *level)
        .unwrap_or(JobLevel::Unknown)
}
