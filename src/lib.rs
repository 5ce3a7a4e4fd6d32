pub mod cli;
pub mod config;
pub mod driver;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod gate;
pub mod interpreter;
pub mod json_branch;
pub mod keywords;
pub mod level;
pub mod pay;
pub mod pipeline;
pub mod postprocess;
pub mod record;
pub mod report;
pub mod snapshot;
pub mod steps;
pub mod store;
pub mod util;
