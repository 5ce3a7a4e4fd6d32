use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub browser: BrowserCfg,
    #[serde(default)]
    pub extraction: Extraction,
    #[serde(default)]
    pub postprocess: Postprocess,
    #[serde(default)]
    pub enrichment: Enrichment,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub steps_path: String,
    pub sleep_seconds: u64,
    /// Sites to run, by name. Empty runs every site in the step program.
    pub sites: Vec<String>,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            steps_path: "steps.json".into(),
            sleep_seconds: 15,
            sites: Vec::new(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserCfg {
    pub headless: bool,
    pub chrome_path: String,
    pub default_timeout_ms: u64,
    pub settle_ms: u64,
    pub idle_timeout_seconds: u64,
    pub payload_script: String,
}
impl Default for BrowserCfg {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_path: "auto".into(),
            default_timeout_ms: 3000,
            settle_ms: 2000,
            idle_timeout_seconds: 120,
            payload_script: "document.body.innerText".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Extraction {
    /// Columns echoed at debug level as they are extracted.
    pub log_key_columns: Vec<String>,
}
impl Default for Extraction {
    fn default() -> Self {
        Self {
            log_key_columns: vec!["JobTitle".into(), "JobID".into(), "JobUrl".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Postprocess {
    pub remove_canned_text: bool,
    pub description_column: String,
}
impl Default for Postprocess {
    fn default() -> Self {
        Self {
            remove_canned_text: true,
            description_column: "JobDesc".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Enrichment {
    pub title_column: String,
    pub keywords_top_n: usize,
    pub normalize_unicode: bool,
}
impl Default for Enrichment {
    fn default() -> Self {
        Self {
            title_column: "JobTitle".into(),
            keywords_top_n: 10,
            normalize_unicode: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    pub enabled: bool,
    pub path: String,
}
impl Default for Store {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "out/job_postings.tsv".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub out_dir: String,
    pub file_suffix: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            file_suffix: "_job_postings.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
