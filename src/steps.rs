use crate::driver::Locator;
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `json_replace_text` rule that unwraps the outermost `{ ... }` of the payload.
pub const JSON_BODY_SENTINEL: &str = "__json_body__";

/// One top-level action of a site's step program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    LoadUrl {
        url: String,
    },
    Sleep {},
    ScrollTo {
        xpath: String,
    },
    ClickButton {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        xpath: Option<String>,
    },
    SelectCheckbox {
        selector: String,
    },
    TypeText {
        selector: String,
        text: String,
    },
    DataExtract {
        focus_scope: String,
        extract_steps: Vec<ExtractStep>,
    },
    JsonSetPayload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        script: Option<String>,
    },
    JsonReplaceText {
        text_find: String,
        #[serde(default)]
        text_replace: String,
    },
    JsonDataExtract {
        focus_scope: String,
        extract_steps: Vec<ExtractStep>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::LoadUrl { .. } => "load_url",
            Step::Sleep {} => "sleep",
            Step::ScrollTo { .. } => "scroll_to",
            Step::ClickButton { .. } => "click_button",
            Step::SelectCheckbox { .. } => "select_checkbox",
            Step::TypeText { .. } => "type_text",
            Step::DataExtract { .. } => "data_extract",
            Step::JsonSetPayload { .. } => "json_set_payload",
            Step::JsonReplaceText { .. } => "json_replace_text",
            Step::JsonDataExtract { .. } => "json_data_extract",
        }
    }

    /// Locator of a `click_button`. `xpath` wins when both are given.
    pub fn click_locator(selector: &Option<String>, xpath: &Option<String>) -> Option<Locator> {
        match (selector, xpath) {
            (_, Some(xp)) => Some(Locator::XPath(xp.clone())),
            (Some(css), None) => Some(Locator::Css(css.clone())),
            (None, None) => None,
        }
    }
}

/// One step of the per-record extraction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExtractStep {
    Extract {
        as_column: String,
        /// CSS selector in DOM branches, key path in the JSON branch.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        xpath: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attr_target: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_type: Option<String>,
    },
    Redirect {
        using_column: String,
    },
    ReplaceText {
        using_column: String,
        text_find: String,
        #[serde(default)]
        text_replace: String,
    },
    RegexExtract {
        using_column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        as_column: Option<String>,
        regex: String,
    },
    Next {},
}

impl ExtractStep {
    /// Compiles every `regex_extract` pattern of `steps` once. The result
    /// lines up with `steps`; other step kinds get `None`.
    pub fn compile_patterns(steps: &[ExtractStep]) -> Result<Vec<Option<Regex>>> {
        steps
            .iter()
            .map(|s| match s {
                ExtractStep::RegexExtract { regex, .. } => Regex::new(regex)
                    .map(Some)
                    .map_err(|e| anyhow!("bad regex_extract pattern {regex:?}: {e}")),
                _ => Ok(None),
            })
            .collect()
    }

    pub fn is_url(data_type: &Option<String>) -> bool {
        data_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("url"))
    }
}

/// Ordered site name -> steps mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepProgram {
    pub sites: Vec<Site>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub name: String,
    pub steps: Vec<Step>,
}

impl StepProgram {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading step program: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing step program: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let doc: serde_json::Value = serde_json::from_str(raw).context("step program is not JSON")?;
        let obj = doc
            .as_object()
            .ok_or_else(|| anyhow!("step program must be an object of site -> steps"))?;

        let mut sites = Vec::with_capacity(obj.len());
        for (name, steps) in obj {
            let steps: Vec<Step> = serde_json::from_value(steps.clone())
                .with_context(|| format!("site {name:?}"))?;
            validate(name, &steps)?;
            sites.push(Site {
                name: name.clone(),
                steps,
            });
        }
        Ok(Self { sites })
    }

    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.name == name)
    }
}

fn validate(site: &str, steps: &[Step]) -> Result<()> {
    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::ClickButton { selector, xpath } => {
                if Step::click_locator(selector, xpath).is_none() {
                    bail!("site {site:?} step {i}: click_button needs a selector or xpath");
                }
            }
            Step::DataExtract { extract_steps, .. }
            | Step::JsonDataExtract { extract_steps, .. } => {
                for es in extract_steps {
                    if let ExtractStep::RegexExtract { regex, .. } = es {
                        Regex::new(regex).with_context(|| {
                            format!("site {site:?} step {i}: invalid regex_extract pattern")
                        })?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
