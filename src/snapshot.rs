//! Offline field resolution over a detached copy of one listing element.

use crate::driver::LiveRead;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Immutable outer markup of one focus-scope element, captured before any
/// record work starts so later navigation cannot invalidate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    markup: String,
}

impl Snapshot {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Resolves `selector` against the snapshot. Returns the first matching
    /// node's trimmed text and, when asked for, its attribute value.
    pub fn select_one(&self, selector: &str, attr: Option<&str>) -> Result<Option<LiveRead>> {
        let sel = Selector::parse(selector)
            .map_err(|e| anyhow!("invalid selector {selector:?}: {e:?}"))?;
        let doc = Html::parse_fragment(&self.markup);
        let Some(node) = doc.select(&sel).next() else {
            return Ok(None);
        };

        Ok(Some(read(node, attr)))
    }

    /// Reads the captured element itself.
    pub fn root(&self, attr: Option<&str>) -> Option<LiveRead> {
        let doc = Html::parse_fragment(&self.markup);
        let node = doc.root_element().children().find_map(ElementRef::wrap)?;
        Some(read(node, attr))
    }
}

fn read(node: ElementRef<'_>, attr: Option<&str>) -> LiveRead {
    let attribute = attr.and_then(|name| node.value().attr(name).map(str::to_string));
    let text = node.text().collect::<String>().trim().to_string();
    LiveRead { text, attribute }
}
