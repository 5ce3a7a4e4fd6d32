#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use job_scout::{
    config::Config,
    driver::{Browser, LiveRead, Locator},
};
use scraper::{Html, Selector};
use std::collections::HashMap;

/// In-memory browser: a fixed set of pages keyed by URL, resolved with the
/// same HTML parser the crate uses for snapshots.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    pub pages: HashMap<String, String>,
    pub current: String,
    pub navigations: Vec<String>,
    pub clicks: Vec<Locator>,
    pub typed: Vec<(String, String)>,
    pub scrolled: Vec<Locator>,
    pub script_result: String,
    pub fail_clicks: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn doc(&self) -> Result<Html> {
        let html = self
            .pages
            .get(&self.current)
            .ok_or_else(|| anyhow!("no page loaded"))?;
        Ok(Html::parse_document(html))
    }
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("bad selector {s}: {e:?}"))
}

impl Browser for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigations.push(url.to_string());
        if !self.pages.contains_key(url) {
            bail!("404 {url}");
        }
        self.current = url.to_string();
        Ok(())
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        if self.fail_clicks {
            bail!("click timed out: {locator}");
        }
        if let Locator::Css(css) = locator {
            if self.doc()?.select(&selector(css)?).next().is_none() {
                bail!("element not found: {locator}");
            }
        }
        self.clicks.push(locator.clone());
        Ok(())
    }

    fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.typed.push((selector.to_string(), text.to_string()));
        Ok(())
    }

    fn scroll_into_view(&mut self, locator: &Locator) -> Result<()> {
        self.scrolled.push(locator.clone());
        Ok(())
    }

    fn outer_html_all(&mut self, sel: &str) -> Result<Vec<String>> {
        let doc = self.doc()?;
        Ok(doc.select(&selector(sel)?).map(|e| e.html()).collect())
    }

    fn read_first(&mut self, sel: &str, attr: Option<&str>) -> Result<Option<LiveRead>> {
        let doc = self.doc()?;
        let found = doc.select(&selector(sel)?).next().map(|e| LiveRead {
            text: e.text().collect::<String>().trim().to_string(),
            attribute: attr.and_then(|a| e.value().attr(a).map(str::to_string)),
        });
        Ok(found)
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.current.clone())
    }

    fn evaluate_script(&mut self, _js: &str) -> Result<String> {
        Ok(self.script_result.clone())
    }
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.global.sleep_seconds = 0;
    cfg
}

pub const LISTING_URL: &str = "https://jobs.example.com/list";

pub fn listing_html() -> String {
    r#"<html><body><ul>
        <li class="card"><h3 class="title">Senior Rust Engineer</h3><a class="link" href="/jobs/101">view</a><span class="tag">rust</span><span class="tag">remote</span><span class="tag">rust</span></li>
        <li class="card"><h3 class="title">Engineering Manager</h3><a class="link" href="/jobs/102">view</a><span class="tag">lead</span></li>
        <li class="card"><h3 class="title">Junior Developer</h3><a class="link" href="/jobs/103">view</a><span class="tag">go</span></li>
    </ul></body></html>"#
        .to_string()
}

pub fn detail_html(desc: &str) -> String {
    format!(r#"<html><body><h1>Detail</h1><div class="desc">{desc}</div></body></html>"#)
}
