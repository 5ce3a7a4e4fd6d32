use super::{types::*, Browser};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser as ChromeBrowser, Element, LaunchOptions, Tab};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A single Chrome tab driven over the DevTools protocol.
pub struct ChromeDriver {
    _browser: ChromeBrowser,
    tab: Arc<Tab>,
    settle: Duration,
}

impl ChromeDriver {
    pub fn launch(cfg: &Config) -> Result<Self> {
        let path = resolve_chrome_path(&cfg.browser.chrome_path);
        let options = LaunchOptions {
            headless: cfg.browser.headless,
            path,
            idle_browser_timeout: Duration::from_secs(cfg.browser.idle_timeout_seconds),
            args: vec![
                std::ffi::OsStr::new("--no-first-run"),
                std::ffi::OsStr::new("--no-default-browser-check"),
                std::ffi::OsStr::new("--disable-blink-features=AutomationControlled"),
            ],
            ..Default::default()
        };

        let browser =
            ChromeBrowser::new(options).map_err(|e| anyhow!("browser launch failed: {e}"))?;
        let tab = browser.new_tab().context("opening browser tab")?;
        tab.set_default_timeout(Duration::from_millis(cfg.browser.default_timeout_ms));

        Ok(Self {
            _browser: browser,
            tab,
            settle: Duration::from_millis(cfg.browser.settle_ms),
        })
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }

    fn find(&self, locator: &Locator) -> Result<Element<'_>> {
        // One retry covers elements that go stale between lookup and use.
        let lookup = || match locator {
            Locator::Css(sel) => self.tab.find_element(sel),
            Locator::XPath(xp) => self.tab.find_element_by_xpath(xp),
        };
        match lookup() {
            Ok(el) => Ok(el),
            Err(first) => {
                debug!("retrying lookup of {locator}: {first}");
                lookup().with_context(|| format!("element not found: {locator}"))
            }
        }
    }
}

impl Browser for ChromeDriver {
    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("navigate {url}");
        self.tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .with_context(|| format!("navigating to {url}"))?;
        self.settle();
        Ok(())
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        self.find(locator)?
            .click()
            .with_context(|| format!("clicking {locator}"))?;
        self.settle();
        Ok(())
    }

    fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let el = self.find(&Locator::Css(selector.to_string()))?;
        el.call_js_fn("function() { this.value = ''; }", vec![], false)
            .with_context(|| format!("clearing {selector}"))?;
        el.type_into(text)
            .with_context(|| format!("typing into {selector}"))?;
        self.settle();
        Ok(())
    }

    fn scroll_into_view(&mut self, locator: &Locator) -> Result<()> {
        self.find(locator)?
            .scroll_into_view()
            .with_context(|| format!("scrolling to {locator}"))?;
        Ok(())
    }

    fn outer_html_all(&mut self, selector: &str) -> Result<Vec<String>> {
        let elements = match self.tab.find_elements(selector) {
            Ok(els) => els,
            Err(e) => {
                warn!("no elements for {selector}: {e}");
                return Ok(Vec::new());
            }
        };
        elements
            .iter()
            .map(|el| el.get_content().context("reading outerHTML"))
            .collect()
    }

    fn read_first(&mut self, selector: &str, attr: Option<&str>) -> Result<Option<LiveRead>> {
        let el = match self.find(&Locator::Css(selector.to_string())) {
            Ok(el) => el,
            Err(e) => {
                debug!("{e:#}");
                return Ok(None);
            }
        };
        let attribute = match attr {
            Some(name) => el.get_attribute_value(name)?,
            None => None,
        };
        let text = el.get_inner_text()?.trim().to_string();
        Ok(Some(LiveRead { text, attribute }))
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn evaluate_script(&mut self, js: &str) -> Result<String> {
        let result = self.tab.evaluate(js, false).context("evaluating script")?;
        Ok(match result.value {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }
}

fn resolve_chrome_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        if let Ok(env_val) = std::env::var("CHROME_PATH") {
            return Some(expand_tilde(&env_val));
        }
        return None;
    }
    Some(expand_tilde(raw))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
