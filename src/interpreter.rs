use crate::{
    config::Config,
    driver::{Browser, Locator},
    error::{ActionError, ActionResult},
    extract::{self, FieldSpec, Source},
    json_branch,
    record::Record,
    snapshot::Snapshot,
    steps::{ExtractStep, Site, Step},
};
use anyhow::anyhow;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// State owned by one site run. Created when the site starts and dropped once
/// its batch has been handed on.
#[derive(Debug, Default)]
pub struct SiteContext {
    pub batch: Vec<Record>,
    pub json_payload: Option<String>,
}

/// Per-posting state while its extract steps run.
#[derive(Debug, Default)]
pub struct RecordState {
    pub record: Record,
    pub on_detail_page: bool,
}

/// What a site run produced.
#[derive(Debug, Default)]
pub struct SiteRun {
    pub batch: Vec<Record>,
    /// Set when the site's step list was abandoned part way.
    pub failure: Option<String>,
    pub records_dropped: usize,
}

pub struct Interpreter<'a> {
    cfg: &'a Config,
    browser: &'a mut dyn Browser,
    dropped: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(cfg: &'a Config, browser: &'a mut dyn Browser) -> Self {
        Self {
            cfg,
            browser,
            dropped: 0,
        }
    }

    /// Executes every step of `site` in order.
    pub fn run_site(&mut self, site: &Site) -> SiteRun {
        info!("site {} start ({} steps)", site.name, site.steps.len());
        self.dropped = 0;
        let mut ctx = SiteContext::default();

        for (i, step) in site.steps.iter().enumerate() {
            debug!("site {} step {i}: {}", site.name, step.name());
            match self.dispatch(&mut ctx, step) {
                Ok(()) => {}
                Err(ActionError::Interaction(e)) => {
                    warn!(
                        "site {} step {i} ({}) failed, continuing: {e:#}",
                        site.name,
                        step.name()
                    );
                }
                Err(ActionError::Miss(msg)) => {
                    warn!("site {} step {i} ({}): {msg}", site.name, step.name());
                }
                Err(ActionError::Site(e)) => {
                    error!(
                        "site {} aborted at step {i} ({}): {e:#}",
                        site.name,
                        step.name()
                    );
                    return SiteRun {
                        batch: ctx.batch,
                        failure: Some(format!("step {i} ({}): {e:#}", step.name())),
                        records_dropped: self.dropped,
                    };
                }
            }
        }

        info!("site {} finished with {} records", site.name, ctx.batch.len());
        SiteRun {
            batch: ctx.batch,
            failure: None,
            records_dropped: self.dropped,
        }
    }

    fn dispatch(&mut self, ctx: &mut SiteContext, step: &Step) -> ActionResult {
        match step {
            Step::LoadUrl { url } => self.interact(|b| b.navigate(url)),
            Step::Sleep {} => {
                std::thread::sleep(Duration::from_secs(self.cfg.global.sleep_seconds));
                Ok(())
            }
            Step::ScrollTo { xpath } => {
                let loc = Locator::XPath(xpath.clone());
                self.interact(|b| b.scroll_into_view(&loc))
            }
            Step::ClickButton { selector, xpath } => {
                let loc = Step::click_locator(selector, xpath)
                    .ok_or_else(|| anyhow!("click_button without selector or xpath"))?;
                self.interact(|b| b.click(&loc))
            }
            Step::SelectCheckbox { selector } => {
                let loc = Locator::Css(selector.clone());
                self.interact(|b| b.click(&loc))
            }
            Step::TypeText { selector, text } => self.interact(|b| b.type_text(selector, text)),
            Step::DataExtract {
                focus_scope,
                extract_steps,
            } => self.data_extract(ctx, focus_scope, extract_steps),
            Step::JsonSetPayload { script } => {
                let js = script
                    .as_deref()
                    .unwrap_or(self.cfg.browser.payload_script.as_str())
                    .to_string();
                let payload = self.interact(|b| b.evaluate_script(&js))?;
                debug!("json payload captured ({} bytes)", payload.len());
                ctx.json_payload = Some(payload);
                Ok(())
            }
            Step::JsonReplaceText {
                text_find,
                text_replace,
            } => {
                match ctx.json_payload.take() {
                    Some(p) => {
                        ctx.json_payload =
                            Some(json_branch::replace_text(&p, text_find, text_replace));
                    }
                    None => warn!("json_replace_text before any payload was captured"),
                }
                Ok(())
            }
            Step::JsonDataExtract {
                focus_scope,
                extract_steps,
            } => {
                let Some(payload) = ctx.json_payload.as_deref() else {
                    return Err(ActionError::Miss("json_data_extract without a payload".into()));
                };
                let base = self.browser.current_url().ok();
                let records = json_branch::extract_records(
                    payload,
                    focus_scope,
                    extract_steps,
                    base.as_deref(),
                )
                .map_err(|e| ActionError::Miss(format!("{e:#}")))?;
                for r in &records {
                    self.log_key_columns(r);
                }
                ctx.batch.extend(records);
                Ok(())
            }
        }
    }

    fn interact<T>(
        &mut self,
        f: impl FnOnce(&mut dyn Browser) -> anyhow::Result<T>,
    ) -> ActionResult<T> {
        f(&mut *self.browser).map_err(ActionError::Interaction)
    }

    fn data_extract(
        &mut self,
        ctx: &mut SiteContext,
        focus_scope: &str,
        steps: &[ExtractStep],
    ) -> ActionResult {
        let snapshots: Vec<Snapshot> = self
            .browser
            .outer_html_all(focus_scope)
            .map_err(ActionError::Interaction)?
            .into_iter()
            .map(Snapshot::new)
            .collect();
        info!("focus scope {focus_scope} matched {} postings", snapshots.len());

        let patterns = ExtractStep::compile_patterns(steps)?;

        for (n, snapshot) in snapshots.iter().enumerate() {
            let listing_url = self
                .browser
                .current_url()
                .map_err(ActionError::Interaction)?;

            match self.extract_record(snapshot, steps, &patterns, &listing_url) {
                Ok(record) => {
                    self.log_key_columns(&record);
                    ctx.batch.push(record);
                }
                Err(ActionError::Site(e)) => return Err(ActionError::Site(e)),
                Err(e) => {
                    warn!("posting {n} dropped: {e}");
                    self.dropped += 1;
                }
            }
        }
        Ok(())
    }

    /// Runs the extract steps for one posting. The browser is always back on
    /// `listing_url` when this returns, whatever the outcome.
    fn extract_record(
        &mut self,
        snapshot: &Snapshot,
        steps: &[ExtractStep],
        patterns: &[Option<Regex>],
        listing_url: &str,
    ) -> ActionResult<Record> {
        let mut state = RecordState::default();
        let outcome = self.run_extract_steps(&mut state, snapshot, steps, patterns);

        if state.on_detail_page {
            if let Err(e) = self.browser.navigate(listing_url) {
                warn!("could not return to listing {listing_url}: {e:#}");
            }
            state.on_detail_page = false;
        }

        outcome.map(|()| state.record)
    }

    fn run_extract_steps(
        &mut self,
        state: &mut RecordState,
        snapshot: &Snapshot,
        steps: &[ExtractStep],
        patterns: &[Option<Regex>],
    ) -> ActionResult {
        for (step, pattern) in steps.iter().zip(patterns) {
            match step {
                ExtractStep::Extract {
                    as_column,
                    xpath,
                    attr_target,
                    data_type,
                } => {
                    let spec = FieldSpec {
                        column: as_column,
                        selector: xpath.as_deref(),
                        attr: attr_target.as_deref(),
                        is_url: ExtractStep::is_url(data_type),
                    };
                    let source = Source::pick(state.on_detail_page, snapshot);
                    extract::extract_field(&mut *self.browser, source, spec, &mut state.record)?;
                }
                ExtractStep::Redirect { using_column } => {
                    if state.on_detail_page {
                        warn!("redirect on {using_column} while already on a detail page");
                    }
                    state.on_detail_page =
                        extract::redirect(&mut *self.browser, &state.record, using_column)?
                            || state.on_detail_page;
                }
                ExtractStep::ReplaceText {
                    using_column,
                    text_find,
                    text_replace,
                } => {
                    extract::replace_text(&mut state.record, using_column, text_find, text_replace)
                }
                ExtractStep::RegexExtract {
                    using_column,
                    as_column,
                    ..
                } => {
                    if let Some(re) = pattern {
                        let target = as_column.as_deref().unwrap_or(using_column);
                        extract::regex_extract(&mut state.record, using_column, target, re);
                    }
                }
                ExtractStep::Next {} => {
                    debug!("next: record closed early");
                    break;
                }
            }
        }
        Ok(())
    }

    fn log_key_columns(&self, record: &Record) {
        for column in &self.cfg.extraction.log_key_columns {
            if let Some(value) = record.text(column) {
                debug!("{column}: {value}");
            }
        }
    }
}
