//! Field resolution for DOM-backed postings.
//!
//! A field comes from one of two places. While the interpreter is still on
//! the listing page, locators resolve against the posting's [`Snapshot`].
//! After a `redirect` the posting's detail page is loaded and locators go to
//! the live browser instead, since nothing was captured for that page.

use crate::{
    driver::{Browser, LiveRead},
    error::{ActionError, ActionResult},
    record::{Field, Record},
    snapshot::Snapshot,
};
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

/// Where an `extract` step reads from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Snapshot(&'a Snapshot),
    Live,
}

impl<'a> Source<'a> {
    pub fn pick(on_detail_page: bool, snapshot: &'a Snapshot) -> Self {
        if on_detail_page {
            Source::Live
        } else {
            Source::Snapshot(snapshot)
        }
    }
}

/// One `extract` step, borrowed from the step program.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<'a> {
    pub column: &'a str,
    pub selector: Option<&'a str>,
    pub attr: Option<&'a str>,
    pub is_url: bool,
}

/// Resolves one field and merges it into `record`.
pub fn extract_field(
    browser: &mut dyn Browser,
    source: Source<'_>,
    spec: FieldSpec<'_>,
    record: &mut Record,
) -> ActionResult {
    let read = read_node(browser, source, spec)?;

    let mut value = match (spec.attr, read.attribute) {
        (Some(_), Some(attr_value)) => attr_value,
        _ => read.text,
    };

    if spec.is_url && !value.is_empty() {
        value = absolutize(browser, &value);
    }

    record.push(spec.column, value);
    Ok(())
}

fn read_node(
    browser: &mut dyn Browser,
    source: Source<'_>,
    spec: FieldSpec<'_>,
) -> ActionResult<LiveRead> {
    let found = match (source, spec.selector) {
        (Source::Snapshot(snap), Some(sel)) => snap
            .select_one(sel, spec.attr)
            .map_err(|e| ActionError::Miss(format!("{e:#}")))?,
        (Source::Snapshot(snap), None) => snap.root(spec.attr),
        (Source::Live, sel) => browser
            .read_first(sel.unwrap_or("body"), spec.attr)
            .map_err(ActionError::Interaction)?,
    };

    found.ok_or_else(|| {
        ActionError::Miss(format!(
            "{} matched nothing for column {}",
            spec.selector.unwrap_or("<root>"),
            spec.column
        ))
    })
}

/// Makes `value` absolute against whatever page the browser has loaded now.
/// Values that are already absolute pass through unchanged.
pub fn absolutize(browser: &mut dyn Browser, value: &str) -> String {
    let base = match browser.current_url() {
        Ok(u) => u,
        Err(e) => {
            warn!("cannot read current url, keeping {value:?}: {e:#}");
            return value.to_string();
        }
    };
    resolve_against(&base, value)
}

pub fn resolve_against(base: &str, value: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(value.trim())) {
        Ok(u) => u.to_string(),
        Err(e) => {
            warn!("cannot resolve {value:?} against {base:?}: {e}");
            value.to_string()
        }
    }
}

/// Navigates to the URL stored in `using_column`. Returns whether the browser
/// is now on the detail page. A missing or empty column never navigates.
pub fn redirect(
    browser: &mut dyn Browser,
    record: &Record,
    using_column: &str,
) -> ActionResult<bool> {
    let target = match record.get(using_column) {
        Some(Field::Scalar(s)) => s.trim(),
        Some(Field::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(""),
        None => "",
    };
    if target.is_empty() {
        warn!("redirect skipped: column {using_column} has no url");
        return Ok(false);
    }

    browser.navigate(target).map_err(ActionError::Interaction)?;
    Ok(true)
}

/// Literal substring replacement on one column. Lists are rewritten item by
/// item. An absent column is left alone.
pub fn replace_text(record: &mut Record, column: &str, find: &str, with: &str) {
    if find.is_empty() {
        return;
    }
    let Some(field) = record.get(column) else {
        return;
    };
    let replaced = match field {
        Field::Scalar(s) => Field::Scalar(s.replace(find, with)),
        Field::List(items) => {
            let mut out: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let item = item.replace(find, with);
                if !out.contains(&item) {
                    out.push(item);
                }
            }
            Field::List(out)
        }
    };
    record.set(column, replaced);
}

/// Writes the first capture group of `pattern` applied to `using_column`
/// into `as_column`. Returns whether anything matched.
pub fn regex_extract(
    record: &mut Record,
    using_column: &str,
    as_column: &str,
    pattern: &Regex,
) -> bool {
    let Some(source) = record.text(using_column) else {
        warn!("regex_extract: column {using_column} is not set");
        return false;
    };
    let captured = pattern
        .captures(&source)
        .and_then(|c| c.get(1).or_else(|| c.get(0)))
        .map(|m| m.as_str().trim().to_string());

    match captured {
        Some(value) => {
            debug!("regex_extract {using_column} -> {as_column}: {value}");
            record.push(as_column, value);
            true
        }
        None => {
            warn!("regex_extract: {} did not match column {using_column}", pattern.as_str());
            false
        }
    }
}
