use crate::{
    extract::{self, resolve_against},
    record::Record,
    steps::{ExtractStep, JSON_BODY_SENTINEL},
};
use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Applies a `json_replace_text` rule to the captured payload.
pub fn replace_text(payload: &str, find: &str, with: &str) -> String {
    if find == JSON_BODY_SENTINEL {
        return strip_to_json_body(payload).to_string();
    }
    if find.is_empty() {
        return payload.to_string();
    }
    payload.replace(find, with)
}

/// Drops everything before the first `{` and after the last `}`. Text with
/// no such pair comes back unchanged.
pub fn strip_to_json_body(payload: &str) -> &str {
    match (payload.find('{'), payload.rfind('}')) {
        (Some(start), Some(end)) if start < end => &payload[start..=end],
        _ => payload,
    }
}

/// Walks `path` (segments split on `.` or `>`) through nested objects.
/// Any dead end yields an empty string.
pub fn resolve_key_path(value: &Value, path: &str) -> String {
    let mut current = value;
    for segment in path.split(['.', '>']).map(str::trim).filter(|s| !s.is_empty()) {
        match current.as_object().and_then(|obj| obj.get(segment)) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    scalar_text(current)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Builds one record per element of the array found at `focus_scope`.
/// `base_url` is the page the payload was captured from, used for `url`
/// typed columns.
pub fn extract_records(
    payload: &str,
    focus_scope: &str,
    steps: &[ExtractStep],
    base_url: Option<&str>,
) -> Result<Vec<Record>> {
    let doc: Value = serde_json::from_str(payload.trim()).context("payload is not valid JSON")?;

    let items = match doc.get(focus_scope).and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => {
            warn!("json focus scope {focus_scope:?} is missing or empty");
            return Ok(Vec::new());
        }
    };

    let patterns = ExtractStep::compile_patterns(steps)?;
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let mut record = Record::new();
        for (step, pattern) in steps.iter().zip(&patterns) {
            apply_step(item, step, pattern.as_ref(), base_url, &mut record);
        }
        records.push(record);
    }
    debug!("json focus scope {focus_scope:?} produced {} records", records.len());
    Ok(records)
}

fn apply_step(
    item: &Value,
    step: &ExtractStep,
    pattern: Option<&Regex>,
    base_url: Option<&str>,
    record: &mut Record,
) {
    match step {
        ExtractStep::Extract {
            as_column,
            xpath,
            data_type,
            ..
        } => {
            let path = xpath.as_deref().unwrap_or(as_column);
            let mut value = resolve_key_path(item, path);
            if ExtractStep::is_url(data_type) && !value.is_empty() {
                if let Some(base) = base_url {
                    value = resolve_against(base, &value);
                }
            }
            record.push(as_column, value);
        }
        ExtractStep::ReplaceText {
            using_column,
            text_find,
            text_replace,
        } => extract::replace_text(record, using_column, text_find, text_replace),
        ExtractStep::RegexExtract {
            using_column,
            as_column,
            ..
        } => {
            if let Some(re) = pattern {
                let target = as_column.as_deref().unwrap_or(using_column);
                extract::regex_extract(record, using_column, target, re);
            }
        }
        ExtractStep::Redirect { using_column } => {
            warn!("redirect on {using_column} ignored in json branch");
        }
        ExtractStep::Next {} => {}
    }
}
