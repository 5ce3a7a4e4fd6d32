use crate::{
    config::Config,
    record::{Field, Record},
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Strips sentences that recur in every non-empty description of the batch.
/// Records with a missing or blank description do not take part. Nothing
/// happens unless at least two descriptions take part.
///
/// Returns the number of distinct sentences removed.
pub fn remove_canned_text(cfg: &Config, batch: &mut [Record]) -> usize {
    let column = cfg.postprocess.description_column.as_str();

    let descriptions: Vec<(usize, Vec<String>)> = batch
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.text(column).map(|d| (i, split_sentences(&d))))
        .filter(|(_, sentences)| !sentences.is_empty())
        .collect();

    if descriptions.len() < 2 {
        debug!(
            "canned text filter skipped: {} non-empty descriptions",
            descriptions.len()
        );
        return 0;
    }

    let recurring = recurring_sentences(descriptions.iter().map(|(_, s)| s.as_slice()));
    if recurring.is_empty() {
        return 0;
    }

    for (i, sentences) in &descriptions {
        let kept: Vec<&str> = sentences
            .iter()
            .map(String::as_str)
            .filter(|s| !recurring.contains(*s))
            .collect();
        batch[*i].set(column, Field::Scalar(kept.join(" ")));
    }

    info!(
        "removed {} recurring sentences from {} descriptions",
        recurring.len(),
        descriptions.len()
    );
    recurring.len()
}

/// Sentences present in every one of `docs`. A frequency pass narrows the
/// candidates, then each is checked for membership per document so a
/// sentence repeated inside a single description cannot qualify.
pub fn recurring_sentences<'a>(
    docs: impl Iterator<Item = &'a [String]> + Clone,
) -> HashSet<String> {
    let total = docs.clone().count();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for doc in docs.clone() {
        for s in doc {
            *counts.entry(s.as_str()).or_insert(0) += 1;
        }
    }

    let members: Vec<HashSet<&str>> = docs
        .map(|doc| doc.iter().map(String::as_str).collect())
        .collect();

    counts
        .into_iter()
        .filter(|&(_, n)| n >= total)
        .filter(|&(s, _)| members.iter().all(|m| m.contains(s)))
        .map(|(s, _)| s.to_string())
        .collect()
}

/// Splits on `.`, `!` or `?` followed by whitespace. Sentences are trimmed
/// and keep their terminal punctuation; empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let boundary = match chars.peek() {
            Some(&(_, next)) => next.is_whitespace(),
            None => false,
        };
        if boundary {
            let end = i + ch.len_utf8();
            push_trimmed(&mut out, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut out, &text[start..]);
    out
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}
