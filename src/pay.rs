use regex::{Captures, Regex};
use std::sync::LazyLock;

const CURRENCY: &str = r"(?:[$€£]\s?|(?:USD|CAD|EUR|GBP|AUD)\s?)";
const NUMBER: &str = r"(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)[kK]?";
const DASH: &str = r"\s*(?:-|–|—|to)\s*";

static RANGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(
            r"(?i)(?P<c1>{CURRENCY})?(?P<lo>{NUMBER}){DASH}(?P<c2>{CURRENCY})?(?P<hi>{NUMBER})"
        )),
        compile(&format!(
            r"(?i)between\s+(?P<c1>{CURRENCY})?(?P<lo>{NUMBER})\s+and\s+(?P<c2>{CURRENCY})?(?P<hi>{NUMBER})"
        )),
    ]
});

// Priority order: annual, hourly, bare amount.
static SINGLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(&format!(
            r"(?i)(?:{CURRENCY})?{NUMBER}\s*(?:/\s*(?:yr|year|annum)\b|per\s+(?:year|annum)|a\s+year|annually)"
        )),
        compile(&format!(
            r"(?i)(?:{CURRENCY})?{NUMBER}\s*(?:/\s*(?:hr|hour)\b|per\s+hour|an\s+hour|hourly)"
        )),
        compile(&format!(r"(?i){CURRENCY}{NUMBER}")),
    ]
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pay pattern is invalid: {e}"))
}

/// Scans free text for pay information.
///
/// If any salary range is present the single best one is returned: highest
/// upper bound first, then the longest match. A range without any currency
/// marker only counts when both numbers look like pay, so spans like
/// "3-5 years" are not mistaken for pay. Without a range, single amounts are
/// returned in pattern priority order with exact duplicates removed.
pub fn scan_pay_range(text: &str) -> Vec<String> {
    let mut best: Option<(f64, usize, String)> = None;

    for re in RANGE_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let has_currency = caps.name("c1").is_some() || caps.name("c2").is_some();
            if !has_currency && !(looks_like_pay(&caps, "lo") && looks_like_pay(&caps, "hi")) {
                continue;
            }
            let Some(upper) = upper_bound(&caps) else {
                continue;
            };
            let matched = caps[0].trim().to_string();
            let len = matched.chars().count();
            let better = match &best {
                None => true,
                Some((b_upper, b_len, _)) => {
                    upper > *b_upper || (upper == *b_upper && len > *b_len)
                }
            };
            if better {
                best = Some((upper, len, matched));
            }
        }
    }

    if let Some((_, _, range)) = best {
        return vec![range];
    }

    let mut out: Vec<String> = Vec::new();
    for re in SINGLE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            let s = m.as_str().trim().to_string();
            if !out.contains(&s) {
                out.push(s);
            }
        }
    }
    out
}

/// The pay value stored on a record: the first scan result or `Unknown`.
pub fn pay_figure(text: &str) -> String {
    scan_pay_range(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| "Unknown".to_string())
}

/// A bare number reads as pay when it is grouped ("120,000"), abbreviated
/// ("120k") or has at least four integer digits.
fn looks_like_pay(caps: &Captures<'_>, group: &str) -> bool {
    let Some(m) = caps.name(group) else {
        return false;
    };
    let raw = m.as_str();
    if raw.contains(',') || raw.ends_with(['k', 'K']) {
        return true;
    }
    let integer = raw.split('.').next().unwrap_or(raw);
    integer.chars().filter(char::is_ascii_digit).count() >= 4
}

fn upper_bound(caps: &Captures<'_>) -> Option<f64> {
    parse_amount(caps.name("hi")?.as_str())
}

/// "109,700" -> 109700, "150k" -> 150000.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let (digits, scale) = match raw.strip_suffix(['k', 'K']) {
        Some(rest) => (rest, 1000.0),
        None => (raw, 1.0),
    };
    let n: f64 = digits.replace(',', "").parse().ok()?;
    Some(n * scale)
}
