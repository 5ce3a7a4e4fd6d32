mod common;

use common::{detail_html, listing_html, test_config, FakeBrowser, LISTING_URL};
use job_scout::{
    driver::Locator,
    interpreter::Interpreter,
    record::Field,
    steps::{Site, Step, StepProgram},
};

fn site(raw_steps: &str) -> Site {
    let raw = format!(r#"{{"fake": {raw_steps}}}"#);
    let program = StepProgram::parse(&raw).expect("parse step program");
    program.sites.into_iter().next().unwrap()
}

fn listing_browser() -> FakeBrowser {
    FakeBrowser::new().page(LISTING_URL, &listing_html())
}

fn with_details(browser: FakeBrowser) -> FakeBrowser {
    browser
        .page(
            "https://jobs.example.com/jobs/101",
            &detail_html("Build services in Rust."),
        )
        .page(
            "https://jobs.example.com/jobs/102",
            &detail_html("Lead a team of five."),
        )
        .page(
            "https://jobs.example.com/jobs/103",
            &detail_html("Learn from seniors."),
        )
}

const LISTING_FIELDS: &str = r#"
    {"action": "extract", "as_column": "JobTitle", "xpath": "h3.title"},
    {"action": "extract", "as_column": "JobUrl", "xpath": "a.link", "attr_target": "href", "data_type": "url"},
    {"action": "regex_extract", "using_column": "JobUrl", "as_column": "JobID", "regex": "/jobs/(\\d+)"}
"#;

#[test]
fn one_record_per_focus_element() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [{LISTING_FIELDS}]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_none());
    assert_eq!(run.records_dropped, 0);
    let titles: Vec<String> = run
        .batch
        .iter()
        .map(|r| r.text("JobTitle").unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Senior Rust Engineer", "Engineering Manager", "Junior Developer"]
    );
    assert_eq!(
        run.batch[0].text("JobUrl").as_deref(),
        Some("https://jobs.example.com/jobs/101")
    );
    assert_eq!(run.batch[2].text("JobID").as_deref(), Some("103"));
    let columns: Vec<&str> = run.batch[0].columns().collect();
    assert_eq!(columns, vec!["JobTitle", "JobUrl", "JobID"]);
}

#[test]
fn redirect_reads_detail_page_and_returns_to_listing() {
    let cfg = test_config();
    let mut browser = with_details(listing_browser());
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {LISTING_FIELDS},
            {{"action": "redirect", "using_column": "JobUrl"}},
            {{"action": "extract", "as_column": "JobDesc", "xpath": "div.desc"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert_eq!(run.batch.len(), 3);
    assert_eq!(
        run.batch[1].text("JobDesc").as_deref(),
        Some("Lead a team of five.")
    );
    assert_eq!(
        browser.navigations,
        vec![
            LISTING_URL,
            "https://jobs.example.com/jobs/101",
            LISTING_URL,
            "https://jobs.example.com/jobs/102",
            LISTING_URL,
            "https://jobs.example.com/jobs/103",
            LISTING_URL,
        ]
    );
    assert_eq!(browser.current, LISTING_URL);
}

#[test]
fn redirect_without_url_does_not_navigate() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {{"action": "extract", "as_column": "JobTitle", "xpath": "h3.title"}},
            {{"action": "redirect", "using_column": "JobUrl"}},
            {{"action": "extract", "as_column": "Tag", "xpath": "span.tag"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert_eq!(browser.navigations, vec![LISTING_URL]);
    assert_eq!(run.batch.len(), 3);
    assert_eq!(run.batch[1].text("Tag").as_deref(), Some("lead"));
}

#[test]
fn failed_detail_page_drops_only_that_posting() {
    let cfg = test_config();
    let mut browser = with_details(listing_browser());
    browser.pages.remove("https://jobs.example.com/jobs/102");
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {LISTING_FIELDS},
            {{"action": "redirect", "using_column": "JobUrl"}},
            {{"action": "extract", "as_column": "JobDesc", "xpath": "div.desc"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_none());
    assert_eq!(run.records_dropped, 1);
    let ids: Vec<String> = run.batch.iter().map(|r| r.text("JobID").unwrap()).collect();
    assert_eq!(ids, vec!["101", "103"]);
    assert_eq!(browser.current, LISTING_URL);
}

#[test]
fn unmatched_locator_drops_every_posting() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {{"action": "extract", "as_column": "Salary", "xpath": "span.salary"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_none());
    assert!(run.batch.is_empty());
    assert_eq!(run.records_dropped, 3);
}

#[test]
fn next_closes_the_record_early() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {{"action": "extract", "as_column": "JobTitle", "xpath": "h3.title"}},
            {{"action": "next"}},
            {{"action": "extract", "as_column": "JobUrl", "xpath": "a.link", "attr_target": "href"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert_eq!(run.batch.len(), 3);
    assert!(run.batch.iter().all(|r| !r.contains("JobUrl")));
}

#[test]
fn repeated_column_collects_distinct_values() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {{"action": "extract", "as_column": "Info", "xpath": "span.tag"}},
            {{"action": "extract", "as_column": "Info", "xpath": "h3.title"}},
            {{"action": "extract", "as_column": "Info", "xpath": "span.tag"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert_eq!(
        run.batch[0].get("Info"),
        Some(&Field::List(vec![
            "rust".to_string(),
            "Senior Rust Engineer".to_string()
        ]))
    );
}

#[test]
fn interaction_failures_do_not_stop_the_site() {
    let cfg = test_config();
    let mut browser = listing_browser();
    browser.fail_clicks = true;
    let site = site(&format!(
        r#"[
        {{"action": "load_url", "url": "{LISTING_URL}"}},
        {{"action": "type_text", "selector": "input#q", "text": "rust"}},
        {{"action": "click_button", "selector": "button.go"}},
        {{"action": "select_checkbox", "selector": "input#remote"}},
        {{"action": "sleep"}},
        {{"action": "scroll_to", "xpath": "//footer"}},
        {{"action": "data_extract", "focus_scope": "li.card", "extract_steps": [
            {{"action": "extract", "as_column": "JobTitle", "xpath": "h3.title"}}
        ]}}
    ]"#
    ));

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_none());
    assert_eq!(run.batch.len(), 3);
    assert_eq!(browser.typed, vec![("input#q".to_string(), "rust".to_string())]);
    assert_eq!(browser.scrolled, vec![Locator::XPath("//footer".into())]);
    assert!(browser.clicks.is_empty());
}

#[test]
fn unreachable_page_is_not_fatal() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = site(
        r#"[
        {"action": "load_url", "url": "https://down.example.com/"},
        {"action": "data_extract", "focus_scope": "li.card", "extract_steps": []}
    ]"#,
    );

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_none());
    assert!(run.batch.is_empty());
}

#[test]
fn click_without_locator_aborts_the_site() {
    let cfg = test_config();
    let mut browser = listing_browser();
    let site = Site {
        name: "broken".into(),
        steps: vec![
            Step::LoadUrl {
                url: LISTING_URL.into(),
            },
            Step::ClickButton {
                selector: None,
                xpath: None,
            },
            Step::LoadUrl {
                url: "https://jobs.example.com/never".into(),
            },
        ],
    };

    let run = Interpreter::new(&cfg, &mut browser).run_site(&site);

    assert!(run.failure.is_some());
    assert_eq!(browser.navigations, vec![LISTING_URL]);
}
