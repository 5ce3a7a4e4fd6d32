use job_scout::keywords::{KeywordSource, TermFrequency};

#[test]
fn ranks_by_frequency_then_position() {
    let text = "Rust services in Rust. We love Kubernetes and rust tooling, kubernetes too.";
    let top = TermFrequency.top_keywords(text, 2);
    assert_eq!(top, vec!["rust", "kubernetes"]);
}

#[test]
fn numbers_and_stopwords_are_skipped() {
    let top = TermFrequency.top_keywords("The 2026 team will work with Postgres.", 5);
    assert_eq!(top, vec!["postgres"]);
}
