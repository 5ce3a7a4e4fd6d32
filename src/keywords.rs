use std::collections::HashMap;

/// Supplies the top-N keywords for a description.
pub trait KeywordSource {
    fn top_keywords(&self, text: &str, n: usize) -> Vec<String>;
}

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "do", "for", "from", "has", "have", "help", "how", "if", "in",
    "including", "into", "is", "it", "its", "job", "more", "must", "new", "not", "of", "on", "or",
    "our", "out", "role", "so", "such", "team", "that", "the", "their", "them", "they", "this",
    "to", "up", "us", "we", "well", "what", "when", "where", "which", "who", "will", "with",
    "within", "work", "you", "your",
];

/// Term-frequency keywords: lowercase word counts, stopwords and short
/// tokens dropped, ties broken by first appearance.
#[derive(Debug, Clone, Default)]
pub struct TermFrequency;

impl KeywordSource for TermFrequency {
    fn top_keywords(&self, text: &str, n: usize) -> Vec<String> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() > 2)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| !STOPWORDS.contains(&w.as_str()));

        for (pos, word) in words.enumerate() {
            counts.entry(word).or_insert((0, pos)).0 += 1;
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
        ranked.into_iter().take(n).map(|(w, _)| w).collect()
    }
}
