//! TF-IDF high-entropy word extraction.
//!
//! The context prompt ends with the most distinctive terms found in the
//! retrieved chunks, which keeps the model focused on the vocabulary of the
//! matched contract rather than boilerplate shared by every lease.

use std::collections::HashMap;

use crate::types::{RetrievedChunk, TermDocFreq};

/// Common English words excluded from term statistics.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "back", "be",
    "because", "been", "but", "by", "can", "could", "day", "did", "do", "even", "first", "for",
    "from", "get", "give", "go", "good", "had", "has", "have", "he", "her", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "know", "like", "look", "make", "me",
    "most", "my", "new", "no", "not", "now", "of", "on", "one", "only", "or", "other", "our",
    "out", "over", "people", "said", "say", "see", "she", "so", "some", "take", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "think", "this", "time", "to",
    "two", "up", "us", "use", "want", "was", "way", "we", "well", "were", "what", "when", "which",
    "who", "will", "with", "work", "would", "year", "you", "your",
];

/// Tokenize text into lowercase terms: punctuation stripped, stopwords,
/// one-/two-character tokens, and pure numbers dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| {
            word.len() > 2
                && !STOPWORDS.contains(&word.as_str())
                && !word.chars().all(|c| c.is_numeric())
        })
        .collect()
}

/// Extract the top-n high-entropy words from the retrieved chunks.
///
/// Scores are normalized term frequency over the combined chunk text times
/// the corpus IDF, so terms frequent here but rare across the corpus rank
/// first. Returns an empty list when no chunks were retrieved.
pub fn extract_high_entropy_words(
    chunks: &[RetrievedChunk],
    doc_freq: &TermDocFreq,
    top_n: usize,
) -> Vec<String> {
    let tokens: Vec<String> =
        chunks.iter().flat_map(|c| tokenize(&c.chunk.content)).collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let total = tokens.len() as f64;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut scored: Vec<(&str, f64)> = counts
        .into_iter()
        .map(|(term, count)| {
            let tf = count as f64 / total;
            (term, tf * doc_freq.idf(term))
        })
        .collect();

    // Descending score, alphabetical tiebreak for deterministic output
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(b.0))
    });
    scored.truncate(top_n);

    scored.into_iter().map(|(term, _)| term.to_string()).collect()
}
