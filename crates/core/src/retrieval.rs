//! Term-based chunk retrieval with IDF-weighted ranking.
//!
//! A query is split on whitespace and a chunk is a candidate when ANY term
//! occurs in its content, case-insensitively. Candidates are then ranked so
//! that chunks covering the rare terms of the query beat chunks that only
//! repeat its common ones.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::keywords;
use crate::types::{ContractChunk, RetrievedChunk, TermDocFreq};

/// Immutable retrieval index over all stored chunks. Built once at startup.
pub struct CorpusIndex {
    chunks: Vec<ContractChunk>,
    term_doc_freq: TermDocFreq,
}

impl CorpusIndex {
    /// Build the index from stored chunks, computing per-term document
    /// frequencies as it goes.
    pub fn build(chunks: Vec<ContractChunk>) -> Self {
        let mut term_doc_freq = TermDocFreq::new();
        for chunk in &chunks {
            term_doc_freq.add_document(keywords::tokenize(&chunk.content));
        }
        Self { chunks, term_doc_freq }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of distinct source documents in the corpus.
    pub fn document_count(&self) -> usize {
        let mut names: Vec<&str> = self.chunks.iter().map(|c| c.filename.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    pub fn term_doc_freq(&self) -> &TermDocFreq {
        &self.term_doc_freq
    }

    /// Retrieve the `top_k` most relevant chunks for a query.
    ///
    /// An empty query or an empty corpus returns no chunks. Ties are broken
    /// by chunk order, so results are stable for a given corpus.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        let terms: Vec<String> =
            query.split_whitespace().map(|t| t.to_lowercase()).collect();
        if terms.is_empty() || self.chunks.is_empty() {
            return Vec::new();
        }

        // One case-insensitive pattern per term, matching the any-term OR
        // semantics of the store query this replaces
        let patterns: Vec<Regex> = terms
            .iter()
            .map(|t| {
                RegexBuilder::new(&regex::escape(t))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped literal is always a valid pattern")
            })
            .collect();

        let idf_weights: Vec<f64> =
            terms.iter().map(|t| self.term_doc_freq.idf(t)).collect();

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (i, chunk) in self.chunks.iter().enumerate() {
            let mut match_count = 0usize;
            let mut matched_idfs: Vec<f64> = Vec::new();
            let mut filename_matched = false;
            for (pattern, idf) in patterns.iter().zip(&idf_weights) {
                let hits = pattern.find_iter(&chunk.content).count();
                if hits > 0 {
                    matched_idfs.push(*idf);
                    match_count += hits;
                }
                filename_matched |= pattern.is_match(&chunk.filename);
            }
            if match_count == 0 {
                continue;
            }
            let score = chunk_relevance_score(
                match_count,
                chunk.content.split_whitespace().count(),
                filename_matched,
                terms.len(),
                &matched_idfs,
                &idf_weights,
            );
            scored.push((i, score));
        }

        // Descending score; index order breaks ties deterministically
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        debug!(candidates = scored.len(), query = query, "Retrieved chunks");

        scored
            .into_iter()
            .map(|(i, score)| RetrievedChunk { chunk: self.chunks[i].clone(), score })
            .collect()
    }
}

/// Relevance score for a candidate chunk: saturated term frequency weighted
/// by the average IDF of the terms that matched, a match-density term, a
/// filename bonus, and an IDF-weighted coverage penalty for queries whose
/// rare terms are missing.
fn chunk_relevance_score(
    match_count: usize,
    word_count: usize,
    filename_matched: bool,
    term_count: usize,
    matched_idfs: &[f64],
    idf_weights: &[f64],
) -> f64 {
    let tf = match_count as f64 / (match_count as f64 + 1.5);

    let avg_idf = if matched_idfs.is_empty() {
        1.0
    } else {
        matched_idfs.iter().sum::<f64>() / matched_idfs.len() as f64
    };

    // Density: sqrt-normalized so long chunks aren't punished linearly
    let density = match_count as f64 / (word_count as f64).sqrt().max(1.0);

    let filename_bonus = if filename_matched { 15.0 } else { 0.0 };

    let base = tf * 15.0 * avg_idf + filename_bonus + density;

    // Coverage: missing a rare term costs more than missing a common one.
    // Single-term queries trivially cover everything.
    if term_count <= 1 {
        return base;
    }

    let matched_idf_sum: f64 = matched_idfs.iter().sum();
    let total_idf_sum: f64 = idf_weights.iter().sum();

    let coverage = if total_idf_sum > 0.0 { matched_idf_sum / total_idf_sum } else { 1.0 };
    let coverage_factor = coverage * coverage;

    // Floor of 0.3 keeps partial matches visible but far below full matches
    base * (0.3 + 0.7 * coverage_factor)
}
