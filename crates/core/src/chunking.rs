//! Section-aware chunking of contract text.
//!
//! Contracts read as a sequence of clauses separated by blank lines, and a
//! chunk that cuts a clause in half retrieves badly. The chunker therefore
//! splits on blank lines first and only then packs consecutive sections into
//! chunks under a token budget, so clause boundaries are never crossed
//! mid-sentence.

use crate::tokenizer::Tokenizer;

/// Split text into sections on blank lines. Sections are trimmed; empty
/// sections are dropped.
pub fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                sections.push(current.trim().to_string());
            }
            current.clear();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        sections.push(current.trim().to_string());
    }

    sections
}

/// Pack sections into chunks while the token count stays under `budget`.
///
/// Sections are taken in document order and never reordered. A section that
/// alone exceeds the budget becomes its own chunk rather than being split,
/// so a long clause stays intact.
pub fn chunk_sections(text: &str, budget: usize, tok: &dyn Tokenizer) -> Vec<String> {
    let sections = split_sections(text);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for section in &sections {
        let candidate = if current.is_empty() {
            section.clone()
        } else {
            format!("{current}\n\n{section}")
        };

        if tok.count_tokens(&candidate) < budget || current.is_empty() {
            current = candidate;
        } else {
            chunks.push(current);
            current = section.clone();
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
