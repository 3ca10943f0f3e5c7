//! Pluggable token counting for chunk budgets.
//!
//! The chunker packs contract sections against a token budget, so the count
//! has to match whatever model ends up reading the prompt. `Tokenizer` keeps
//! that choice open: `BytesEstimateTokenizer` (bytes/3 heuristic, no
//! dependencies) is the default, and `TiktokenTokenizer` (o200k_base BPE, the
//! gpt-4o family encoding) is available behind the `tiktoken` feature.

use std::sync::Arc;

pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
    fn name(&self) -> &str;
}

/// Default: bytes/3 estimation (fast, no dependencies)
pub struct BytesEstimateTokenizer;

impl Tokenizer for BytesEstimateTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.len().div_ceil(3)
    }
    fn name(&self) -> &str {
        "bytes-estimate"
    }
}

/// Accurate BPE counting with the o200k_base encoding (requires `tiktoken` feature)
#[cfg(feature = "tiktoken")]
pub struct TiktokenTokenizer {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "tiktoken")]
impl TiktokenTokenizer {
    pub fn new() -> Self {
        Self { bpe: tiktoken_rs::o200k_base().unwrap() }
    }
}

#[cfg(feature = "tiktoken")]
impl Default for TiktokenTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tiktoken")]
impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
    fn name(&self) -> &str {
        "tiktoken"
    }
}

/// Create a tokenizer by name. Falls back to bytes-estimate for unknown names.
pub fn create_tokenizer(name: &str) -> Arc<dyn Tokenizer> {
    match name {
        #[cfg(feature = "tiktoken")]
        "tiktoken" => Arc::new(TiktokenTokenizer::new()),
        _ => Arc::new(BytesEstimateTokenizer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_estimate_rounds_up() {
        let tok = BytesEstimateTokenizer;
        assert_eq!(tok.count_tokens(""), 0);
        assert_eq!(tok.count_tokens("ab"), 1);
        assert_eq!(tok.count_tokens("abcd"), 2);
    }

    #[test]
    fn unknown_name_falls_back() {
        let tok = create_tokenizer("no-such-backend");
        assert_eq!(tok.name(), "bytes-estimate");
    }
}
