use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum file size (in bytes) that ingest will read into memory.
pub const MAX_FILE_READ: usize = 512 * 1024;

/// Default per-chunk token budget for section-aware chunking.
pub const DEFAULT_CHUNK_TOKENS: usize = 50;

/// Default number of chunks handed to the chat model per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Default number of high-entropy words appended to the context prompt.
pub const DEFAULT_KEYWORDS: usize = 5;

// ---------------------------------------------------------------------------
// Ingest configuration — replaces hardcoded constants
// ---------------------------------------------------------------------------

/// Runtime configuration for document ingestion. Loaded from `.lexscope.toml`
/// in the document root, or defaults.
#[derive(Clone)]
pub struct IngestConfig {
    pub root: PathBuf,
    /// File extensions to ingest (without the leading dot).
    pub extensions: HashSet<String>,
    /// Directory names to skip during walk.
    pub skip_dirs: HashSet<String>,
    /// Token budget per chunk.
    pub chunk_tokens: usize,
}

impl IngestConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: ["txt", "md"].iter().map(|s| s.to_string()).collect(),
            skip_dirs: [".git", "node_modules", "target", "dist", "build"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// One stored chunk of a contract document. Mirrors a row in the chunk store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractChunk {
    /// Basename of the source document.
    pub filename: String,
    /// Position of this chunk within its document, starting at 0.
    pub chunk_index: usize,
    pub content: String,
}

/// A chunk selected for a query, with its relevance score.
#[derive(Clone, Debug, Serialize)]
pub struct RetrievedChunk {
    pub chunk: ContractChunk,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Term document frequencies (built once per corpus)
// ---------------------------------------------------------------------------

/// Per-term document frequency index for IDF-weighted scoring. A "document"
/// here is a single contract chunk.
pub struct TermDocFreq {
    pub total_docs: usize,
    pub freq: HashMap<String, usize>,
}

impl TermDocFreq {
    pub fn new() -> Self {
        Self { total_docs: 0, freq: HashMap::new() }
    }

    /// Record one chunk's tokens. Each unique term counts once per chunk.
    pub fn add_document<I: IntoIterator<Item = String>>(&mut self, tokens: I) {
        let unique: HashSet<String> = tokens.into_iter().collect();
        for term in unique {
            *self.freq.entry(term).or_insert(0) += 1;
        }
        self.total_docs += 1;
    }

    /// IDF with Laplace smoothing: ln((N+1)/(df+1)) + 1.
    /// Unknown terms default to df=total_docs (IDF ~1.0).
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.freq.get(term).copied().unwrap_or(self.total_docs);
        (((self.total_docs as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0).max(1.0)
    }
}

impl Default for TermDocFreq {
    fn default() -> Self {
        Self::new()
    }
}
