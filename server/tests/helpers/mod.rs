//! Test harness for query pipeline integration tests.
//!
//! Builds a `ServerState` backed by a real SQLite store in a temp dir and a
//! caller-supplied `ChatModel`, so tests exercise the same pipeline the HTTP
//! handler does (no subprocess, no sockets).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

use lexscope_core::retrieval::CorpusIndex;
use lexscope_core::types::ContractChunk;
use lexscope_server::llm::{ChatModel, LlmError};
use lexscope_server::store::ChunkStore;
use lexscope_server::types::ServerState;

pub struct TestHarness {
    pub state: ServerState,
    _temp_dir: TempDir,
}

impl TestHarness {
    /// Harness over the standard lease fixture corpus.
    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self::with_chunks_and_model(fixture_chunks(), model)
    }

    /// Harness over an explicit chunk set (empty sets allowed).
    pub fn with_chunks_and_model(chunks: Vec<ContractChunk>, model: Arc<dyn ChatModel>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut store =
            ChunkStore::open(temp_dir.path().join("chunks.db")).expect("Failed to open store");
        store.replace_chunks(&chunks).expect("Failed to insert fixture chunks");

        // Read back through the store so tests cover the persisted path
        let loaded = store.load_all().expect("Failed to load chunks");
        let state = ServerState {
            index: Arc::new(CorpusIndex::build(loaded)),
            model,
            start_time: Instant::now(),
        };

        TestHarness { state, _temp_dir: temp_dir }
    }
}

fn chunk(filename: &str, idx: usize, content: &str) -> ContractChunk {
    ContractChunk {
        filename: filename.to_string(),
        chunk_index: idx,
        content: content.to_string(),
    }
}

/// A small corpus of two fake tenancy agreements.
pub fn fixture_chunks() -> Vec<ContractChunk> {
    vec![
        chunk("lease_01.txt", 0, "The tenant shall pay rent of 950 monthly in advance."),
        chunk("lease_01.txt", 1, "Subletting is prohibited without the landlord's written consent."),
        chunk("lease_02.txt", 0, "Acme Corp leases the premises at 12 High Street."),
        chunk("lease_02.txt", 1, "Acme Corp is responsible for interior repairs."),
    ]
}

/// A model that answers with its own system prompt, so tests can assert on
/// the context the pipeline assembled.
pub struct EchoContextModel;

#[async_trait]
impl ChatModel for EchoContextModel {
    async fn complete(&self, system: &str, _user: &str) -> Result<String, LlmError> {
        Ok(system.to_string())
    }

    fn name(&self) -> &str {
        "echo-context"
    }
}
