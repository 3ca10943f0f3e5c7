use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use lexscope_core::retrieval::CorpusIndex;

use crate::llm::ChatModel;

// ---------------------------------------------------------------------------
// Server state (built once at startup, immutable afterwards)
// ---------------------------------------------------------------------------

/// Shared server state: the retrieval index over all stored chunks and the
/// chat model that answers queries. Wrapped in an `Arc` by the router; no
/// interior mutability is needed because the corpus is fixed for the life of
/// the process.
pub struct ServerState {
    pub index: Arc<CorpusIndex>,
    pub model: Arc<dyn ChatModel>,
    pub start_time: Instant,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Body of a successful `/query_contract_data/{query}` response.
#[derive(Serialize)]
pub struct QueryAnswer {
    pub answer: String,
}

/// Body of the `/health` response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub chunks: usize,
    pub documents: usize,
    pub uptime_secs: u64,
}
