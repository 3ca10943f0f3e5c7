//! HTTP handlers and the query pipeline.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};

use lexscope_core::types::{DEFAULT_KEYWORDS, DEFAULT_TOP_K};
use lexscope_core::{keywords, prompt};

use crate::llm::LlmError;
use crate::types::{HealthResponse, QueryAnswer, ServerState};

// ---------------------------------------------------------------------------
// Query pipeline
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum QueryError {
    Model(LlmError),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(err) => write!(f, "model: {err}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<LlmError> for QueryError {
    fn from(value: LlmError) -> Self {
        Self::Model(value)
    }
}

/// Answer a user query: retrieve the most relevant chunks, assemble the
/// context prompt, and ask the chat model.
///
/// Retrieval and keyword extraction are CPU work and run on the blocking
/// pool; only the model call awaits I/O. A query that matches no chunk still
/// goes to the model with an empty context section.
pub async fn answer_query(state: &ServerState, query: &str) -> Result<String, QueryError> {
    let index = Arc::clone(&state.index);
    let query_owned = query.to_string();

    let context = tokio::task::spawn_blocking(move || {
        let retrieved = index.retrieve(&query_owned, DEFAULT_TOP_K);
        debug!(chunks = retrieved.len(), "Retrieved context chunks");
        let words = keywords::extract_high_entropy_words(
            &retrieved,
            index.term_doc_freq(),
            DEFAULT_KEYWORDS,
        );
        prompt::build_context_prompt(&retrieved, &words)
    })
    .await
    .unwrap();

    let answer = state.model.complete(&context, query).await?;
    Ok(answer)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn api_query_contract_data(
    State(state): State<Arc<ServerState>>,
    Path(query): Path<String>,
) -> Result<Json<QueryAnswer>, (StatusCode, Json<serde_json::Value>)> {
    info!(query = query.as_str(), "Query received");

    match answer_query(&state, &query).await {
        Ok(answer) => {
            debug!(chars = answer.len(), "Model answered");
            Ok(Json(QueryAnswer { answer }))
        }
        Err(e) => {
            error!(error = %e, "Query pipeline failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "model request failed" })),
            ))
        }
    }
}

pub async fn api_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World" }))
}

pub async fn api_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        chunks: state.index.len(),
        documents: state.index.document_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
