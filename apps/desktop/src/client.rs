//! Network wrapper around the insights server.
//!
//! Exactly two user-visible outcomes exist: the answer text from the server,
//! or the fixed [`ERROR_FETCHING_DATA`] literal. Transport failures, non-2xx
//! statuses, and unparseable bodies all collapse into the latter; the detail
//! only reaches the diagnostic log.

use serde::Deserialize;

/// Default server address, matching the server's default port.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// The one error string users ever see.
pub const ERROR_FETCHING_DATA: &str = "Error fetching data";

/// Server base URL: `LEXSCOPE_API_URL` when set, the default otherwise.
pub fn api_base_url() -> String {
    std::env::var("LEXSCOPE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

#[derive(Deserialize)]
struct QueryAnswer {
    answer: String,
}

#[derive(Debug)]
enum FetchError {
    BadBaseUrl(String),
    Request(reqwest::Error),
    Status(u16),
    Parse(reqwest::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadBaseUrl(detail) => write!(f, "bad base url: {detail}"),
            Self::Request(err) => write!(f, "request: {err}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Parse(err) => write!(f, "parse: {err}"),
        }
    }
}

async fn request_summary(base_url: &str, entity: &str) -> Result<String, FetchError> {
    let mut url =
        reqwest::Url::parse(base_url).map_err(|e| FetchError::BadBaseUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::BadBaseUrl("cannot be a base".to_string()))?
        .pop_if_empty()
        .push("query_contract_data")
        .push(entity);

    let response = reqwest::get(url).await.map_err(FetchError::Request)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let data: QueryAnswer = response.json().await.map_err(FetchError::Parse)?;
    Ok(data.answer)
}

/// Fetch the entity summary for the given input, verbatim on success.
///
/// The input is sent as typed — empty included — as a percent-encoded path
/// segment. Every failure maps to the fixed error literal.
pub async fn fetch_entity_summary(base_url: &str, entity: &str) -> String {
    match request_summary(base_url, entity).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!(error = %e, "There was a problem fetching the entity summary");
            ERROR_FETCHING_DATA.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::get, Json, Router};

    /// Serve a router on an ephemeral local port, returning its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn success_returns_answer_verbatim() {
        let router = Router::new().route(
            "/query_contract_data/{query}",
            get(|| async {
                Json(serde_json::json!({ "answer": "Acme Corp is a defendant in 3 cases." }))
            }),
        );
        let base = spawn_stub(router).await;

        let summary = fetch_entity_summary(&base, "Acme Corp").await;
        assert_eq!(summary, "Acme Corp is a defendant in 3 cases.");
    }

    #[tokio::test]
    async fn input_roundtrips_percent_encoded() {
        // Echo the decoded path segment back as the answer
        let router = Router::new().route(
            "/query_contract_data/{query}",
            get(|Path(query): Path<String>| async move {
                Json(serde_json::json!({ "answer": query }))
            }),
        );
        let base = spawn_stub(router).await;

        let summary = fetch_entity_summary(&base, "Acme Corp & Sons / EU").await;
        assert_eq!(summary, "Acme Corp & Sons / EU");
    }

    #[tokio::test]
    async fn empty_input_is_sent_and_maps_to_the_error_literal() {
        // An empty value goes out as-is; the resulting empty path segment
        // matches no route, so the fixed error literal comes back.
        let router = Router::new().route(
            "/query_contract_data/{query}",
            get(|Path(query): Path<String>| async move {
                Json(serde_json::json!({ "answer": format!("got:{query}") }))
            }),
        );
        let base = spawn_stub(router).await;

        let summary = fetch_entity_summary(&base, "").await;
        assert_eq!(summary, ERROR_FETCHING_DATA);
    }

    #[tokio::test]
    async fn server_error_maps_to_fixed_literal() {
        let router = Router::new().route(
            "/query_contract_data/{query}",
            get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_stub(router).await;

        let summary = fetch_entity_summary(&base, "Acme Corp").await;
        assert_eq!(summary, ERROR_FETCHING_DATA);
    }

    #[tokio::test]
    async fn non_json_body_maps_to_fixed_literal() {
        let router = Router::new()
            .route("/query_contract_data/{query}", get(|| async { "plain text, not json" }));
        let base = spawn_stub(router).await;

        let summary = fetch_entity_summary(&base, "Acme Corp").await;
        assert_eq!(summary, ERROR_FETCHING_DATA);
    }

    #[tokio::test]
    async fn connection_refused_maps_to_fixed_literal() {
        // Bind then immediately drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let summary = fetch_entity_summary(&format!("http://{addr}"), "Acme Corp").await;
        assert_eq!(summary, ERROR_FETCHING_DATA);
    }

    #[tokio::test]
    async fn deterministic_server_yields_idempotent_summaries() {
        let router = Router::new().route(
            "/query_contract_data/{query}",
            get(|| async { Json(serde_json::json!({ "answer": "same every time" })) }),
        );
        let base = spawn_stub(router).await;

        let first = fetch_entity_summary(&base, "Acme Corp").await;
        let second = fetch_entity_summary(&base, "Acme Corp").await;
        assert_eq!(first, second);
        assert_eq!(first, "same every time");
    }
}
