//! Integration tests for the query pipeline via answer_query().
//!
//! Each test builds a ServerState from fixture chunks persisted through the
//! real SQLite store, then runs queries against a deterministic model.

mod helpers;

use std::sync::Arc;

use helpers::{EchoContextModel, TestHarness};
use lexscope_core::retrieval::CorpusIndex;
use lexscope_core::types::IngestConfig;
use lexscope_core::{ingest, tokenizer::BytesEstimateTokenizer};
use lexscope_server::api::{answer_query, QueryError};
use lexscope_server::llm::StubChatModel;
use lexscope_server::store::ChunkStore;

// ---------------------------------------------------------------------------
// Answer passthrough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn answer_is_model_output_verbatim() {
    let h = TestHarness::with_model(Arc::new(StubChatModel::new(
        "Acme Corp is a defendant in 3 cases.",
    )));

    let answer = answer_query(&h.state, "Acme Corp").await.unwrap();
    assert_eq!(answer, "Acme Corp is a defendant in 3 cases.");
}

#[tokio::test]
async fn repeated_queries_are_idempotent() {
    let h = TestHarness::with_model(Arc::new(StubChatModel::new(
        "Acme Corp is a defendant in 3 cases.",
    )));

    let first = answer_query(&h.state, "Acme Corp").await.unwrap();
    let second = answer_query(&h.state, "Acme Corp").await.unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Context assembly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn context_prompt_carries_retrieved_chunks() {
    let h = TestHarness::with_model(Arc::new(EchoContextModel));

    let prompt = answer_query(&h.state, "Acme").await.unwrap();
    assert!(prompt.contains("Filename: lease_02.txt"), "missing chunk block: {prompt}");
    assert!(prompt.contains("Acme Corp leases the premises"), "missing chunk text: {prompt}");
    assert!(prompt.contains("High Entropy Words:"), "missing keyword line: {prompt}");
    // Chunks from the unrelated lease stay out
    assert!(!prompt.contains("Subletting"), "irrelevant chunk leaked: {prompt}");
}

#[tokio::test]
async fn unmatched_query_gets_empty_context_section() {
    let h = TestHarness::with_model(Arc::new(EchoContextModel));

    let prompt = answer_query(&h.state, "zzzqqq").await.unwrap();
    assert!(prompt.contains("No contract context matched"), "unexpected context: {prompt}");
}

#[tokio::test]
async fn empty_corpus_is_answerable() {
    let h = TestHarness::with_chunks_and_model(Vec::new(), Arc::new(EchoContextModel));

    let prompt = answer_query(&h.state, "anything").await.unwrap();
    assert!(prompt.contains("No contract context matched"));
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn model_failure_propagates_as_query_error() {
    let h = TestHarness::with_model(Arc::new(StubChatModel::failing()));

    let err = answer_query(&h.state, "Acme Corp").await.unwrap_err();
    assert!(matches!(err, QueryError::Model(_)));
}

// ---------------------------------------------------------------------------
// Ingest-to-query roundtrip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_to_query_roundtrip() {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(
        docs.path().join("tenancy_agreement_fake_01.txt"),
        "1. PARTIES\nThe landlord lets the premises to Acme Corp.\n\n\
         2. RENT\nThe monthly rent is 950.\n",
    )
    .unwrap();

    let mut config = IngestConfig::new(docs.path().to_path_buf());
    config.chunk_tokens = 15;
    let tok = BytesEstimateTokenizer;
    let chunks = ingest::ingest_documents(&config, &tok);
    assert!(chunks.len() >= 2, "expected multiple chunks, got {}", chunks.len());

    let store_dir = tempfile::tempdir().unwrap();
    let mut store = ChunkStore::open(store_dir.path().join("chunks.db")).unwrap();
    store.replace_chunks(&chunks).unwrap();

    let index = CorpusIndex::build(store.load_all().unwrap());
    let retrieved = index.retrieve("Acme rent", 5);
    assert!(!retrieved.is_empty());
    assert!(retrieved.iter().all(|r| r.chunk.filename == "tenancy_agreement_fake_01.txt"));
}
