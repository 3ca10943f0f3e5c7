//! LexScope binary — thin CLI shell over the [`lexscope_server`] library crate.

use axum::{routing::get, Router};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use lexscope_core::retrieval::CorpusIndex;
use lexscope_core::{ingest, load_ingest_config, tokenizer};

use lexscope_server::api::{api_health, api_query_contract_data, api_root};
use lexscope_server::config::Config;
use lexscope_server::llm::{ChatModel, OpenAiChatModel, OpenAiConfig};
use lexscope_server::store::ChunkStore;
use lexscope_server::types::ServerState;

// ---------------------------------------------------------------------------
// CLI definition (clap derive)
// ---------------------------------------------------------------------------

/// Contract insights server — query stored tenancy agreements through a chat model.
#[derive(Parser)]
#[command(name = "lexscope", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the chunk store (default: LEXSCOPE_STORE or the platform data dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Path to the web UI dist directory
    #[arg(long)]
    dist: Option<PathBuf>,

    /// Chat model name (default: LEXSCOPE_MODEL or gpt-4o-mini)
    #[arg(long)]
    model: Option<String>,

    /// Bind to 0.0.0.0 instead of 127.0.0.1 (localhost)
    #[arg(long)]
    bind_all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk contract documents under a directory into the store
    Ingest {
        /// Document root to ingest
        path: PathBuf,

        /// Path to the chunk store (default: LEXSCOPE_STORE or the platform data dir)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Token budget per chunk (overrides .lexscope.toml)
        #[arg(long)]
        chunk_tokens: Option<usize>,

        /// Token counter: bytes-estimate (default) or tiktoken
        #[arg(long, default_value = "bytes-estimate")]
        tokenizer: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Ingest subcommand
// ---------------------------------------------------------------------------

fn run_ingest(
    path: &std::path::Path,
    store_path: &std::path::Path,
    chunk_tokens: Option<usize>,
    tokenizer_name: &str,
) -> i32 {
    let doc_root = match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Document root not found");
            return 1;
        }
    };

    let mut config = load_ingest_config(&doc_root);
    if let Some(budget) = chunk_tokens {
        config.chunk_tokens = budget;
    }

    let tok = tokenizer::create_tokenizer(tokenizer_name);
    info!(tokenizer = tok.name(), chunk_tokens = config.chunk_tokens, "Initialized tokenizer");

    let start = Instant::now();
    let chunks = ingest::ingest_documents(&config, &*tok);
    if chunks.is_empty() {
        warn!(root = %doc_root.display(), "No matching documents found — nothing ingested");
        return 0;
    }

    let mut store = match ChunkStore::open(store_path) {
        Ok(s) => s,
        Err(e) => {
            error!(store = %store_path.display(), error = %e, "Could not open chunk store");
            return 1;
        }
    };

    match store.replace_chunks(&chunks) {
        Ok(inserted) => {
            info!(
                chunks = inserted,
                store = %store_path.display(),
                time_ms = start.elapsed().as_millis() as u64,
                "Ingest complete"
            );
            0
        }
        Err(e) => {
            error!(error = %e, "Could not write chunks to store");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lexscope_server=info".parse().unwrap())
                .add_directive("lexscope_core=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        match command {
            Commands::Ingest { path, store, chunk_tokens, tokenizer } => {
                let store_path = store.clone().unwrap_or_else(|| config.store_path.clone());
                std::process::exit(run_ingest(path, &store_path, *chunk_tokens, tokenizer));
            }
            Commands::Completions { shell } => {
                clap_complete::generate(
                    *shell,
                    &mut Cli::command(),
                    "lexscope",
                    &mut std::io::stdout(),
                );
                return;
            }
        }
    }

    // ---------------------------------------------------------------------------
    // Load the corpus from the chunk store
    // ---------------------------------------------------------------------------

    let store = match ChunkStore::open(&config.store_path) {
        Ok(s) => s,
        Err(e) => {
            error!(store = %config.store_path.display(), error = %e, "Could not open chunk store");
            std::process::exit(1);
        }
    };
    let chunks = match store.load_all() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Could not load chunks from store");
            std::process::exit(1);
        }
    };
    drop(store);

    if chunks.is_empty() {
        warn!(
            store = %config.store_path.display(),
            "Chunk store is empty — run `lexscope ingest <docs-dir>` first"
        );
    }

    let start = Instant::now();
    let index = CorpusIndex::build(chunks);
    info!(
        chunks = index.len(),
        documents = index.document_count(),
        time_ms = start.elapsed().as_millis() as u64,
        "Corpus index ready"
    );

    // ---------------------------------------------------------------------------
    // Chat model
    // ---------------------------------------------------------------------------

    let api_key = config.openai_api_key.clone().unwrap_or_else(|| {
        error!("OPENAI_API_KEY is not set — the server cannot answer queries without it");
        std::process::exit(1);
    });

    let model = OpenAiChatModel::new(OpenAiConfig {
        api_key,
        model: config.model.clone(),
        base_url: config.openai_base_url.clone(),
        ..OpenAiConfig::default()
    });
    info!(model = model.name(), "Initialized chat model");

    let state = Arc::new(ServerState {
        index: Arc::new(index),
        model: Arc::new(model),
        start_time: Instant::now(),
    });

    // Resolve dist dir: --dist flag, then cwd/dist, then ~/.local/share/lexscope/dist
    let dist_dir = if let Some(path) = &cli.dist {
        path.clone()
    } else {
        let cwd = std::env::current_dir().unwrap();
        let home_dist = lexscope_core::data_dir().map(|d| d.join("dist")).unwrap_or_default();
        let candidates = [cwd.join("dist"), home_dist];
        candidates.into_iter().find(|p| p.join("index.html").exists()).unwrap_or_else(|| {
            warn!("No dist/ directory found — the query form UI will not be served");
            cwd.join("dist")
        })
    };
    let index_html = dist_dir.join("index.html");

    // Web UI API routes + static files
    let app = Router::new()
        .route("/", get(api_root))
        .route("/health", get(api_health))
        .route("/query_contract_data/{query}", get(api_query_contract_data))
        .fallback_service(ServeDir::new(&dist_dir).not_found_service(ServeFile::new(&index_html)))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Bind address: 127.0.0.1 by default, --bind-all for 0.0.0.0
    let bind_addr = if cli.bind_all { "0.0.0.0" } else { "127.0.0.1" };
    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{}", config.port))
        .await
        .unwrap_or_else(|e| {
            error!(port = config.port, error = %e, "Could not bind to port");
            eprintln!("  Choose a different port with PORT=<port>.");
            std::process::exit(1);
        });
    let port = listener.local_addr().unwrap().port();

    info!(dist = %dist_dir.display(), "Serving query form UI");
    info!(port = port, "http://localhost:{port}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.unwrap();
}
