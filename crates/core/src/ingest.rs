//! Document discovery and parallel chunking.
//!
//! Walks a contract-document root, reads every file with a configured
//! extension, and chunks it section-aware under the token budget. The walk is
//! gitignore-aware so scratch files next to the contracts stay out of the
//! store.

use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::chunking::chunk_sections;
use crate::tokenizer::Tokenizer;
use crate::types::{ContractChunk, IngestConfig, MAX_FILE_READ};

/// Collect the document files under the config root, sorted by path for
/// deterministic chunk ordering.
fn collect_documents(config: &IngestConfig) -> Vec<PathBuf> {
    let mut walker = WalkBuilder::new(&config.root);
    let skip_dirs = config.skip_dirs.clone();
    walker.filter_entry(move |entry| {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        !(is_dir && skip_dirs.contains(entry.file_name().to_string_lossy().as_ref()))
    });

    let mut paths: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| config.extensions.contains(&e.to_lowercase()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    paths
}

/// Ingest every matching document under the config root into chunks.
///
/// Files are read and chunked in parallel; unreadable or oversized files are
/// logged and skipped. Chunk indices restart at 0 for each document.
pub fn ingest_documents(config: &IngestConfig, tok: &dyn Tokenizer) -> Vec<ContractChunk> {
    let paths = collect_documents(config);
    info!(files = paths.len(), root = %config.root.display(), "Ingesting contract documents");

    let mut per_file: Vec<(String, Vec<String>)> = paths
        .par_iter()
        .filter_map(|path| {
            let filename =
                path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string();

            let metadata = match std::fs::metadata(path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable file");
                    return None;
                }
            };
            if metadata.len() as usize > MAX_FILE_READ {
                warn!(file = %path.display(), size = metadata.len(), "Skipping oversized file");
                return None;
            }

            let text = match std::fs::read_to_string(path) {
                Ok(t) => t,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable file");
                    return None;
                }
            };

            let chunks = chunk_sections(&text, config.chunk_tokens, tok);
            debug!(file = filename.as_str(), chunks = chunks.len(), "Chunked document");
            Some((filename, chunks))
        })
        .collect();

    // Parallel collection order is nondeterministic; restore path order
    per_file.sort_by(|a, b| a.0.cmp(&b.0));

    per_file
        .into_iter()
        .flat_map(|(filename, chunks)| {
            chunks.into_iter().enumerate().map(move |(chunk_index, content)| ContractChunk {
                filename: filename.clone(),
                chunk_index,
                content,
            })
        })
        .collect()
}
