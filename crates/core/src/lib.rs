//! LexScope — contract insights for tenancy agreements.
//!
//! This crate is the domain library behind the LexScope server and query
//! form: it turns contract documents into retrievable chunks and turns a
//! user question into the context prompt handed to the chat model.
//!
//! # Modules
//!
//! - [`types`] — Chunk and config types shared across the workspace
//! - [`tokenizer`] — Pluggable token counting for chunk budgets
//! - [`chunking`] — Section-aware chunking of contract text
//! - [`ingest`] — Document discovery and parallel chunking
//! - [`retrieval`] — Term-based chunk retrieval with IDF-weighted ranking
//! - [`keywords`] — TF-IDF high-entropy word extraction
//! - [`prompt`] — Context prompt assembly for the chat model

pub mod chunking;
pub mod ingest;
pub mod keywords;
pub mod prompt;
pub mod retrieval;
pub mod tokenizer;
pub mod types;

use std::path::PathBuf;

use tracing::{debug, warn};

use types::IngestConfig;

// ---------------------------------------------------------------------------
// Cross-platform path helpers
// ---------------------------------------------------------------------------

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware data directory: `~/.local/share/lexscope` on Unix,
/// `%LOCALAPPDATA%/lexscope` on Windows. Holds the chunk store and the web UI dist.
pub fn data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("LOCALAPPDATA")
            .or_else(|_| std::env::var("APPDATA"))
            .ok()
            .map(|a| PathBuf::from(a).join("lexscope"))
    } else {
        home_dir().map(|h| h.join(".local/share/lexscope"))
    }
}

// ---------------------------------------------------------------------------
// .lexscope.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.lexscope.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["extensions", "skip_dirs", "chunk_tokens"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load ingest configuration from `.lexscope.toml` in the given document root.
///
/// Returns an [`IngestConfig`] with defaults merged with any overrides from the
/// config file. If the file doesn't exist or can't be parsed, returns defaults
/// with a warning. Unknown keys trigger a warning with a typo suggestion.
pub fn load_ingest_config(doc_root: &std::path::Path) -> IngestConfig {
    let mut config = IngestConfig::new(doc_root.to_path_buf());
    let config_path = doc_root.join(".lexscope.toml");

    if config_path.exists() {
        debug!("Loading .lexscope.toml");
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(table) = content.parse::<toml::Table>() {
                // Validate keys — warn on unknown
                for key in table.keys() {
                    if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                        let suggestion =
                            KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k)).unwrap();
                        let dist = edit_distance(key, suggestion);
                        if dist <= 3 {
                            warn!(
                                key = key.as_str(),
                                suggestion = *suggestion,
                                "Unknown key in .lexscope.toml — did you mean '{suggestion}'?"
                            );
                        } else {
                            warn!(
                                key = key.as_str(),
                                "Unknown key in .lexscope.toml (known keys: {})",
                                KNOWN_CONFIG_KEYS.join(", ")
                            );
                        }
                    }
                }

                // extensions — replace defaults
                if let Some(exts) = table.get("extensions").and_then(|v| v.as_array()) {
                    config.extensions = exts
                        .iter()
                        .filter_map(|v| v.as_str().map(|s| s.trim_start_matches('.').to_string()))
                        .collect();
                }

                // skip_dirs — merge with defaults
                if let Some(dirs) = table.get("skip_dirs").and_then(|v| v.as_array()) {
                    for d in dirs {
                        if let Some(s) = d.as_str() {
                            config.skip_dirs.insert(s.to_string());
                        }
                    }
                }

                // chunk_tokens
                if let Some(budget) = table.get("chunk_tokens").and_then(|v| v.as_integer()) {
                    if budget > 0 {
                        config.chunk_tokens = budget as usize;
                    } else {
                        warn!("chunk_tokens in .lexscope.toml must be positive, keeping default");
                    }
                }
            } else {
                warn!("Failed to parse .lexscope.toml");
            }
        }
    }

    config
}
