//! Environment-derived runtime configuration.
//!
//! Everything here can be overridden by a CLI flag; precedence is
//! flag > environment > default.

use std::env;
use std::path::PathBuf;

/// Default API port; the query form's default base URL assumes it.
pub const DEFAULT_PORT: u16 = 8000;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-style API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub store_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub model: String,
    pub openai_base_url: String,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// `OPENAI_API_KEY` is optional here — the serve path checks for it and
    /// refuses to start without one, while `ingest` never needs it.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT),
            store_path: env::var("LEXSCOPE_STORE").map(PathBuf::from).unwrap_or_else(|_| {
                lexscope_core::data_dir()
                    .map(|d| d.join("chunks.db"))
                    .unwrap_or_else(|| PathBuf::from("chunks.db"))
            }),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("LEXSCOPE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            openai_base_url: env::var("LEXSCOPE_OPENAI_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
        }
    }
}
