use anyhow::{Context, Result};

use crate::parser::MIN_TEXT_CHARS;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed numbers; everything has a default except the
/// optional database URL.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset → resumes are kept in memory only.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Extracted text shorter than this is rejected before parsing.
    pub min_text_chars: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            min_text_chars: MIN_TEXT_CHARS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            min_text_chars: parse_env("MIN_TEXT_CHARS", MIN_TEXT_CHARS)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
