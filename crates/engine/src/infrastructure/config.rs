//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use npcforge_domain::DEFAULT_RESTORE_WINDOW_DAYS;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Trash retention and cleanup configuration
    pub trash: TrashConfig,

    /// CORS allowed origins (comma-separated, or "*" for any); empty disables CORS
    pub cors_allowed_origins: Vec<String>,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer credential; generation fails with a configuration error when unset
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Whether the provider honors JSON-schema response formats
    pub structured_output: bool,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct TrashConfig {
    /// Days a soft-deleted NPC stays restorable
    pub retention_days: i64,
    /// How often expired trash is purged
    pub cleanup_interval: Duration,
}

impl TrashConfig {
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RESTORE_WINDOW_DAYS,
            cleanup_interval: Duration::from_secs(86_400),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: lookup("SERVER_PORT")
                .or_else(|| lookup("PORT"))
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            database_path: var("DATABASE_PATH", "npcforge.db"),

            llm: LlmConfig {
                api_key: lookup("OPENAI_API_KEY")
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
                base_url: var("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: var("OPENAI_MODEL", "gpt-4o-mini"),
                structured_output: var("LLM_STRUCTURED_OUTPUT", "true")
                    .parse()
                    .context("LLM_STRUCTURED_OUTPUT must be true or false")?,
                max_retries: var("LLM_MAX_RETRIES", "3")
                    .parse()
                    .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            },

            trash: TrashConfig {
                retention_days: var("NPC_TRASH_RETENTION_DAYS", "30")
                    .parse()
                    .context("NPC_TRASH_RETENTION_DAYS must be an integer")?,
                cleanup_interval: Duration::from_secs(
                    var("NPC_CLEANUP_INTERVAL_SECS", "86400")
                        .parse::<u64>()
                        .context("NPC_CLEANUP_INTERVAL_SECS must be a number of seconds")?
                        .max(1),
                ),
            },

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}
