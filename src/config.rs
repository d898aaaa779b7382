use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::llm::RetryPolicy;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// Value shipped in the sample configuration; never a real key.
const PLACEHOLDER_API_KEY: &str = "tu_api_key_aqui";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub database_path: String,
    pub concurrency_limit: usize,
    pub task_timeout: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|v| v.trim().to_string())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY environment variable not set".to_string()))?;

        if gemini_api_key.is_empty() || gemini_api_key == PLACEHOLDER_API_KEY {
            return Err(Error::Config(
                "GEMINI_API_KEY is empty or still set to the placeholder value".to_string(),
            ));
        }

        let gemini_model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let gemini_api_url = lookup("GEMINI_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let database_path = lookup("DATABASE_PATH")
            .unwrap_or_else(|| "feedbackanalyzer.db".to_string());

        let concurrency_limit = lookup("CONCURRENCY_LIMIT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        let task_timeout = lookup("TASK_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let max_attempts = lookup("MAX_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let retry_backoff = lookup("RETRY_BACKOFF_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(500));

        Ok(Self {
            gemini_api_key,
            gemini_model,
            gemini_api_url,
            database_path,
            concurrency_limit,
            task_timeout,
            request_timeout,
            max_attempts,
            retry_backoff,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    pub task_timeout: Duration,
    pub retry: RetryPolicy,
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 8,
            task_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
            show_progress: true,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            task_timeout: config.task_timeout,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                backoff: config.retry_backoff,
            },
            show_progress: true,
        }
    }
}
