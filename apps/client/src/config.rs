use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Client configuration loaded from environment variables.
/// Every value has a default, so an empty environment yields a working local setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server origin. Static assets (`/images`, `/resumes`) and `/health` resolve against it.
    pub api_url: String,
    /// Path prefix for the feature endpoints, joined onto `api_url`.
    pub api_prefix: String,
    /// Per-attempt timeout for ordinary calls.
    pub timeout: Duration,
    /// Per-attempt timeout for image generation.
    pub image_timeout: Duration,
    /// Fixed delay before the single retry.
    pub retry_delay: Duration,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: Duration::from_secs(120),
            image_timeout: Duration::from_secs(300),
            retry_delay: Duration::from_millis(1000),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            api_url: lookup("PLATFORM_API_URL").unwrap_or(defaults.api_url),
            api_prefix: lookup("PLATFORM_API_PREFIX").unwrap_or(defaults.api_prefix),
            timeout: parse_secs(&lookup, "PLATFORM_TIMEOUT_SECS")?.unwrap_or(defaults.timeout),
            image_timeout: parse_secs(&lookup, "PLATFORM_IMAGE_TIMEOUT_SECS")?
                .unwrap_or(defaults.image_timeout),
            retry_delay: parse_millis(&lookup, "PLATFORM_RETRY_DELAY_MS")?
                .unwrap_or(defaults.retry_delay),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))
        })
        .transpose()
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("{key} must be a whole number of milliseconds, got '{raw}'"))
        })
        .transpose()
}
