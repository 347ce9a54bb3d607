use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Domain substrings that never form a story. Self-referential and
/// aggregator domains would turn the river into a hall of mirrors.
pub const DEFAULT_DENYLIST: &[&str] = &["farquest.app", "far.quest", "warpcast.com", "imgur.com"];

const DEFAULT_NEYNAR_BASE_URL: &str = "https://api.neynar.com/v2/farcaster";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream cast source (Neynar)
    pub neynar_api_key: String,
    pub neynar_base_url: String,
    pub feed_limit: u32,
    pub search_limit: u32,
    pub upstream_timeout: Duration,

    // Story pipeline
    pub denylist_domains: Vec<String>,
    pub metadata_timeout: Duration,
    pub fetch_concurrency: usize,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Upstream cast source
            neynar_api_key: required_env("NEYNAR_API_KEY")?,
            neynar_base_url: env_or_default("NEYNAR_BASE_URL", DEFAULT_NEYNAR_BASE_URL),
            feed_limit: parse_env_u32("FEED_LIMIT", 100)?,
            search_limit: parse_env_u32("SEARCH_LIMIT", 25)?,
            upstream_timeout: Duration::from_secs(parse_env_u64("UPSTREAM_TIMEOUT_SECS", 15)?),

            // Story pipeline
            denylist_domains: parse_denylist(&env_or_default(
                "DENYLIST_DOMAINS",
                &DEFAULT_DENYLIST.join(","),
            )),
            metadata_timeout: Duration::from_secs(parse_env_u64("METADATA_TIMEOUT_SECS", 10)?),
            fetch_concurrency: parse_env_usize("FETCH_CONCURRENCY", 8)?,

            // Web server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neynar_api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "NEYNAR_API_KEY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "FETCH_CONCURRENCY".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.feed_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "FEED_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration for integration tests: dummy key, local base URL,
    /// short timeouts.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            neynar_api_key: "test-key".to_string(),
            neynar_base_url: "http://127.0.0.1:1".to_string(),
            feed_limit: 100,
            search_limit: 25,
            upstream_timeout: Duration::from_secs(5),
            denylist_domains: DEFAULT_DENYLIST.iter().map(ToString::to_string).collect(),
            metadata_timeout: Duration::from_secs(5),
            fetch_concurrency: 4,
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }
}

/// Parse a comma-separated denylist into lowercase domain substrings.
fn parse_denylist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
