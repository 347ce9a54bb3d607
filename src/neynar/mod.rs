//! Neynar API client: the upstream source of casts.
//!
//! Fetches trending casts (for the river and home feed) and free-text
//! search results, and normalizes the loosely-shaped wire records into the
//! strongly-typed [`Cast`] at this boundary. Casts with no URL or no
//! author handle are dropped here; the story pipeline assumes its input
//! batch is already filtered.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::model::{Cast, CastAuthor, Mention};
use crate::text::find_urls;

/// Time window for the trending feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    OneHour,
    SixHours,
    TwelveHours,
    Day,
    Week,
    Month,
}

impl TimeWindow {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

/// Typed client for the Neynar Farcaster API.
///
/// Constructed once at startup and shared by reference; the base URL is
/// configurable so tests can point it at a local mock server.
#[derive(Debug, Clone)]
pub struct NeynarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NeynarClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.neynar_base_url.trim_end_matches('/').to_string(),
            api_key: config.neynar_api_key.clone(),
        })
    }

    /// Fetch trending casts with at least one URL, ready for aggregation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded. Callers recover by falling back to an empty batch.
    pub async fn trending(&self, window: TimeWindow, limit: u32) -> Result<Vec<Cast>> {
        let url = format!("{}/feed/trending", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("time_window", window.as_str()), ("limit", &limit.to_string())])
            .header("accept", "application/json")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Failed to fetch trending feed")?;

        if !response.status().is_success() {
            anyhow::bail!("Trending feed failed with status {}", response.status());
        }

        let body: FeedResponse = response
            .json()
            .await
            .context("Failed to decode trending feed")?;
        Ok(normalize_casts(body.into_casts()))
    }

    /// Search casts matching a free-text term.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<Cast>> {
        let url = format!("{}/cast/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", term), ("limit", &limit.to_string())])
            .header("accept", "application/json")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Failed to search casts")?;

        if !response.status().is_success() {
            anyhow::bail!("Cast search failed with status {}", response.status());
        }

        let body: FeedResponse = response
            .json()
            .await
            .context("Failed to decode search response")?;
        Ok(normalize_casts(body.into_casts()))
    }
}

/// Transform wire casts into domain casts, dropping the unusable ones.
fn normalize_casts(wire: Vec<WireCast>) -> Vec<Cast> {
    let total = wire.len();
    let casts: Vec<Cast> = wire.into_iter().filter_map(WireCast::into_cast).collect();
    debug!(total, with_urls = casts.len(), "Normalized upstream casts");
    casts
}

// ========== Wire types ==========

/// Feed/search response envelope. The API has shipped both a top-level
/// `casts` array and a nested `result.casts`; accept either.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    casts: Vec<WireCast>,
    #[serde(default)]
    result: Option<ResultEnvelope>,
}

#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    #[serde(default)]
    casts: Vec<WireCast>,
}

impl FeedResponse {
    fn into_casts(self) -> Vec<WireCast> {
        if self.casts.is_empty() {
            self.result.map(|r| r.casts).unwrap_or_default()
        } else {
            self.casts
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCast {
    hash: String,
    #[serde(default)]
    text: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    embeds: Vec<WireEmbed>,
    author: WireAuthor,
    #[serde(default)]
    mentioned_profiles: Vec<WireProfile>,
}

#[derive(Debug, Deserialize)]
struct WireEmbed {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAuthor {
    #[serde(default)]
    fid: u64,
    #[serde(default)]
    username: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    pfp_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireProfile {
    fid: u64,
    username: String,
}

impl WireCast {
    /// Convert to a domain cast. Embed URLs are unioned with bare URLs
    /// found in the text, de-duplicated preserving order. Returns `None`
    /// for casts with no URL at all or no author handle.
    fn into_cast(self) -> Option<Cast> {
        let mut urls: Vec<String> = self
            .embeds
            .iter()
            .filter_map(|embed| embed.url.clone())
            .collect();
        for url in find_urls(&self.text) {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }

        if urls.is_empty() || self.author.username.is_empty() {
            return None;
        }

        Some(Cast {
            hash: self.hash,
            text: self.text,
            timestamp: self.timestamp,
            author: CastAuthor {
                fid: self.author.fid,
                fname: self.author.username,
                display_name: self.author.display_name,
                pfp_url: self.author.pfp_url,
            },
            embedded_urls: urls,
            mention_fids: self.mentioned_profiles.iter().map(|p| p.fid).collect(),
            // The feed API does not carry mention offsets; insertion is a
            // no-op until it does.
            mentions_positions: vec![],
            mentions: self
                .mentioned_profiles
                .into_iter()
                .map(|p| Mention {
                    fid: p.fid,
                    fname: p.username,
                })
                .collect(),
            deleted_at: None,
        })
    }
}
