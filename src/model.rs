//! Domain types shared across the pipeline.
//!
//! A [`Cast`] is the atomic input unit (one Farcaster post). A [`Story`]
//! is the derived aggregate: the cluster of casts that referenced the same
//! URL, after corroboration filtering and duplicate collapsing. Stories
//! are request-scoped and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastAuthor {
    pub fid: u64,
    /// Handle ("fname"), used for display and author deduplication.
    pub fname: String,
    pub display_name: String,
    pub pfp_url: Option<String>,
}

/// A profile referenced by a cast, resolvable by fid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub fid: u64,
    pub fname: String,
}

/// A single Farcaster post. Immutable input; the pipeline never mutates
/// casts, it only groups and clones them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    /// Opaque content identifier, also used for deep links.
    pub hash: String,
    /// Raw body text; may embed raw URLs and bare mention markers.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub author: CastAuthor,
    /// Ordered URLs referenced by this cast (embeds plus URLs found in text).
    pub embedded_urls: Vec<String>,
    /// Referenced-author fids, aligned by index with `mentions_positions`.
    pub mention_fids: Vec<u64>,
    /// Byte offsets into `text` where each mention is re-inserted.
    pub mentions_positions: Vec<usize>,
    /// Lookup table for resolving `mention_fids` to handles.
    pub mentions: Vec<Mention>,
    /// Tombstone marker. Deleted casts are excluded by the upstream source;
    /// the pipeline performs no deletion filtering of its own.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Best-effort page metadata scraped from a story's URL.
///
/// Every field is optional: any fetch or parse failure yields the
/// all-`None` value rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl PageMetadata {
    /// Check if any metadata was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image.is_none()
    }
}

/// A multi-author-corroborated cluster of casts sharing one URL.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub url: String,
    /// Hostname parsed from `url`; empty string when the URL is unparsable.
    pub hostname: String,
    /// Earliest surviving cast referencing this URL.
    pub first_cast: Cast,
    /// Remaining surviving casts, chronological.
    pub rest_of_casts: Vec<Cast>,
    /// Distinct author handles across the whole group, in first-seen order,
    /// counted before the adjacent-duplicate collapse.
    pub unique_authors: Vec<String>,
    pub first_timestamp: DateTime<Utc>,
    /// Timestamp of the temporally-last surviving cast; equals
    /// `first_timestamp` when nothing survives after the first.
    pub last_timestamp: DateTime<Utc>,
    pub metadata: PageMetadata,
    /// `first_cast.text` with mentions resolved and URLs stripped out.
    pub cleaned_text: String,
}

/// Shorten a cast hash for use in a Warpcast deep link.
///
/// `0x`-prefixed hashes keep their first 10 characters; anything else gets
/// a `0x` prefix on its first 6.
#[must_use]
pub fn short_hash(hash: &str) -> String {
    if hash.starts_with("0x") {
        hash.chars().take(10).collect()
    } else {
        format!("0x{}", hash.chars().take(6).collect::<String>())
    }
}
