//! Story aggregation.
//!
//! Groups a batch of casts by the URLs they embed, keeps only groups with
//! cross-author corroboration, collapses chronologically-adjacent repeats
//! from one author, and enriches each surviving group with scraped page
//! metadata. Stories are rebuilt from scratch on every call; there is no
//! persisted state.

use futures_util::stream::{self, StreamExt};
use url::Url;

use crate::config::Config;
use crate::metadata::MetadataFetcher;
use crate::model::{Cast, Story};
use crate::text::{clean_text, insert_mentions};

/// The aggregation engine. Holds the metadata fetcher and the denylist;
/// constructed once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct StoryPipeline {
    fetcher: MetadataFetcher,
    denylist: Vec<String>,
    fetch_concurrency: usize,
}

impl StoryPipeline {
    /// Build the pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: MetadataFetcher::new(config.metadata_timeout)?,
            denylist: config.denylist_domains.clone(),
            fetch_concurrency: config.fetch_concurrency.max(1),
        })
    }

    /// Aggregate a batch of casts into stories.
    ///
    /// The batch is assumed to be pre-filtered upstream: no deleted casts,
    /// every cast references at least one URL. Metadata for the surviving
    /// groups is fetched concurrently; a fetch failure for one group leaves
    /// the other groups untouched and only blanks that story's metadata.
    pub async fn aggregate(&self, casts: &[Cast]) -> Vec<Story> {
        let groups = group_by_url(casts, &self.denylist);

        let seeds: Vec<StorySeed<'_>> = groups
            .into_iter()
            .filter_map(|(url, group)| build_seed(url, group))
            .collect();

        let enrichments: Vec<_> = seeds
            .into_iter()
            .map(|seed| async move {
                let metadata = self.fetcher.fetch(&seed.url).await;
                seed.into_story(metadata)
            })
            .collect();

        stream::iter(enrichments)
            .buffered(self.fetch_concurrency)
            .collect()
            .await
    }
}

/// A corroborated group, ready for enrichment.
struct StorySeed<'a> {
    url: String,
    first: &'a Cast,
    rest: Vec<&'a Cast>,
    unique_authors: Vec<String>,
}

impl StorySeed<'_> {
    fn into_story(self, metadata: crate::model::PageMetadata) -> Story {
        let first = self.first;
        let cleaned_text = clean_text(&insert_mentions(
            &first.text,
            &first.mention_fids,
            &first.mentions_positions,
            &first.mentions,
        ));
        let last_timestamp = self
            .rest
            .last()
            .map_or(first.timestamp, |cast| cast.timestamp);

        Story {
            hostname: hostname_of(&self.url),
            url: self.url,
            first_timestamp: first.timestamp,
            last_timestamp,
            first_cast: first.clone(),
            rest_of_casts: self.rest.into_iter().cloned().collect(),
            unique_authors: self.unique_authors,
            metadata,
            cleaned_text,
        }
    }
}

/// Map each URL to the casts that embed it, preserving first-seen URL
/// order. A cast with N URLs lands in N groups; denylisted URLs are
/// skipped here, per URL rather than per cast.
fn group_by_url<'a>(casts: &'a [Cast], denylist: &[String]) -> Vec<(String, Vec<&'a Cast>)> {
    let mut groups: Vec<(String, Vec<&'a Cast>)> = Vec::new();

    for cast in casts {
        for url in &cast.embedded_urls {
            if is_denylisted(url, denylist) {
                continue;
            }
            match groups.iter_mut().find(|(key, _)| key == url) {
                Some((_, group)) => group.push(cast),
                None => groups.push((url.clone(), vec![cast])),
            }
        }
    }

    groups
}

/// Check a URL against the denylist (substring match, case-insensitive).
pub(crate) fn is_denylisted(url: &str, denylist: &[String]) -> bool {
    let lower = url.to_lowercase();
    denylist.iter().any(|domain| lower.contains(domain.as_str()))
}

/// Apply the corroboration filter and the adjacent-duplicate collapse to
/// one URL group. Returns `None` for groups with fewer than two casts or
/// fewer than two distinct authors.
fn build_seed(url: String, group: Vec<&Cast>) -> Option<StorySeed<'_>> {
    if group.len() < 2 {
        return None;
    }

    // Adjacency is judged chronologically so the result is deterministic
    // regardless of the order casts arrived in.
    let mut sorted = group;
    sorted.sort_by_key(|cast| cast.timestamp);

    // Distinct authors are counted before the collapse: everyone who
    // referenced the URL at all corroborates the story.
    let unique_authors = ordered_unique_authors(&sorted);
    if unique_authors.len() < 2 {
        return None;
    }

    let collapsed = collapse_adjacent(&sorted);
    let (first, rest) = collapsed.split_first()?;

    Some(StorySeed {
        url,
        first: *first,
        rest: rest.to_vec(),
        unique_authors,
    })
}

/// Distinct author handles in first-seen order.
fn ordered_unique_authors(casts: &[&Cast]) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    for cast in casts {
        if !authors.iter().any(|a| a == &cast.author.fname) {
            authors.push(cast.author.fname.clone());
        }
    }
    authors
}

/// Keep a cast only if its author differs from the previously retained
/// cast's author. Non-adjacent repeats by the same author survive.
fn collapse_adjacent<'a>(casts: &[&'a Cast]) -> Vec<&'a Cast> {
    let mut retained: Vec<&'a Cast> = Vec::new();
    for cast in casts {
        let duplicate = retained
            .last()
            .is_some_and(|prev| prev.author.fname == cast.author.fname);
        if !duplicate {
            retained.push(cast);
        }
    }
    retained
}

/// Hostname of a URL, or the empty string when it cannot be parsed.
/// A malformed URL must not abort the group.
pub(crate) fn hostname_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .unwrap_or_default()
}
