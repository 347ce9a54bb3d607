//! Maud templates for the river views.

use chrono::{DateTime, NaiveDate, Utc};
use maud::{html, Markup, DOCTYPE};

use super::RiverEntry;
use crate::model::{short_hash, Story};

const SITE_NAME: &str = "Cast River";

/// Base HTML layout shared by every page.
fn base_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme="auto" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content="light dark";
                title { (title) " - " (SITE_NAME) }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
            }
            body {
                header class="container" {
                    nav {
                        ul {
                            li { a href="/" { strong { (SITE_NAME) } } }
                        }
                        ul {
                            li { a href="/" { "Top News" } }
                            li { a href="/river" { "River" } }
                            li { (searchbar()) }
                        }
                    }
                }
                main class="container" { (content) }
                footer class="container" {
                    small { (SITE_NAME) " | casts aggregated from Farcaster" }
                }
            }
        }
    }
}

/// Search box; submits to `/search/:term`.
fn searchbar() -> Markup {
    html! {
        form onsubmit="window.location='/search/'+encodeURIComponent(this.q.value);return false;" {
            input type="search" name="q" placeholder="Search casts" aria-label="Search casts";
        }
    }
}

/// Render the Top News page.
#[must_use]
pub fn render_home(stories: &[Story]) -> Markup {
    base_layout(
        "Top News",
        html! {
            h2 { "Top News" }
            @if stories.is_empty() {
                p { "No stories right now. Check back soon." }
            }
            @for story in stories {
                (story_card(story))
            }
        },
    )
}

/// Render the daily timeline page with prev/next day navigation.
#[must_use]
pub fn render_river(date: NaiveDate, today: NaiveDate, entries: &[RiverEntry]) -> Markup {
    let heading = date.format("%A, %B %e").to_string();
    let prev = date.pred_opt();
    let next = date.succ_opt().filter(|_| date < today);

    base_layout(
        &heading,
        html! {
            nav {
                h2 { (heading) }
                ul {
                    @if let Some(prev) = prev {
                        li { a role="button" href=(format!("/river/{prev}")) { "\u{2190}" } }
                    }
                    @if let Some(next) = next {
                        li { a role="button" href=(format!("/river/{next}")) { "\u{2192}" } }
                    }
                }
            }
            @for entry in entries {
                (river_row(entry))
            }
            @if entries.is_empty() {
                p { "No casts with links found for this date. Try a more recent date." }
            }
        },
    )
}

/// Render the search results page.
#[must_use]
pub fn render_search(term: &str, stories: &[Story]) -> Markup {
    base_layout(
        "Search",
        html! {
            h2 { "Results for \u{201c}" (term) "\u{201d}" }
            @if stories.is_empty() {
                p { "No corroborated stories match this search." }
            }
            @for story in stories {
                (story_card(story))
            }
        },
    )
}

/// One story card on the Top News and search pages.
fn story_card(story: &Story) -> Markup {
    let author = &story.first_cast.author;
    let headline = if story.cleaned_text.is_empty() {
        story
            .metadata
            .title
            .clone()
            .unwrap_or_else(|| story.url.clone())
    } else {
        story.cleaned_text.clone()
    };
    let more: Vec<_> = story
        .rest_of_casts
        .iter()
        .filter(|cast| cast.author.fname != author.fname)
        .collect();

    html! {
        article {
            span {
                a href=(profile_url(&author.fname)) target="_blank" { "@" (author.fname) }
                " / "
                a href=(format!("https://{}", story.hostname)) target="_blank" { (story.hostname) }
                " "
                a href=(cast_url(&author.fname, &story.first_cast.hash)) target="_blank" { "View cast" }
            }
            a href=(story.url) target="_blank" { h3 { (headline) } }
            @if let Some(description) = &story.metadata.description {
                p { (description) }
            }
            @if let Some(image) = &story.metadata.image {
                img src=(image) alt="" width="100" height="80";
            }
            @if !more.is_empty() {
                p {
                    b { "More: " }
                    @for (i, cast) in more.iter().enumerate() {
                        @if i > 0 { ", " }
                        a href=(cast_url(&cast.author.fname, &cast.hash)) target="_blank" {
                            "@" (cast.author.fname)
                        }
                    }
                }
            }
            small { "Last casted " (relative_time(story.last_timestamp)) }
        }
    }
}

/// One row of the daily timeline.
fn river_row(entry: &RiverEntry) -> Markup {
    let author = &entry.cast.author;
    html! {
        article {
            small { (entry.cast.timestamp.format("%l:%M %p")) }
            " "
            a href=(profile_url(&author.fname)) target="_blank" { "@" (author.fname) }
            " / "
            (entry.hostname)
            ": "
            a href=(entry.url) target="_blank" { (entry.display_text) }
            " "
            a href=(cast_url(&author.fname, &entry.cast.hash)) target="_blank" { "View cast" }
        }
    }
}

/// Deep link to an author's Warpcast profile.
fn profile_url(fname: &str) -> String {
    format!("https://warpcast.com/{fname}")
}

/// Deep link to a specific cast, using the shortened content hash.
fn cast_url(fname: &str, hash: &str) -> String {
    format!("https://warpcast.com/{fname}/{}", short_hash(hash))
}

/// Coarse "x minutes ago" formatting for story cards.
fn relative_time(timestamp: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(timestamp);
    let minutes = delta.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(delta.num_days(), "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::model::{Cast, CastAuthor, PageMetadata};

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1)), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5)), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(3)), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(2)), "2 days ago");
    }

    #[test]
    fn test_cast_url_shortens_hash() {
        assert_eq!(
            cast_url("alice", "0x123abc456def"),
            "https://warpcast.com/alice/0x123abc45"
        );
    }

    #[test]
    fn test_story_card_renders_authors_and_headline() {
        let timestamp = Utc::now();
        let first_cast = Cast {
            hash: "0x123abc456def".to_string(),
            text: String::new(),
            timestamp,
            author: CastAuthor {
                fid: 1,
                fname: "alice".to_string(),
                display_name: "Alice".to_string(),
                pfp_url: None,
            },
            embedded_urls: vec!["https://techcrunch.com/big-news".to_string()],
            mention_fids: vec![],
            mentions_positions: vec![],
            mentions: vec![],
            deleted_at: None,
        };
        let story = Story {
            url: "https://techcrunch.com/big-news".to_string(),
            hostname: "techcrunch.com".to_string(),
            first_cast,
            rest_of_casts: vec![],
            unique_authors: vec!["alice".to_string(), "bob".to_string()],
            first_timestamp: timestamp,
            last_timestamp: timestamp,
            metadata: PageMetadata {
                title: Some("Big News".to_string()),
                description: Some("Something happened".to_string()),
                image: None,
            },
            cleaned_text: String::new(),
        };

        let rendered = story_card(&story).into_string();
        assert!(rendered.contains("@alice"));
        assert!(rendered.contains("techcrunch.com"));
        // Empty cleaned text falls back to the metadata title.
        assert!(rendered.contains("Big News"));
        assert!(rendered.contains("Something happened"));
    }
}
