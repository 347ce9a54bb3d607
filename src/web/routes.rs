use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, Utc};
use tracing::warn;

use super::templates;
use super::AppState;
use crate::model::Cast;
use crate::neynar::TimeWindow;
use crate::story::{self, hostname_of, is_denylisted};
use crate::text::{clean_text, insert_mentions};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/river", get(river_today))
        .route("/river/:date", get(river))
        .route("/search/:term", get(search))
        .route("/healthz", get(health))
}

// ========== HTML Routes ==========

/// Top News: ranked stories over the last 24 hours of trending casts.
async fn home(State(state): State<AppState>) -> Response {
    let casts = fetch_trending(&state, TimeWindow::Day).await;
    let stories = story::rank(state.pipeline.aggregate(&casts).await);
    templates::render_home(&stories).into_response()
}

async fn river_today() -> Redirect {
    Redirect::to(&format!("/river/{}", Utc::now().date_naive()))
}

/// Daily timeline: one row per first-seen URL on the requested date.
async fn river(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
        return Redirect::to("/river").into_response();
    };

    let today = Utc::now().date_naive();
    // The trending feed only reaches back a week; older dates come up empty.
    let window = if date == today {
        TimeWindow::Day
    } else {
        TimeWindow::Week
    };

    let casts = fetch_trending(&state, window).await;
    let entries = river_entries(&casts, date, &state.config.denylist_domains);
    templates::render_river(date, today, &entries).into_response()
}

/// Search: the aggregation and ranking logic reused over a search batch.
async fn search(State(state): State<AppState>, Path(term): Path<String>) -> Response {
    let casts = match state.neynar.search(&term, state.config.search_limit).await {
        Ok(casts) => casts,
        Err(e) => {
            warn!(term, "Cast search failed, rendering empty results: {e:#}");
            Vec::new()
        }
    };
    let stories = story::rank(state.pipeline.aggregate(&casts).await);
    templates::render_search(&term, &stories).into_response()
}

async fn health() -> &'static str {
    "OK"
}

// ========== Helpers ==========

/// Fetch the trending batch, falling back to an empty river on upstream
/// failure. The user never sees a raw upstream error.
async fn fetch_trending(state: &AppState, window: TimeWindow) -> Vec<Cast> {
    match state.neynar.trending(window, state.config.feed_limit).await {
        Ok(casts) => casts,
        Err(e) => {
            warn!("Trending fetch failed, rendering empty river: {e:#}");
            Vec::new()
        }
    }
}

/// One row of the daily timeline.
#[derive(Debug, Clone)]
pub struct RiverEntry {
    pub cast: Cast,
    pub url: String,
    pub hostname: String,
    pub display_text: String,
}

/// Build the timeline rows for one day: casts from that date in
/// chronological order, keeping only the first cast to reference each URL.
fn river_entries(casts: &[Cast], date: NaiveDate, denylist: &[String]) -> Vec<RiverEntry> {
    let mut for_date: Vec<&Cast> = casts
        .iter()
        .filter(|cast| cast.timestamp.date_naive() == date)
        .collect();
    for_date.sort_by_key(|cast| cast.timestamp);

    let mut seen_urls: Vec<&str> = Vec::new();
    let mut entries = Vec::new();

    for cast in for_date {
        for url in &cast.embedded_urls {
            if is_denylisted(url, denylist) || seen_urls.contains(&url.as_str()) {
                continue;
            }
            seen_urls.push(url);

            let display_text = clean_text(&insert_mentions(
                &cast.text,
                &cast.mention_fids,
                &cast.mentions_positions,
                &cast.mentions,
            ));
            entries.push(RiverEntry {
                cast: cast.clone(),
                url: url.clone(),
                hostname: hostname_of(url),
                display_text: if display_text.is_empty() {
                    url.clone()
                } else {
                    display_text
                },
            });
        }
    }

    entries
}
