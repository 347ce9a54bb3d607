use crate::model::Story;

/// Order stories for the river: most corroborated first, ties broken by
/// most recent activity. The sort is stable, so stories equal on both
/// keys keep their relative order.
#[must_use]
pub fn rank(mut stories: Vec<Story>) -> Vec<Story> {
    stories.sort_by(|a, b| {
        b.unique_authors
            .len()
            .cmp(&a.unique_authors.len())
            .then_with(|| b.last_timestamp.cmp(&a.last_timestamp))
    });
    stories
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::model::{Cast, CastAuthor, PageMetadata};

    fn story(url: &str, authors: &[&str], last_minute: i64) -> Story {
        let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let first_cast = Cast {
            hash: "0xabc".to_string(),
            text: String::new(),
            timestamp,
            author: CastAuthor {
                fid: 1,
                fname: authors[0].to_string(),
                display_name: String::new(),
                pfp_url: None,
            },
            embedded_urls: vec![url.to_string()],
            mention_fids: vec![],
            mentions_positions: vec![],
            mentions: vec![],
            deleted_at: None,
        };
        Story {
            url: url.to_string(),
            hostname: String::new(),
            first_cast,
            rest_of_casts: vec![],
            unique_authors: authors.iter().map(ToString::to_string).collect(),
            first_timestamp: timestamp,
            last_timestamp: Utc
                .timestamp_opt(1_700_000_000 + last_minute * 60, 0)
                .unwrap(),
            metadata: PageMetadata::default(),
            cleaned_text: String::new(),
        }
    }

    #[test]
    fn test_more_authors_ranks_first() {
        let ranked = rank(vec![
            story("https://a.com", &["alice", "bob"], 100),
            story("https://b.com", &["carol", "dave", "erin"], 0),
        ]);
        assert_eq!(ranked[0].url, "https://b.com");
        assert_eq!(ranked[1].url, "https://a.com");
    }

    #[test]
    fn test_tie_broken_by_recency() {
        let ranked = rank(vec![
            story("https://a.com", &["alice", "bob", "carol"], 10),
            story("https://b.com", &["dave", "erin", "frank"], 20),
        ]);
        assert_eq!(ranked[0].url, "https://b.com");
        assert_eq!(ranked[1].url, "https://a.com");
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        let ranked = rank(vec![
            story("https://a.com", &["alice", "bob"], 10),
            story("https://b.com", &["carol", "dave"], 10),
        ]);
        assert_eq!(ranked[0].url, "https://a.com");
        assert_eq!(ranked[1].url, "https://b.com");
    }
}
