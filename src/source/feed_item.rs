//! The item type shared across all card sources.
//!
//! Every source converts its native format (RSS entries, API payloads, note
//! blocks) into `FeedItem`s, so polling, app state and rendering stay
//! source-agnostic.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A single entry displayed inside a card.
///
/// Items do not carry their card: the poller tags each batch with the card
/// it was fetched for, and the app keys its buffers by card name.
///
/// ## Sorting
///
/// `FeedItem` implements [`Ord`] for **reverse-chronological** ordering:
/// newer items sort before older ones, and items without a date sort last.
/// Time-based sources (RSS) sort their items with this; ranked sources
/// (Hacker News, GitHub trending) keep the order the backend returned.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedItem {
    /// Stable identifier within the card (guid, API id, block id); keeps
    /// the selection on the same item across refreshes.
    pub id: String,

    /// Headline shown in the card.
    pub title: String,

    /// URL to the full content, when there is one to open.
    pub link: Option<String>,

    /// Publication timestamp; `None` for undated content (notes, prompts).
    pub published: Option<DateTime<Utc>>,

    /// Short secondary label ("312 points", "★ 1.4k"), rendered dimmed.
    pub meta: Option<String>,
}

impl Ord for FeedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that newer timestamps sort before older ones.
        // `None` is less than `Some(_)`, so undated items sink to the bottom.
        other.published.cmp(&self.published)
    }
}

impl PartialOrd for FeedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, published: Option<DateTime<Utc>>) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: id.to_string(),
            link: None,
            published,
            meta: None,
        }
    }

    #[test]
    fn sorts_newest_first() {
        let old = item("old", Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let new = item("new", Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));

        let mut items = vec![old, new];
        items.sort();

        assert_eq!(items[0].id, "new");
        assert_eq!(items[1].id, "old");
    }

    #[test]
    fn undated_items_sort_last() {
        let dated = item("dated", Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        let undated = item("undated", None);

        let mut items = vec![undated, dated];
        items.sort();

        assert_eq!(items[0].id, "dated");
        assert_eq!(items[1].id, "undated");
    }
}
