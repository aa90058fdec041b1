//! RSS feed source.
//!
//! Serves both the built-in feed-backed cards (Product Hunt, Lobsters,
//! DEV, Reddit) and user-added custom feeds — the card name decides where
//! the items land, the mechanics are identical.

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{DataSource, FeedItem};

/// An RSS 2.0 feed fetched over HTTP.
pub struct RssSource {
    url: String,
    card: String,
}

impl RssSource {
    pub fn new(url: impl Into<String>, card: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            card: card.into(),
        }
    }

    /// Convert a fetched [`rss::Channel`] into sorted [`FeedItem`]s.
    ///
    /// Pure (no I/O) so tests can exercise the conversion without a
    /// network.  Items come back newest-first; entries the feed leaves
    /// undated sort last.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<FeedItem> {
        let mut items: Vec<FeedItem> = channel
            .items()
            .iter()
            .map(|item| {
                // Prefer <guid>, fall back to <link>, then empty string.
                let id = item
                    .guid()
                    .map(|g| g.value().to_string())
                    .or_else(|| item.link().map(String::from))
                    .unwrap_or_default();

                // RFC-2822 dates; degrade to None on anything unparsable.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                FeedItem {
                    id,
                    title: item.title().unwrap_or("(untitled)").to_string(),
                    link: item.link().map(String::from),
                    published,
                    meta: None,
                }
            })
            .collect();

        items.sort();
        items
    }
}

impl DataSource for RssSource {
    fn card(&self) -> &str {
        &self.card
    }

    fn fetch(&self) -> Result<Vec<FeedItem>> {
        let body = reqwest::blocking::get(&self.url)?.bytes()?;
        let channel = rss::Channel::read_from(body.as_ref())?;
        Ok(Self::parse_channel(&channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_channel_extracts_and_sorts_items() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>Older Post</title>
      <link>https://example.com/1</link>
      <guid>guid-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Newer Post</title>
      <link>https://example.com/2</link>
      <guid>guid-2</guid>
      <pubDate>Tue, 02 Jan 2024 12:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = RssSource::parse_channel(&channel);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "guid-2", "newest first");
        assert_eq!(items[1].title, "Older Post");
        assert_eq!(items[1].link.as_deref(), Some("https://example.com/1"));
    }

    #[test]
    fn falls_back_to_link_when_no_guid() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <title>No GUID</title>
      <link>https://example.com/no-guid</link>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = RssSource::parse_channel(&channel);

        assert_eq!(items[0].id, "https://example.com/no-guid");
    }

    #[test]
    fn handles_missing_title_and_bad_date() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item>
      <guid>g1</guid>
      <pubDate>not-a-real-date</pubDate>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = RssSource::parse_channel(&channel);

        assert_eq!(items[0].title, "(untitled)");
        assert!(items[0].published.is_none());
    }

    #[test]
    fn card_returns_the_configured_name() {
        let src = RssSource::new("http://example.com/feed", "my-feed");
        assert_eq!(src.card(), "my-feed");
    }
}
