//! Hacker News source.
//!
//! Uses the public Firebase API: one request for the ranked story ids,
//! then one per story.  The rank order is the product — items are *not*
//! re-sorted by date.

use std::time::Duration;

use anyhow::Result;
use chrono::DateTime;
use serde::Deserialize;

use super::{DataSource, FeedItem};

const TOP_STORIES_URL: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";
const ITEM_URL: &str = "https://hacker-news.firebaseio.com/v0/item";

/// How many of the ranked stories to show.
const MAX_STORIES: usize = 20;

/// Story payload as returned by `/v0/item/<id>.json`.  Fields the API may
/// omit (dead links, jobs) are optional.
#[derive(Debug, Deserialize)]
struct Story {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    score: Option<u32>,
    time: Option<i64>,
    descendants: Option<u32>,
}

pub struct HackerNewsSource {
    client: reqwest::blocking::Client,
}

impl HackerNewsSource {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Convert a story payload into a [`FeedItem`].  Pure, for tests.
    fn story_to_item(story: &Story) -> FeedItem {
        let link = story
            .url
            .clone()
            .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", story.id));

        let meta = format!(
            "{} points · {} comments",
            story.score.unwrap_or(0),
            story.descendants.unwrap_or(0)
        );

        FeedItem {
            id: story.id.to_string(),
            title: story
                .title
                .clone()
                .unwrap_or_else(|| "(untitled)".to_string()),
            link: Some(link),
            published: story.time.and_then(|t| DateTime::from_timestamp(t, 0)),
            meta: Some(meta),
        }
    }

    fn fetch_story(&self, id: u64) -> Option<Story> {
        // A single dead story should not take the whole card down.
        let response = self.client.get(format!("{ITEM_URL}/{id}.json")).send().ok()?;
        response.json::<Option<Story>>().ok()?
    }
}

impl Default for HackerNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for HackerNewsSource {
    fn card(&self) -> &str {
        "hackernews"
    }

    fn fetch(&self) -> Result<Vec<FeedItem>> {
        let ids: Vec<u64> = self.client.get(TOP_STORIES_URL).send()?.json()?;

        let items = ids
            .into_iter()
            .take(MAX_STORIES)
            .filter_map(|id| self.fetch_story(id))
            .map(|story| Self::story_to_item(&story))
            .collect();

        Ok(items)
    }
}
