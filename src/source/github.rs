//! GitHub trending source.
//!
//! GitHub has no official trending endpoint, so this approximates it with
//! the search API: repositories created inside the card's date range,
//! ordered by stars.  The card settings supply the range and an optional
//! language filter.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::prefs::DateRange;

use super::{DataSource, FeedItem};

const SEARCH_URL: &str = "https://api.github.com/search/repositories";
const MAX_REPOS: usize = 20;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<Repo>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
    created_at: DateTime<Utc>,
}

pub struct GithubTrendingSource {
    client: reqwest::blocking::Client,
    language: Option<String>,
    range: DateRange,
}

impl GithubTrendingSource {
    pub fn new(language: Option<String>, range: DateRange) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            language,
            range,
        }
    }

    /// The search qualifier string, e.g. `created:>2026-07-28 language:rust`.
    fn query(&self, now: DateTime<Utc>) -> String {
        let since = (now - chrono::Duration::days(self.range.days())).format("%Y-%m-%d");
        match &self.language {
            Some(language) => format!("created:>{since} language:{language}"),
            None => format!("created:>{since}"),
        }
    }

    fn repo_to_item(repo: &Repo) -> FeedItem {
        let stars = if repo.stargazers_count >= 1000 {
            format!("★ {:.1}k", repo.stargazers_count as f64 / 1000.0)
        } else {
            format!("★ {}", repo.stargazers_count)
        };
        let meta = match &repo.description {
            Some(description) => format!("{stars} · {description}"),
            None => stars,
        };

        FeedItem {
            id: repo.full_name.clone(),
            title: repo.full_name.clone(),
            link: Some(repo.html_url.clone()),
            published: Some(repo.created_at),
            meta: Some(meta),
        }
    }
}

impl DataSource for GithubTrendingSource {
    fn card(&self) -> &str {
        "github"
    }

    fn fetch(&self) -> Result<Vec<FeedItem>> {
        let response: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", self.query(Utc::now()).as_str()),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", "20"),
            ])
            // The search API rejects requests without a user agent.
            .header("User-Agent", concat!("devtab/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/vnd.github+json")
            .send()?
            .error_for_status()?
            .json()?;

        Ok(response
            .items
            .iter()
            .take(MAX_REPOS)
            .map(Self::repo_to_item)
            .collect())
    }
}
