//! Card content sources.
//!
//! This module defines the [`DataSource`] trait, the common [`FeedItem`]
//! type, and the mapping from the user's selected cards to concrete source
//! implementations:
//!
//! * [`rss`] — RSS feeds (built-in feeds and user-added ones).
//! * [`hackernews`] — the Hacker News API.
//! * [`github`] — GitHub trending via the search API.
//! * [`prompts`] — AI prompt shortcuts (no network).
//! * [`notes`] — user note cards (no network).
//!
//! ## Adding a new source
//!
//! 1. Create a file in this directory and implement [`DataSource`] for a
//!    struct holding whatever configuration it needs.
//! 2. Re-export it below and map a card name to it in [`build_sources`].
//!
//! The polling loop, app state and UI are all source-agnostic.

mod feed_item;
mod github;
mod hackernews;
mod notes;
mod prompts;
mod rss;

pub use feed_item::FeedItem;
pub use github::GithubTrendingSource;
pub use hackernews::HackerNewsSource;
pub use notes::NotesSource;
pub use prompts::PromptSource;
pub use rss::RssSource;

use anyhow::Result;

use crate::prefs::{DateRange, Preferences};

/// Trait every card source implements.
///
/// The polling loop calls [`fetch()`](DataSource::fetch) periodically on a
/// background thread, so implementations must be [`Send`].
pub trait DataSource: Send {
    /// The card `name` this source feeds (items are routed by it).
    fn card(&self) -> &str;

    /// Fetch the current batch of items for the card.
    ///
    /// Implementations do their own HTTP/parsing work; errors surface in
    /// the UI as per-card status messages.
    fn fetch(&self) -> Result<Vec<FeedItem>>;
}

/// Built-in feeds for the supported sources that are plain RSS.
fn builtin_feed_url(name: &str, tag: Option<&str>) -> Option<String> {
    match name {
        "producthunt" => Some("https://www.producthunt.com/feed".to_string()),
        "lobsters" => Some("https://lobste.rs/rss".to_string()),
        "devto" => Some(match tag {
            Some(tag) => format!("https://dev.to/feed/tag/{tag}"),
            None => "https://dev.to/feed".to_string(),
        }),
        "reddit" => Some(format!(
            "https://www.reddit.com/r/{}/.rss",
            tag.unwrap_or("programming")
        )),
        _ => None,
    }
}

/// Build one source per selected card, configured from the preferences
/// (per-card settings, tags, prompt engines, custom catalog).
///
/// Cards that resolve to nothing — a custom card that lost its catalog
/// entry, say — are skipped; the card then simply stays empty.
pub fn build_sources(prefs: &Preferences) -> Vec<Box<dyn DataSource>> {
    let tag = prefs.user_selected_tags.first().map(String::as_str);
    let mut sources: Vec<Box<dyn DataSource>> = Vec::new();

    for card in &prefs.cards {
        let settings = prefs.cards_settings.get(&card.name);

        match card.name.as_str() {
            "github" => {
                let language = settings
                    .and_then(|s| s.language.clone())
                    .or_else(|| tag.map(String::from));
                let range = settings
                    .and_then(|s| s.date_range)
                    .unwrap_or(DateRange::Daily);
                sources.push(Box::new(GithubTrendingSource::new(language, range)));
            }
            "hackernews" => sources.push(Box::new(HackerNewsSource::new())),
            "ai" => sources.push(Box::new(PromptSource::new(
                &prefs.prompt_engine,
                &prefs.prompt_engines,
            ))),
            name => {
                if let Some(url) = builtin_feed_url(name, tag) {
                    sources.push(Box::new(RssSource::new(url, name)));
                } else if let Some(custom) =
                    prefs.user_custom_cards.iter().find(|c| c.value == name)
                {
                    if let Some(url) = &custom.feed_url {
                        sources.push(Box::new(RssSource::new(url.as_str(), name)));
                    } else if let Some(blocks) = &custom.editable_content {
                        sources.push(Box::new(NotesSource::new(name, blocks.clone())));
                    }
                }
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CustomCard;
    use crate::prefs::cards::{CardKind, SelectedCard};

    fn select(prefs: &mut Preferences, name: &str, kind: CardKind) {
        let id = prefs.cards.len() as u32;
        prefs.cards.push(SelectedCard {
            id,
            name: name.to_string(),
            kind,
        });
    }

    #[test]
    fn one_source_per_default_card() {
        let prefs = Preferences::default();
        let sources = build_sources(&prefs);

        let cards: Vec<&str> = sources.iter().map(|s| s.card()).collect();
        assert_eq!(cards, vec!["github", "hackernews", "ai", "producthunt"]);
    }

    #[test]
    fn custom_cards_map_to_rss_or_notes() {
        let mut prefs = Preferences::default();
        prefs.cards.clear();
        prefs.user_custom_cards = vec![
            CustomCard {
                value: "my-feed".into(),
                label: "My Feed".into(),
                feed_url: Some("https://example.com/feed.xml".into()),
                editable_content: None,
            },
            CustomCard {
                value: "scratch".into(),
                label: "Scratch".into(),
                feed_url: None,
                editable_content: Some(Vec::new()),
            },
        ];
        select(&mut prefs, "my-feed", CardKind::Rss);
        select(&mut prefs, "scratch", CardKind::Custom);

        let sources = build_sources(&prefs);
        let cards: Vec<&str> = sources.iter().map(|s| s.card()).collect();
        assert_eq!(cards, vec!["my-feed", "scratch"]);
    }

    #[test]
    fn dangling_cards_are_skipped() {
        let mut prefs = Preferences::default();
        prefs.cards.clear();
        select(&mut prefs, "vanished", CardKind::Rss);

        assert!(build_sources(&prefs).is_empty());
    }

    #[test]
    fn tag_flows_into_the_taggable_feeds() {
        assert_eq!(
            builtin_feed_url("devto", Some("rust")).unwrap(),
            "https://dev.to/feed/tag/rust"
        );
        assert_eq!(
            builtin_feed_url("reddit", Some("rust")).unwrap(),
            "https://www.reddit.com/r/rust/.rss"
        );
        assert_eq!(
            builtin_feed_url("reddit", None).unwrap(),
            "https://www.reddit.com/r/programming/.rss"
        );
        assert!(builtin_feed_url("github", Some("rust")).is_none());
    }
}
