//! AI prompt shortcuts card.
//!
//! No network: the card lists a handful of canned prompts that open in the
//! user's chosen prompt engine, followed by the engine roster itself so
//! switching engines is one selection away.

use anyhow::Result;

use crate::prefs::PromptEngine;

use super::{DataSource, FeedItem};

/// The engines every installation ships with.  User-added engines from the
/// preferences are appended after these.
pub const DEFAULT_ENGINES: &[(&str, &str)] = &[
    ("chatgpt", "https://chatgpt.com/?q="),
    ("claude", "https://claude.ai/new?q="),
    ("mistral", "https://chat.mistral.ai/chat?q="),
    ("perplexity", "https://www.perplexity.ai/search?q="),
    ("grok", "https://grok.com/?q="),
];

/// Canned prompts shown at the top of the card.
const PROMPTS: &[&str] = &[
    "Explain this error message",
    "Review this function for bugs",
    "Write a commit message for this diff",
    "Summarize this article",
    "Compare these two libraries",
];

pub struct PromptSource {
    active_engine: String,
    engines: Vec<PromptEngine>,
}

impl PromptSource {
    pub fn new(active_engine: &str, user_engines: &[PromptEngine]) -> Self {
        let mut engines: Vec<PromptEngine> = DEFAULT_ENGINES
            .iter()
            .map(|(label, url)| PromptEngine {
                label: (*label).to_string(),
                url: (*url).to_string(),
            })
            .collect();
        engines.extend(user_engines.iter().cloned());

        Self {
            active_engine: active_engine.to_string(),
            engines,
        }
    }

    fn engine_url(&self) -> Option<&str> {
        self.engines
            .iter()
            .find(|e| e.label.eq_ignore_ascii_case(&self.active_engine))
            .map(|e| e.url.as_str())
    }

    /// Build the card items: prompts first, then the engine roster.
    fn items(&self) -> Vec<FeedItem> {
        let engine_url = self.engine_url();

        let prompts = PROMPTS.iter().map(|prompt| FeedItem {
            id: format!("prompt:{prompt}"),
            title: (*prompt).to_string(),
            // Query-string encoding is just spaces for these ASCII prompts.
            link: engine_url.map(|url| format!("{url}{}", prompt.replace(' ', "+"))),
            published: None,
            meta: None,
        });

        let engines = self.engines.iter().map(|engine| {
            let active = engine.label.eq_ignore_ascii_case(&self.active_engine);
            FeedItem {
                id: format!("engine:{}", engine.label),
                title: format!("Engine: {}", engine.label),
                link: Some(engine.url.clone()),
                published: None,
                meta: active.then(|| "active".to_string()),
            }
        });

        prompts.chain(engines).collect()
    }
}

impl DataSource for PromptSource {
    fn card(&self) -> &str {
        "ai"
    }

    fn fetch(&self) -> Result<Vec<FeedItem>> {
        Ok(self.items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_link_into_the_active_engine() {
        let source = PromptSource::new("claude", &[]);
        let items = source.items();

        let first = &items[0];
        assert_eq!(first.title, "Explain this error message");
        assert_eq!(
            first.link.as_deref(),
            Some("https://claude.ai/new?q=Explain+this+error+message")
        );
    }

    #[test]
    fn active_engine_is_marked() {
        let source = PromptSource::new("chatgpt", &[]);
        let items = source.items();

        let active: Vec<&FeedItem> = items
            .iter()
            .filter(|i| i.meta.as_deref() == Some("active"))
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Engine: chatgpt");
    }

    #[test]
    fn user_engines_join_the_roster() {
        let user = vec![PromptEngine {
            label: "Phind".into(),
            url: "https://www.phind.com/search?q=".into(),
        }];
        let source = PromptSource::new("phind", &user);
        let items = source.items();

        let phind = items.iter().find(|i| i.title == "Engine: Phind").unwrap();
        assert_eq!(phind.meta.as_deref(), Some("active"));

        // The canned prompts route through the user engine too.
        assert!(items[0]
            .link
            .as_deref()
            .unwrap()
            .starts_with("https://www.phind.com/search?q="));
    }

    #[test]
    fn unknown_engine_leaves_prompts_unlinked() {
        let source = PromptSource::new("nonexistent", &[]);
        let items = source.items();
        assert!(items[0].link.is_none());
    }
}
