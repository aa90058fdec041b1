//! Source catalogs.
//!
//! Two read-only lookups feed the card reconciler:
//!
//! * [`SUPPORTED`] — the built-in sources every installation knows about.
//! * The user's custom catalog ([`CustomCard`]) — RSS feeds and note cards
//!   added at runtime, owned by the preference state.
//!
//! The settings overlay shows both merged into one label-sorted listing
//! ([`merged_options`]).

use serde::{Deserialize, Serialize};

/// A built-in content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedSource {
    /// Stable identifier used as the card `name`.
    pub value: &'static str,
    /// Display label shown as the card title.
    pub label: &'static str,
}

/// Every source the dashboard ships with.
pub const SUPPORTED: &[SupportedSource] = &[
    SupportedSource { value: "github", label: "GitHub Trending" },
    SupportedSource { value: "hackernews", label: "Hacker News" },
    SupportedSource { value: "ai", label: "AI Prompts" },
    SupportedSource { value: "producthunt", label: "Product Hunt" },
    SupportedSource { value: "devto", label: "DEV Community" },
    SupportedSource { value: "reddit", label: "Reddit" },
    SupportedSource { value: "lobsters", label: "Lobsters" },
];

/// Look up a built-in source by its value.
pub fn find_supported(value: &str) -> Option<&'static SupportedSource> {
    SUPPORTED.iter().find(|s| s.value == value)
}

/// A user-added source: either an RSS feed (`feed_url` set) or a note card
/// (`editable_content` set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCard {
    pub value: String,
    pub label: String,
    #[serde(rename = "feedUrl", default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(rename = "editableContent", default, skip_serializing_if = "Option::is_none")]
    pub editable_content: Option<Vec<NoteBlock>>,
}

/// One block of a note card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBlock {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: NoteBlockKind,
    /// Only meaningful for [`NoteBlockKind::Todo`] blocks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteBlockKind {
    Paragraph,
    Heading,
    Todo,
    BulletedList,
    NumberedList,
    Quote,
    Divider,
}

/// One row of the sources settings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    pub value: String,
    pub label: String,
    pub is_custom: bool,
}

/// Merge the built-in and custom catalogs into a single listing, sorted by
/// label the way the settings screen presents them.
pub fn merged_options(custom: &[CustomCard]) -> Vec<SourceOption> {
    let mut options: Vec<SourceOption> = SUPPORTED
        .iter()
        .map(|s| SourceOption {
            value: s.value.to_string(),
            label: s.label.to_string(),
            is_custom: false,
        })
        .chain(custom.iter().map(|c| SourceOption {
            value: c.value.clone(),
            label: c.label.clone(),
            is_custom: true,
        }))
        .collect();

    options.sort_by(|a, b| a.label.cmp(&b.label));
    options
}

/// Display label for a card name: catalog label if known, the raw name
/// otherwise.
pub fn card_label(name: &str, custom: &[CustomCard]) -> String {
    if let Some(s) = find_supported(name) {
        return s.label.to_string();
    }
    custom
        .iter()
        .find(|c| c.value == name)
        .map(|c| c.label.clone())
        .unwrap_or_else(|| name.to_string())
}
