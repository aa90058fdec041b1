//! User preferences: state, actions, reducer.
//!
//! The whole dashboard configuration lives in one [`Preferences`] value,
//! owned by a [`store::Store`].  UI code never mutates it directly; it
//! dispatches an [`Action`] and the pure [`reduce`] function computes the
//! next state.  Persistence is a store subscriber (see
//! [`persist`]), so the transition logic stays testable without touching
//! the filesystem.

pub mod cards;
pub mod persist;
pub mod store;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, CustomCard, NoteBlock};
use cards::SelectedCard;

/// Item-list density for feed cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    #[default]
    Normal,
    Compact,
}

/// Window used by sources that rank content over time (GitHub trending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Daily,
    Weekly,
    Monthly,
}

impl DateRange {
    pub fn days(self) -> i64 {
        match self {
            DateRange::Daily => 1,
            DateRange::Weekly => 7,
            DateRange::Monthly => 30,
        }
    }
}

/// Per-card tweaks, merged field-by-field on update: a field left `None`
/// keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl CardSettings {
    pub fn merged_with(&self, update: &CardSettings) -> CardSettings {
        CardSettings {
            language: update.language.clone().or_else(|| self.language.clone()),
            date_range: update.date_range.or(self.date_range),
        }
    }
}

/// A user-added prompt engine for the AI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEngine {
    pub label: String,
    pub url: String,
}

/// Do-not-disturb setting: feed content is hidden while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DndDuration {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "always")]
    Always,
    /// A countdown started for `value` minutes, ending at `countdown`
    /// (milliseconds since the epoch).
    #[serde(untagged)]
    Timed { value: u64, countdown: i64 },
}

impl DndDuration {
    pub fn is_active(&self, now_ms: i64) -> bool {
        match self {
            DndDuration::Never => false,
            DndDuration::Always => true,
            DndDuration::Timed { value, countdown } => *value > 0 && *countdown > now_ms,
        }
    }
}

/// The complete persisted preference state.
///
/// Field names serialize as camelCase (`maxVisibleCards`, `DNDDuration`),
/// the settings-file wire convention.  Unknown fields in stored JSON are
/// ignored; missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub cards: Vec<SelectedCard>,
    pub user_custom_cards: Vec<CustomCard>,
    pub cards_settings: HashMap<String, CardSettings>,
    pub user_selected_tags: Vec<String>,
    pub listing_mode: ListingMode,
    pub max_visible_cards: usize,
    pub prompt_engine: String,
    pub prompt_engines: Vec<PromptEngine>,
    #[serde(rename = "DNDDuration")]
    pub dnd_duration: DndDuration,
    pub is_organize_mode: bool,
    pub first_seen_date: i64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            cards: vec![
                SelectedCard { id: 0, name: "github".into(), kind: cards::CardKind::Supported },
                SelectedCard { id: 1, name: "hackernews".into(), kind: cards::CardKind::Supported },
                SelectedCard { id: 2, name: "ai".into(), kind: cards::CardKind::Supported },
                SelectedCard { id: 3, name: "producthunt".into(), kind: cards::CardKind::Supported },
            ],
            user_custom_cards: Vec::new(),
            cards_settings: HashMap::new(),
            user_selected_tags: vec!["rust".into()],
            listing_mode: ListingMode::Normal,
            max_visible_cards: 4,
            prompt_engine: "chatgpt".into(),
            prompt_engines: Vec::new(),
            dnd_duration: DndDuration::Never,
            is_organize_mode: false,
            first_seen_date: Utc::now().timestamp_millis(),
        }
    }
}

impl Preferences {
    /// Names of the currently selected cards, in display order.
    pub fn card_names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.name.clone()).collect()
    }
}

/// Every mutation the store supports.
#[derive(Debug, Clone)]
pub enum Action {
    /// Apply a membership edit from the sources control (see
    /// [`cards::reconcile`]).
    Reconcile { selection: Vec<String> },
    /// Move a card to a new position (see [`cards::reorder`]).
    Reorder { from: usize, to: usize },
    SetCards(Vec<SelectedCard>),
    SetCustomCards(Vec<CustomCard>),
    /// Register a custom card and select it in one step.
    AddCustomCard(CustomCard),
    /// Delete a custom card from the catalog and from the selection.
    RemoveCustomCard { value: String },
    SetCardSettings { card: String, settings: CardSettings },
    UpdateEditableContent { card: String, blocks: Vec<NoteBlock> },
    SetTags(Vec<String>),
    SetListingMode(ListingMode),
    SetMaxVisibleCards(usize),
    SetPromptEngine(String),
    AddPromptEngine(PromptEngine),
    RemovePromptEngine { url: String },
    SetDnd(DndDuration),
    SetOrganizeMode(bool),
    /// Replace the whole state (initial load, full import).
    Replace(Box<Preferences>),
}

/// Pure state transition.  Never performs I/O and never fails; invalid
/// inputs degrade the same way the UI flows do (unknown source names are
/// dropped by the reconciler, missing custom cards make
/// `UpdateEditableContent` a no-op, and so on).
pub fn reduce(state: &Preferences, action: Action) -> Preferences {
    let mut next = state.clone();

    match action {
        Action::Reconcile { selection } => {
            next.cards = cards::reconcile(
                &state.cards,
                &selection,
                catalog::SUPPORTED,
                &state.user_custom_cards,
            );
        }
        Action::Reorder { from, to } => {
            next.cards = cards::reorder(&state.cards, from, to);
        }
        Action::SetCards(cards) => next.cards = cards,
        Action::SetCustomCards(custom) => next.user_custom_cards = custom,
        Action::AddCustomCard(card) => {
            let mut selection = state.card_names();
            selection.push(card.value.clone());
            next.user_custom_cards.push(card);
            next.cards = cards::reconcile(
                &state.cards,
                &selection,
                catalog::SUPPORTED,
                &next.user_custom_cards,
            );
        }
        Action::RemoveCustomCard { value } => {
            next.user_custom_cards.retain(|c| c.value != value);
            next.cards.retain(|c| c.name != value);
        }
        Action::SetCardSettings { card, settings } => {
            let merged = match next.cards_settings.get(&card) {
                Some(current) => current.merged_with(&settings),
                None => settings,
            };
            next.cards_settings.insert(card, merged);
        }
        Action::UpdateEditableContent { card, blocks } => {
            if let Some(custom) = next.user_custom_cards.iter_mut().find(|c| c.value == card) {
                custom.editable_content = Some(blocks);
            }
        }
        Action::SetTags(tags) => next.user_selected_tags = tags,
        Action::SetListingMode(mode) => next.listing_mode = mode,
        Action::SetMaxVisibleCards(max) => next.max_visible_cards = max,
        Action::SetPromptEngine(engine) => next.prompt_engine = engine,
        Action::AddPromptEngine(engine) => next.prompt_engines.push(engine),
        Action::RemovePromptEngine { url } => {
            next.prompt_engines.retain(|e| e.url != url);
        }
        Action::SetDnd(dnd) => next.dnd_duration = dnd,
        Action::SetOrganizeMode(on) => next.is_organize_mode = on,
        Action::Replace(prefs) => next = *prefs,
    }

    next
}
