//! Preference persistence and settings import/export.
//!
//! The state is stored as JSON under a versioned envelope
//! `{"version": 1, "state": {...}}` in a fixed file inside the platform
//! config directory.  Saves are atomic (write a temp file, then rename) so a
//! crash mid-write cannot corrupt the stored preferences.
//!
//! Export/import round-trips a *flat* settings document, and import applies
//! it field by field: every field present in the file is dispatched through
//! its store action, everything absent keeps its current value.  A file
//! that fails to parse is rejected with an error for the caller to surface;
//! a file that parses but only contains some fields is partially applied.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::SelectedCard;
use super::store::Store;
use super::{Action, CardSettings, DndDuration, ListingMode, Preferences, PromptEngine};
use crate::catalog::CustomCard;

/// Bumped when the envelope layout changes incompatibly.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access preferences file: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("preferences were written by a newer version (format {0})")]
    Version(u32),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    state: &'a Preferences,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    state: Preferences,
}

/// Handle to the on-disk preference file.
#[derive(Debug, Clone)]
pub struct PrefStorage {
    path: PathBuf,
}

impl PrefStorage {
    /// Storage at the default location
    /// (`<config_dir>/devtab/preferences.json`).
    pub fn default_location() -> Result<Self, StorageError> {
        let dir = dirs::config_dir()
            .ok_or(StorageError::NoConfigDir)?
            .join("devtab");
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join("preferences.json"),
        })
    }

    /// Storage at a specific path (tests, `--config`-style overrides).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored preferences.  A missing file yields the defaults; a
    /// malformed or future-versioned file is an error, and the caller
    /// decides whether to fall back to defaults.
    pub fn load(&self) -> Result<Preferences, StorageError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let envelope: EnvelopeIn = serde_json::from_str(&content)?;
        if envelope.version > FORMAT_VERSION {
            return Err(StorageError::Version(envelope.version));
        }
        Ok(envelope.state)
    }

    /// Save preferences atomically.
    pub fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        let envelope = EnvelopeOut {
            version: FORMAT_VERSION,
            state: prefs,
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// The flat export/import document.  Every field is optional so partial
/// files apply partially.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_mode: Option<ListingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_visible_cards: Option<usize>,
    #[serde(rename = "DNDDuration", skip_serializing_if = "Option::is_none")]
    pub dnd_duration: Option<DndDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_organize_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<SelectedCard>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_custom_cards: Option<Vec<CustomCard>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_engines: Option<Vec<PromptEngine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards_settings: Option<HashMap<String, CardSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Snapshot the full preference state into an export document.
pub fn export_document(prefs: &Preferences) -> SettingsDocument {
    SettingsDocument {
        listing_mode: Some(prefs.listing_mode),
        max_visible_cards: Some(prefs.max_visible_cards),
        dnd_duration: Some(prefs.dnd_duration),
        is_organize_mode: Some(prefs.is_organize_mode),
        cards: Some(prefs.cards.clone()),
        user_custom_cards: Some(prefs.user_custom_cards.clone()),
        user_selected_tags: Some(prefs.user_selected_tags.clone()),
        prompt_engine: Some(prefs.prompt_engine.clone()),
        prompt_engines: Some(prefs.prompt_engines.clone()),
        cards_settings: Some(prefs.cards_settings.clone()),
        first_seen_date: Some(prefs.first_seen_date),
        export_date: Some(Utc::now().to_rfc3339()),
        version: Some("1.0".to_string()),
    }
}

/// Write the full settings export to `path`.
pub fn export_to_file(prefs: &Preferences, path: &Path) -> Result<(), StorageError> {
    let doc = export_document(prefs);
    let content = serde_json::to_string_pretty(&doc)?;
    fs::write(path, content)?;
    Ok(())
}

/// Parse a settings file.  Parse failures are surfaced to the caller;
/// nothing has been applied at that point.
pub fn import_from_file(path: &Path) -> Result<SettingsDocument, StorageError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Apply an imported document to the store, field by field.  Each present
/// field goes through its own action; absent fields are untouched.
pub fn apply_import(store: &mut Store, doc: SettingsDocument) {
    if let Some(mode) = doc.listing_mode {
        store.dispatch(Action::SetListingMode(mode));
    }
    if let Some(max) = doc.max_visible_cards {
        store.dispatch(Action::SetMaxVisibleCards(max));
    }
    if let Some(dnd) = doc.dnd_duration {
        store.dispatch(Action::SetDnd(dnd));
    }
    if let Some(on) = doc.is_organize_mode {
        store.dispatch(Action::SetOrganizeMode(on));
    }
    // Custom cards before cards, so imported card kinds can resolve against
    // the imported catalog if a later reconcile runs.
    if let Some(custom) = doc.user_custom_cards {
        store.dispatch(Action::SetCustomCards(custom));
    }
    if let Some(cards) = doc.cards {
        store.dispatch(Action::SetCards(cards));
    }
    if let Some(tags) = doc.user_selected_tags {
        store.dispatch(Action::SetTags(tags));
    }
    if let Some(engines) = doc.prompt_engines {
        // Replace the user-added engines wholesale: drop the current ones,
        // then add the imported set.
        let current = store.state().prompt_engines.clone();
        for engine in current {
            store.dispatch(Action::RemovePromptEngine { url: engine.url });
        }
        for engine in engines {
            store.dispatch(Action::AddPromptEngine(engine));
        }
    }
    // After the engines exist, select the active one.
    if let Some(engine) = doc.prompt_engine {
        store.dispatch(Action::SetPromptEngine(engine));
    }
    if let Some(settings) = doc.cards_settings {
        for (card, value) in settings {
            store.dispatch(Action::SetCardSettings { card, settings: value });
        }
    }
}
