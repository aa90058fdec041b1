//! Application state.
//!
//! `App` owns the preference [`Store`] plus everything ephemeral: fetched
//! items per card, scroll positions, the active UI mode and the status
//! line.  Input handlers call the methods here; rendering reads the fields.
//!
//! Store mutations always go through [`Store::dispatch`] so the persistence
//! subscriber sees every change.

use std::collections::HashMap;

use chrono::Utc;
use ratatui::widgets::ListState;

use crate::catalog::{self, SourceOption};
use crate::poll::PollMsg;
use crate::prefs::store::Store;
use crate::prefs::{Action, DndDuration, ListingMode};
use crate::source::FeedItem;

/// Which surface currently has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reading: cards show their content, arrows scroll and switch cards.
    Normal,
    /// Reordering: content is hidden, arrows move the selected card.
    Organize,
    /// The sources overlay: toggle catalog entries on and off.
    Sources,
}

pub struct App {
    pub store: Store,
    /// Fetched items, keyed by card name.  Replaced wholesale per poll.
    pub items: HashMap<String, Vec<FeedItem>>,
    /// Last fetch error per card, cleared by the next successful fetch.
    pub card_errors: HashMap<String, String>,
    /// Scroll state per card.
    list_states: HashMap<String, ListState>,
    /// Index of the focused card (into the store's card list).
    pub selected_card: usize,
    pub mode: Mode,
    /// Cursor row in the sources overlay.
    pub sources_cursor: usize,
    /// Last poll / action message for the status bar.
    pub status: String,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Set when the card membership changed and the poller must be rebuilt.
    sources_dirty: bool,
}

impl App {
    pub fn new(store: Store) -> Self {
        // Organize mode is part of the persisted state; restore it.
        let mode = if store.state().is_organize_mode {
            Mode::Organize
        } else {
            Mode::Normal
        };

        Self {
            store,
            items: HashMap::new(),
            card_errors: HashMap::new(),
            list_states: HashMap::new(),
            selected_card: 0,
            mode,
            sources_cursor: 0,
            status: "Starting…".into(),
            quit: false,
            sources_dirty: false,
        }
    }

    // -- polling -------------------------------------------------------------

    /// Fold one poller message into the per-card buffers.
    pub fn apply_poll(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Items { card, items } => {
                self.status = format!("{card}: {} items", items.len());
                self.card_errors.remove(&card);

                // Keep the selection on the same item across the refresh
                // (by id); fall back to clamping the index.
                let previous_id = self
                    .list_states
                    .get(&card)
                    .and_then(|state| state.selected())
                    .and_then(|i| self.items.get(&card).and_then(|items| items.get(i)))
                    .map(|item| item.id.clone());

                let state = self.list_states.entry(card.clone()).or_default();
                let followed =
                    previous_id.and_then(|id| items.iter().position(|item| item.id == id));
                match followed {
                    Some(i) => state.select(Some(i)),
                    None => match state.selected() {
                        Some(i) if i >= items.len() => {
                            state.select(items.len().checked_sub(1));
                        }
                        None if !items.is_empty() => state.select(Some(0)),
                        _ => {}
                    },
                }

                self.items.insert(card, items);
            }
            PollMsg::Error { card, message } => {
                self.status = format!("{card}: {message}");
                self.card_errors.insert(card, message);
            }
        }
    }

    /// True once a membership change requires a poller rebuild; resets the
    /// flag.
    pub fn take_sources_dirty(&mut self) -> bool {
        std::mem::take(&mut self.sources_dirty)
    }

    /// Force a refetch of every card on the next tick.
    pub fn refresh(&mut self) {
        self.sources_dirty = true;
        self.status = "Refreshing…".into();
    }

    // -- card focus & scrolling ----------------------------------------------

    pub fn card_count(&self) -> usize {
        self.store.state().cards.len()
    }

    /// Name of the focused card, if any cards are selected at all.
    pub fn selected_card_name(&self) -> Option<String> {
        self.store
            .state()
            .cards
            .get(self.selected_card)
            .map(|c| c.name.clone())
    }

    /// The slice of cards currently on screen: a window of
    /// `max_visible_cards` that slides to keep the focused card visible.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let count = self.card_count();
        let max = self.store.state().max_visible_cards.max(1);
        if count <= max {
            return 0..count;
        }
        let start = self.selected_card.min(count - max);
        start..start + max
    }

    pub fn select_next_card(&mut self) {
        if self.card_count() == 0 {
            return;
        }
        self.selected_card = (self.selected_card + 1).min(self.card_count() - 1);
    }

    pub fn select_previous_card(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    fn clamp_selected_card(&mut self) {
        self.selected_card = self.selected_card.min(self.card_count().saturating_sub(1));
    }

    /// Scroll state for a card, for stateful list rendering.
    pub fn list_state_for(&mut self, card: &str) -> &mut ListState {
        self.list_states.entry(card.to_string()).or_default()
    }

    pub fn select_next_item(&mut self) {
        let Some(card) = self.selected_card_name() else {
            return;
        };
        let len = self.items.get(&card).map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        let state = self.list_states.entry(card).or_default();
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous_item(&mut self) {
        let Some(card) = self.selected_card_name() else {
            return;
        };
        let state = self.list_states.entry(card).or_default();
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    /// Open the focused item's link with the platform opener.
    pub fn open_selected_item(&mut self) {
        let Some(card) = self.selected_card_name() else {
            return;
        };
        let link = self
            .list_states
            .get(&card)
            .and_then(|state| state.selected())
            .and_then(|i| self.items.get(&card).and_then(|items| items.get(i)))
            .and_then(|item| item.link.clone());

        match link {
            Some(link) => {
                self.status = match open_in_browser(&link) {
                    Ok(()) => format!("Opened {link}"),
                    Err(e) => format!("Could not open link: {e}"),
                };
            }
            None => self.status = "No link for this item".into(),
        }
    }

    // -- organize mode -------------------------------------------------------

    pub fn enter_organize(&mut self) {
        self.mode = Mode::Organize;
        self.store.dispatch(Action::SetOrganizeMode(true));
        self.status = "Organize: ←/→ move card, Enter/Esc done".into();
    }

    pub fn exit_organize(&mut self) {
        self.mode = Mode::Normal;
        self.store.dispatch(Action::SetOrganizeMode(false));
        self.status = "Layout saved".into();
    }

    /// Move the focused card one position left (`-1`) or right (`+1`).
    /// Focus follows the card.
    pub fn move_card(&mut self, delta: isize) {
        let count = self.card_count();
        if count < 2 {
            return;
        }
        let from = self.selected_card;
        let to = from
            .saturating_add_signed(delta)
            .min(count - 1);
        if from == to {
            return;
        }
        self.store.dispatch(Action::Reorder { from, to });
        self.selected_card = to;
    }

    // -- sources overlay -----------------------------------------------------

    pub fn open_sources(&mut self) {
        self.mode = Mode::Sources;
        self.sources_cursor = 0;
        self.status = "Sources: ↑/↓ move, Space toggle, Esc close".into();
    }

    pub fn close_sources(&mut self) {
        self.mode = Mode::Normal;
    }

    /// The merged catalog listing shown in the overlay.
    pub fn source_options(&self) -> Vec<SourceOption> {
        catalog::merged_options(&self.store.state().user_custom_cards)
    }

    pub fn sources_cursor_down(&mut self) {
        let len = self.source_options().len();
        if len == 0 {
            return;
        }
        self.sources_cursor = (self.sources_cursor + 1).min(len - 1);
    }

    pub fn sources_cursor_up(&mut self) {
        self.sources_cursor = self.sources_cursor.saturating_sub(1);
    }

    /// Toggle the option under the cursor and reconcile the card list with
    /// the new membership set.  Retained cards keep their order; a newly
    /// enabled source is appended.
    pub fn toggle_source(&mut self) {
        let options = self.source_options();
        let Some(option) = options.get(self.sources_cursor) else {
            return;
        };

        let mut selection = self.store.state().card_names();
        if selection.contains(&option.value) {
            selection.retain(|name| name != &option.value);
            self.status = format!("Removed {}", option.label);
        } else {
            selection.push(option.value.clone());
            self.status = format!("Added {}", option.label);
        }

        self.store.dispatch(Action::Reconcile { selection });
        self.clamp_selected_card();

        // Drop buffers for cards that are gone and refetch the new set.
        let names = self.store.state().card_names();
        self.items.retain(|card, _| names.contains(card));
        self.sources_dirty = true;
    }

    // -- small toggles -------------------------------------------------------

    pub fn is_dnd_active(&self) -> bool {
        self.store
            .state()
            .dnd_duration
            .is_active(Utc::now().timestamp_millis())
    }

    pub fn toggle_dnd(&mut self) {
        let next = if self.is_dnd_active() {
            DndDuration::Never
        } else {
            DndDuration::Always
        };
        self.status = match next {
            DndDuration::Never => "Do not disturb off".into(),
            _ => "Do not disturb on".into(),
        };
        self.store.dispatch(Action::SetDnd(next));
    }

    pub fn toggle_listing_mode(&mut self) {
        let next = match self.store.state().listing_mode {
            ListingMode::Normal => ListingMode::Compact,
            ListingMode::Compact => ListingMode::Normal,
        };
        self.store.dispatch(Action::SetListingMode(next));
    }
}

/// Hand a URL to the platform opener, detached and silenced.
fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(not(target_os = "macos"))]
    const OPENER: &str = "xdg-open";

    std::process::Command::new(OPENER)
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Preferences;

    fn app() -> App {
        App::new(Store::new(Preferences::default()))
    }

    fn items_for(card: &str, n: usize) -> PollMsg {
        PollMsg::Items {
            card: card.to_string(),
            items: (0..n)
                .map(|i| FeedItem {
                    id: i.to_string(),
                    title: format!("item {i}"),
                    link: None,
                    published: None,
                    meta: None,
                })
                .collect(),
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_in_normal_mode() {
        let app = app();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.selected_card, 0);
        assert!(!app.quit);
    }

    #[test]
    fn persisted_organize_mode_is_restored() {
        let mut prefs = Preferences::default();
        prefs.is_organize_mode = true;
        let app = App::new(Store::new(prefs));
        assert_eq!(app.mode, Mode::Organize);
    }

    // -- polling -------------------------------------------------------------

    #[test]
    fn poll_items_replace_the_card_buffer() {
        let mut app = app();
        app.apply_poll(items_for("hackernews", 3));
        app.apply_poll(items_for("hackernews", 2));

        assert_eq!(app.items["hackernews"].len(), 2);
        assert_eq!(app.status, "hackernews: 2 items");
    }

    #[test]
    fn poll_error_is_kept_until_the_next_success() {
        let mut app = app();
        app.apply_poll(PollMsg::Error {
            card: "github".into(),
            message: "timed out".into(),
        });
        assert_eq!(app.card_errors["github"], "timed out");

        app.apply_poll(items_for("github", 1));
        assert!(app.card_errors.is_empty());
    }

    #[test]
    fn scroll_position_is_clamped_when_a_card_shrinks() {
        let mut app = app();
        app.apply_poll(items_for("hackernews", 5));
        app.list_state_for("hackernews").select(Some(4));

        app.apply_poll(items_for("hackernews", 2));
        assert_eq!(app.list_state_for("hackernews").selected(), Some(1));
    }

    #[test]
    fn selection_follows_the_item_across_a_refresh() {
        let mut app = app();
        app.apply_poll(items_for("hackernews", 3));
        // Select the item with id "1".
        app.list_state_for("hackernews").select(Some(1));

        // Refresh shifts the rank order: id "1" is now first.
        app.apply_poll(PollMsg::Items {
            card: "hackernews".into(),
            items: vec![
                FeedItem {
                    id: "1".into(),
                    title: "moved up".into(),
                    link: None,
                    published: None,
                    meta: None,
                },
                FeedItem {
                    id: "9".into(),
                    title: "newcomer".into(),
                    link: None,
                    published: None,
                    meta: None,
                },
            ],
        });

        assert_eq!(app.list_state_for("hackernews").selected(), Some(0));
    }

    // -- card focus ----------------------------------------------------------

    #[test]
    fn card_focus_clamps_at_both_ends() {
        let mut app = app();
        app.select_previous_card();
        assert_eq!(app.selected_card, 0);

        for _ in 0..10 {
            app.select_next_card();
        }
        assert_eq!(app.selected_card, app.card_count() - 1);
    }

    #[test]
    fn visible_range_slides_with_the_focus() {
        let mut app = app();
        app.store.dispatch(Action::SetMaxVisibleCards(2));

        assert_eq!(app.visible_range(), 0..2);

        app.selected_card = 3;
        let range = app.visible_range();
        assert!(range.contains(&3));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn visible_range_covers_everything_when_few_cards() {
        let app = app();
        assert_eq!(app.visible_range(), 0..4);
    }

    // -- item scrolling ------------------------------------------------------

    #[test]
    fn item_scrolling_clamps_to_the_buffer() {
        let mut app = app();
        app.apply_poll(items_for("github", 2));
        app.selected_card = 0; // github

        app.select_next_item();
        app.select_next_item();
        app.select_next_item();
        assert_eq!(app.list_state_for("github").selected(), Some(1));

        app.select_previous_item();
        app.select_previous_item();
        app.select_previous_item();
        assert_eq!(app.list_state_for("github").selected(), Some(0));
    }

    #[test]
    fn item_scrolling_on_an_empty_card_is_a_noop() {
        let mut app = app();
        app.select_next_item();
        assert_eq!(app.list_state_for("github").selected(), None);
    }

    #[test]
    fn opening_a_linkless_item_only_updates_the_status() {
        let mut app = app();
        app.apply_poll(items_for("github", 1));
        app.selected_card = 0;
        app.select_next_item();

        app.open_selected_item();
        assert_eq!(app.status, "No link for this item");
    }

    // -- organize mode -------------------------------------------------------

    #[test]
    fn organize_mode_round_trips_through_the_store() {
        let mut app = app();
        app.enter_organize();
        assert_eq!(app.mode, Mode::Organize);
        assert!(app.store.state().is_organize_mode);

        app.exit_organize();
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.store.state().is_organize_mode);
    }

    #[test]
    fn move_card_reorders_and_focus_follows() {
        let mut app = app();
        app.selected_card = 0;

        app.move_card(1);
        assert_eq!(app.selected_card, 1);
        assert_eq!(
            app.store.state().card_names(),
            vec!["hackernews", "github", "ai", "producthunt"]
        );

        app.move_card(-1);
        assert_eq!(app.selected_card, 0);
        assert_eq!(
            app.store.state().card_names(),
            vec!["github", "hackernews", "ai", "producthunt"]
        );
    }

    #[test]
    fn move_card_clamps_at_the_edges() {
        let mut app = app();
        app.selected_card = 0;
        app.move_card(-1);
        assert_eq!(app.selected_card, 0);
        assert_eq!(app.store.state().card_names()[0], "github");
    }

    // -- sources overlay -----------------------------------------------------

    #[test]
    fn toggle_source_adds_then_removes() {
        let mut app = app();
        app.open_sources();

        let options = app.source_options();
        let lobsters = options.iter().position(|o| o.value == "lobsters").unwrap();
        app.sources_cursor = lobsters;

        app.toggle_source();
        assert!(app.store.state().card_names().contains(&"lobsters".to_string()));
        assert!(app.take_sources_dirty());

        app.toggle_source();
        assert!(!app.store.state().card_names().contains(&"lobsters".to_string()));
    }

    #[test]
    fn toggle_source_prunes_buffers_of_removed_cards() {
        let mut app = app();
        app.apply_poll(items_for("github", 2));
        app.open_sources();

        let options = app.source_options();
        app.sources_cursor = options.iter().position(|o| o.value == "github").unwrap();
        app.toggle_source();

        assert!(!app.items.contains_key("github"));
    }

    #[test]
    fn removing_the_last_cards_keeps_focus_in_range() {
        let mut app = app();
        app.selected_card = 3;
        app.open_sources();

        // Remove producthunt, the focused (last) card.
        let options = app.source_options();
        app.sources_cursor = options.iter().position(|o| o.value == "producthunt").unwrap();
        app.toggle_source();

        assert!(app.selected_card < app.card_count());
    }

    #[test]
    fn sources_cursor_clamps() {
        let mut app = app();
        app.open_sources();
        app.sources_cursor_up();
        assert_eq!(app.sources_cursor, 0);

        let len = app.source_options().len();
        for _ in 0..len + 5 {
            app.sources_cursor_down();
        }
        assert_eq!(app.sources_cursor, len - 1);
    }

    // -- toggles -------------------------------------------------------------

    #[test]
    fn dnd_toggle_flips_between_never_and_always() {
        let mut app = app();
        assert!(!app.is_dnd_active());

        app.toggle_dnd();
        assert!(app.is_dnd_active());
        assert_eq!(app.store.state().dnd_duration, DndDuration::Always);

        app.toggle_dnd();
        assert!(!app.is_dnd_active());
    }

    #[test]
    fn listing_mode_toggle_round_trips() {
        let mut app = app();
        app.toggle_listing_mode();
        assert_eq!(app.store.state().listing_mode, ListingMode::Compact);
        app.toggle_listing_mode();
        assert_eq!(app.store.state().listing_mode, ListingMode::Normal);
    }
}
