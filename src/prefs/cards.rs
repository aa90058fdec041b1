//! Card-set reconciliation and ordering.
//!
//! The dashboard renders an ordered list of [`SelectedCard`]s.  Two pure
//! functions maintain that list:
//!
//! * [`reconcile`] — apply a membership edit (the user toggled sources on or
//!   off) while keeping the relative order of everything that survives.
//! * [`reorder`] — move a single card to a new position.
//!
//! Both are pure: no I/O, no global state.  The preference store calls them
//! from its reducer and commits the result.
//!
//! An earlier version of this logic rebuilt the whole list from the selected
//! values, resetting every `id` and discarding the user's ordering.  The
//! rules below exist to keep a hand-arranged layout stable across source
//! edits, so be careful when touching them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{CustomCard, SupportedSource};

/// How a selected card resolves against the source catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// A built-in source from [`crate::catalog::SUPPORTED`].
    Supported,
    /// A user-added feed (has a feed URL).
    Rss,
    /// A user-added note card (editable content, no feed).
    Custom,
}

/// One entry in the ordered card list.
///
/// Identity is the `name` (unique within the list); `id` is an opaque
/// integer kept for display/debugging and never reused once minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCard {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
}

/// Reconcile the ordered card list against a new membership set.
///
/// * Cards whose name is still in `selection` keep their relative order and
///   their `id`.
/// * Cards whose name is absent are dropped.
/// * Names in `selection` that are not in `current` are appended after all
///   retained cards, in `selection` iteration order, with freshly minted
///   ids (`max(existing id) + 1`, counting up — ids from `current` are never
///   reused, even for cards dropped by this same call).
/// * A new name must resolve against one of the catalogs to determine its
///   kind; names found in neither catalog are silently dropped.
///
/// `selection` has set semantics: duplicates are ignored (first occurrence
/// wins).  An empty selection yields an empty list.
pub fn reconcile(
    current: &[SelectedCard],
    selection: &[String],
    supported: &[SupportedSource],
    custom: &[CustomCard],
) -> Vec<SelectedCard> {
    let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();

    // Keep existing cards that are still selected, in their current order.
    let mut next: Vec<SelectedCard> = current
        .iter()
        .filter(|card| selected.contains(card.name.as_str()))
        .cloned()
        .collect();

    let existing: HashSet<&str> = current.iter().map(|card| card.name.as_str()).collect();

    // Mint ids above everything the input list ever used, so a
    // remove-and-add within one call cannot recycle a stale id.
    let mut next_id = current.iter().map(|card| card.id + 1).max().unwrap_or(0);

    for name in selection {
        if existing.contains(name.as_str()) || next.iter().any(|card| &card.name == name) {
            continue;
        }

        let kind = if supported.iter().any(|s| s.value == name.as_str()) {
            CardKind::Supported
        } else if let Some(card) = custom.iter().find(|c| &c.value == name) {
            if card.feed_url.is_some() {
                CardKind::Rss
            } else {
                CardKind::Custom
            }
        } else {
            // Unknown name: contributes nothing to the output.
            continue;
        };

        next.push(SelectedCard {
            id: next_id,
            name: name.clone(),
            kind,
        });
        next_id += 1;
    }

    next
}

/// Move the card at `from` so it ends up at index `to`, shifting the cards
/// in between by one position.  Membership, ids and kinds are unchanged.
///
/// # Panics
///
/// Panics if `from` or `to` is out of range for `cards`.  Callers (the
/// organize-mode key handler) clamp indices before dispatching.
pub fn reorder(cards: &[SelectedCard], from: usize, to: usize) -> Vec<SelectedCard> {
    let mut next = cards.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    next
}
