//! The preference store: an injectable state container.
//!
//! The store owns the [`Preferences`] value.  Callers dispatch an
//! [`Action`]; the store runs the pure reducer and then notifies every
//! subscriber with the new state.  The persistence adapter is just another
//! subscriber, so saving is fire-and-forget and the reducer never blocks on
//! the filesystem.

use super::{reduce, Action, Preferences};

type Listener = Box<dyn FnMut(&Preferences)>;

pub struct Store {
    state: Preferences,
    listeners: Vec<Listener>,
}

impl Store {
    pub fn new(initial: Preferences) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
        }
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> &Preferences {
        &self.state
    }

    /// Register a change listener.  Listeners run synchronously after every
    /// dispatch, in registration order, with the post-transition state.
    pub fn subscribe(&mut self, listener: impl FnMut(&Preferences) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply one action and notify subscribers.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::ListingMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_applies_the_reducer() {
        let mut store = Store::new(Preferences::default());
        store.dispatch(Action::SetMaxVisibleCards(2));
        assert_eq!(store.state().max_visible_cards, 2);
    }

    #[test]
    fn subscribers_see_every_new_state() {
        let seen: Rc<RefCell<Vec<ListingMode>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut store = Store::new(Preferences::default());
        store.subscribe(move |prefs| sink.borrow_mut().push(prefs.listing_mode));

        store.dispatch(Action::SetListingMode(ListingMode::Compact));
        store.dispatch(Action::SetListingMode(ListingMode::Normal));

        assert_eq!(*seen.borrow(), vec![ListingMode::Compact, ListingMode::Normal]);
    }

    #[test]
    fn mutations_are_applied_in_dispatch_order() {
        let mut store = Store::new(Preferences::default());
        store.dispatch(Action::Reorder { from: 0, to: 1 });
        store.dispatch(Action::Reorder { from: 2, to: 0 });
        assert_eq!(
            store.state().card_names(),
            vec!["ai", "hackernews", "github", "producthunt"]
        );
    }
}
