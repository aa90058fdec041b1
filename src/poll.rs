//! Background content polling.
//!
//! Runs on a dedicated thread, periodically fetching every card's source
//! and sending results to the UI thread over an [`mpsc`] channel, tagged
//! with the card they belong to.
//!
//! There is no explicit shutdown signal: the thread notices the receiver
//! is gone on its next send and stops.  The app uses exactly that to swap
//! source sets after a reconcile — drop the old receiver, spawn a new
//! poller.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::source::{DataSource, FeedItem};

/// Messages sent from the poller thread to the UI thread.
pub enum PollMsg {
    /// A card's fetch succeeded; these items replace the card's content.
    Items { card: String, items: Vec<FeedItem> },
    /// A card's fetch failed with this error description.
    Error { card: String, message: String },
}

/// How often the poller re-fetches all sources.
const POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Spawn the background polling thread.
///
/// Returns a receiver the main loop drains on every tick.  The first round
/// of fetches starts immediately; afterwards the thread sleeps
/// [`POLL_INTERVAL`] between rounds and exits once the receiver is dropped.
pub fn spawn(sources: Vec<Box<dyn DataSource>>) -> mpsc::Receiver<PollMsg> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        loop {
            for src in &sources {
                let msg = match src.fetch() {
                    Ok(items) => PollMsg::Items {
                        card: src.card().to_string(),
                        items,
                    },
                    Err(e) => PollMsg::Error {
                        card: src.card().to_string(),
                        message: e.to_string(),
                    },
                };
                // Receiver gone: the main thread exited or replaced us.
                if tx.send(msg).is_err() {
                    return;
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct StaticSource {
        card: &'static str,
        fail: bool,
    }

    impl DataSource for StaticSource {
        fn card(&self) -> &str {
            self.card
        }

        fn fetch(&self) -> anyhow::Result<Vec<FeedItem>> {
            if self.fail {
                Err(anyhow!("boom"))
            } else {
                Ok(vec![FeedItem {
                    id: "1".into(),
                    title: "hello".into(),
                    link: None,
                    published: None,
                    meta: None,
                }])
            }
        }
    }

    #[test]
    fn poller_tags_results_per_card() {
        let sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(StaticSource { card: "good", fail: false }),
            Box::new(StaticSource { card: "bad", fail: true }),
        ];

        let rx = spawn(sources);

        match rx.recv().unwrap() {
            PollMsg::Items { card, items } => {
                assert_eq!(card, "good");
                assert_eq!(items.len(), 1);
            }
            PollMsg::Error { .. } => panic!("first source should succeed"),
        }
        match rx.recv().unwrap() {
            PollMsg::Error { card, message } => {
                assert_eq!(card, "bad");
                assert!(message.contains("boom"));
            }
            PollMsg::Items { .. } => panic!("second source should fail"),
        }
    }

    #[test]
    fn dropping_the_receiver_stops_the_thread() {
        let rx = spawn(vec![Box::new(StaticSource { card: "x", fail: false }) as Box<dyn DataSource>]);
        drop(rx);
        // Nothing to assert directly; the thread exits on its next send.
        // This test exists to document the shutdown contract.
    }
}
