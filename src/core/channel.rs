//! Single-writer value channels feeding the transports

use tokio::sync::{broadcast, watch};

const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Latest value plus a stream of updates
///
/// The latest value stays readable whether or not anybody subscribed.
/// Subscribers receive every published update from the moment they subscribe.
#[derive(Debug)]
pub struct Published<T> {
    latest: watch::Sender<Option<T>>,
    updates: broadcast::Sender<T>,
}

impl<T: Clone + PartialEq> Published<T> {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(None);
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self { latest, updates }
    }

    /// Store and broadcast a value
    pub fn publish(&self, value: T) {
        self.latest.send_replace(Some(value.clone()));
        let _ = self.updates.send(value);
    }

    /// Store and broadcast a value unless it equals the latest one
    pub fn publish_if_changed(&self, value: T) -> bool {
        let changed = self.latest.send_if_modified(|latest| {
            if latest.as_ref() == Some(&value) {
                false
            } else {
                *latest = Some(value.clone());
                true
            }
        });

        if changed {
            let _ = self.updates.send(value);
        }
        changed
    }

    /// Store a value without broadcasting it
    pub fn seed(&self, value: T) {
        self.latest.send_replace(Some(value));
    }

    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.updates.subscribe()
    }
}

impl<T: Clone + PartialEq> Default for Published<T> {
    fn default() -> Self {
        Self::new()
    }
}
