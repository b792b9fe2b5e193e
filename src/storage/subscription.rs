//! Collection change notification
//!
//! Listeners register per collection and receive whole-collection snapshots.
//! Registration hands back a [`Subscription`] that must be explicitly
//! unsubscribed to stop delivery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::{debug, error};

use super::models::{Campaign, CollectionKey};
use crate::errors::BrandtrackerError;

/// Receives collection snapshots
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, collection: &CollectionKey, snapshot: &[Campaign]);

    fn on_error(&self, collection: &CollectionKey, error: &BrandtrackerError) {
        error!(
            "Listener '{}' on {} got store error: {}",
            self.name(),
            collection,
            error
        );
    }

    fn name(&self) -> &str {
        "listener"
    }
}

type ListenerMap = DashMap<CollectionKey, Vec<(u64, Arc<dyn ChangeListener>)>>;

/// Listener bookkeeping shared by the store backends
#[derive(Default)]
pub struct SubscriberRegistry {
    listeners: Arc<ListenerMap>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        collection: &CollectionKey,
        listener: Arc<dyn ChangeListener>,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Registering listener '{}' on {} (#{})",
            listener.name(),
            collection,
            id
        );
        self.listeners
            .entry(collection.clone())
            .or_default()
            .push((id, listener));

        Subscription {
            id,
            collection: collection.clone(),
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Current listeners of a collection, cloned out so callbacks run unlocked
    fn listeners_of(&self, collection: &CollectionKey) -> Vec<Arc<dyn ChangeListener>> {
        self.listeners
            .get(collection)
            .map(|entry| entry.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    pub fn notify(&self, collection: &CollectionKey, snapshot: &[Campaign]) {
        for listener in self.listeners_of(collection) {
            listener.on_change(collection, snapshot);
        }
    }

    pub fn notify_error(&self, collection: &CollectionKey, error: &BrandtrackerError) {
        for listener in self.listeners_of(collection) {
            listener.on_error(collection, error);
        }
    }

    pub fn listener_count(&self, collection: &CollectionKey) -> usize {
        self.listeners
            .get(collection)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

/// Handle for one listener registration
#[must_use = "dropping a Subscription keeps the listener registered; call unsubscribe()"]
pub struct Subscription {
    id: u64,
    collection: CollectionKey,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn collection(&self) -> &CollectionKey {
        &self.collection
    }

    /// Stop delivery to this listener
    pub fn unsubscribe(self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        if let Some(mut entry) = listeners.get_mut(&self.collection) {
            entry.retain(|(id, _)| *id != self.id);
        }
        listeners.remove_if(&self.collection, |_, v| v.is_empty());
        debug!("Unsubscribed listener #{} from {}", self.id, self.collection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        sizes: Mutex<Vec<usize>>,
    }

    impl ChangeListener for Recorder {
        fn on_change(&self, _collection: &CollectionKey, snapshot: &[Campaign]) {
            self.sizes.lock().push(snapshot.len());
        }
    }

    #[test]
    fn test_notify_reaches_only_matching_collection() {
        let registry = SubscriberRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let key = CollectionKey::new("campaigns_2025");
        let other = CollectionKey::new("campaigns_2024");

        let sub = registry.register(&key, recorder.clone());
        registry.notify(&key, &[Campaign::default()]);
        registry.notify(&other, &[]);

        assert_eq!(*recorder.sizes.lock(), vec![1]);
        sub.unsubscribe();
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let registry = SubscriberRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let key = CollectionKey::new("campaigns_2025");

        let sub = registry.register(&key, recorder.clone());
        assert_eq!(registry.listener_count(&key), 1);
        sub.unsubscribe();
        assert_eq!(registry.listener_count(&key), 0);

        registry.notify(&key, &[]);
        assert!(recorder.sizes.lock().is_empty());
    }
}
