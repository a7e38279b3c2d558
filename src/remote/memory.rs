//! In-memory remote store implementation.
//!
//! Keeps each collection as an insertion-ordered document list and
//! re-broadcasts the full collection to every subscriber after each change,
//! matching the snapshot-not-delta contract of the real backend. Supports
//! failure injection for exercising error paths in tests.

use crate::error::{AtlasError, Result};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::{
    DropReason, RemoteDocument, RemoteEvent, RemoteStore, RemoteSubscription, SubscriptionConfig,
    SubscriptionId,
};

/// Per-collection state: documents plus active subscribers.
#[derive(Default)]
struct Collection {
    docs: Vec<RemoteDocument>,
    subscribers: HashMap<SubscriptionId, Sender<RemoteEvent>>,
}

impl Collection {
    /// Broadcast an event to all subscribers, dropping any whose buffer is
    /// full (slow consumers must not stall the store).
    fn broadcast(&mut self, event: &RemoteEvent) {
        let mut to_remove = Vec::new();

        for (id, sender) in &self.subscribers {
            if sender.try_send(event.clone()).is_err() {
                to_remove.push(*id);
            }
        }

        for id in to_remove {
            if let Some(sender) = self.subscribers.remove(&id) {
                let _ = sender.try_send(RemoteEvent::Dropped {
                    reason: DropReason::BufferOverflow,
                });
            }
        }
    }

    fn broadcast_snapshot(&mut self) {
        let event = RemoteEvent::Snapshot(self.docs.clone());
        self.broadcast(&event);
    }
}

/// An in-process [`RemoteStore`].
pub struct MemoryRemote {
    collections: Mutex<HashMap<String, Collection>>,
    next_id: AtomicU64,
    fail_writes: AtomicBool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Replace a collection's contents and notify subscribers.
    pub fn seed(&self, collection: &str, docs: Vec<RemoteDocument>) {
        let mut collections = self.collections.lock();
        let coll = collections.entry(collection.to_string()).or_default();
        coll.docs = docs;
        coll.broadcast_snapshot();
    }

    /// When set, `write` and `delete` fail until cleared. The stored
    /// documents are left untouched, as a real backend would on a rejected
    /// request.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Push a synthetic connectivity error to every subscriber of a
    /// collection.
    pub fn emit_connection_error(&self, collection: &str, message: &str) {
        let mut collections = self.collections.lock();
        if let Some(coll) = collections.get_mut(collection) {
            coll.broadcast(&RemoteEvent::ConnectionError(message.to_string()));
        }
    }

    /// Current documents of a collection (test inspection).
    pub fn documents(&self, collection: &str) -> Vec<RemoteDocument> {
        self.collections
            .lock()
            .get(collection)
            .map(|c| c.docs.clone())
            .unwrap_or_default()
    }

    /// Number of live subscribers on a collection.
    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map(|c| c.subscribers.len())
            .unwrap_or(0)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AtlasError::Remote("injected write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryRemote {
    fn subscribe(&self, collection: &str, config: SubscriptionConfig) -> Result<RemoteSubscription> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        let mut collections = self.collections.lock();
        let coll = collections.entry(collection.to_string()).or_default();

        // Initial full snapshot, delivered before any live change.
        sender
            .try_send(RemoteEvent::Snapshot(coll.docs.clone()))
            .map_err(|_| AtlasError::Subscription("subscription buffer too small".to_string()))?;

        coll.subscribers.insert(id, sender);

        Ok(RemoteSubscription { id, receiver })
    }

    fn unsubscribe(&self, collection: &str, id: SubscriptionId) {
        let mut collections = self.collections.lock();
        if let Some(coll) = collections.get_mut(collection) {
            if let Some(sender) = coll.subscribers.remove(&id) {
                let _ = sender.try_send(RemoteEvent::Dropped {
                    reason: DropReason::Unsubscribed,
                });
            }
        }
    }

    fn write(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        self.check_writable()?;

        let mut collections = self.collections.lock();
        let coll = collections.entry(collection.to_string()).or_default();

        match coll.docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.data = document,
            None => coll.docs.push(RemoteDocument::new(id, document)),
        }

        coll.broadcast_snapshot();
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.check_writable()?;

        let mut collections = self.collections.lock();
        if let Some(coll) = collections.get_mut(collection) {
            let before = coll.docs.len();
            coll.docs.retain(|d| d.id != id);
            if coll.docs.len() != before {
                coll.broadcast_snapshot();
            }
        }
        Ok(())
    }
}
