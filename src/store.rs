//! The live village mirror.
//!
//! [`VillageStore`] owns the in-memory mirror of one remote collection. The
//! mirror is updated exclusively from subscription snapshots (single
//! writer); edits flow through [`crate::edits::EditCoordinator`] and come
//! back via the next snapshot. Consumers read immutable `Arc` snapshots, so
//! every computation triggered by one update observes the same value.

use crate::error::Result;
use crate::remote::{
    RemoteDocument, RemoteEvent, RemoteStore, RemoteSubscription, SubscriptionConfig,
};
use crate::types::{Village, VillageId};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// In-memory mirror of a remote village collection.
pub struct VillageStore {
    remote: Arc<dyn RemoteStore>,
    collection: String,
    config: SubscriptionConfig,

    /// Current snapshot. Replaced wholesale on every subscription event;
    /// readers clone the `Arc` and never observe a partial update.
    mirror: RwLock<Arc<Vec<Village>>>,

    /// Live subscription, if any.
    subscription: Mutex<Option<RemoteSubscription>>,

    /// Most recent connectivity error, kept until the caller collects it.
    last_error: Mutex<Option<String>>,
}

impl VillageStore {
    /// Create a store over a collection. No subscription is opened yet.
    pub fn new(remote: Arc<dyn RemoteStore>, collection: impl Into<String>) -> Self {
        Self::with_config(remote, collection, SubscriptionConfig::default())
    }

    pub fn with_config(
        remote: Arc<dyn RemoteStore>,
        collection: impl Into<String>,
        config: SubscriptionConfig,
    ) -> Self {
        Self {
            remote,
            collection: collection.into(),
            config,
            mirror: RwLock::new(Arc::new(Vec::new())),
            subscription: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    /// Open the subscription. Idempotent: calling again while subscribed is
    /// a no-op.
    pub fn subscribe(&self) -> Result<()> {
        let mut sub = self.subscription.lock();
        if sub.is_none() {
            *sub = Some(self.remote.subscribe(&self.collection, self.config.clone())?);
            debug!(collection = %self.collection, "subscription opened");
        }
        Ok(())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Drain all pending subscription events, applying each snapshot in
    /// delivery order. Returns the number of snapshots applied.
    ///
    /// Connectivity errors do not clear the mirror; the last-known snapshot
    /// keeps serving and the error is retrievable via
    /// [`VillageStore::take_last_error`].
    pub fn pump(&self) -> usize {
        let mut applied = 0;
        let mut guard = self.subscription.lock();
        let Some(sub) = guard.as_ref() else {
            return 0;
        };

        let mut disconnected = false;
        loop {
            match sub.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) {
                        applied += 1;
                    }
                }
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            warn!(collection = %self.collection, "subscription channel closed");
            *guard = None;
        }
        applied
    }

    /// Block until at least one snapshot is applied or the timeout elapses.
    /// Returns `true` if a snapshot was applied.
    ///
    /// Intended for tests and simple consumers; an event-loop client should
    /// prefer [`VillageStore::pump`].
    pub fn wait_for_snapshot(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let guard = self.subscription.lock();
        let Some(sub) = guard.as_ref() else {
            return false;
        };

        loop {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match sub.recv_timeout(deadline - now) {
                Ok(event) => {
                    if self.handle_event(event) {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    /// Apply one event. Returns `true` if a snapshot was applied.
    fn handle_event(&self, event: RemoteEvent) -> bool {
        match event {
            RemoteEvent::Snapshot(docs) => {
                let villages = decode_snapshot(docs);
                *self.mirror.write() = Arc::new(villages);
                true
            }
            RemoteEvent::ConnectionError(message) => {
                warn!(collection = %self.collection, %message, "connectivity error, serving stale snapshot");
                *self.last_error.lock() = Some(message);
                false
            }
            RemoteEvent::Dropped { reason } => {
                debug!(collection = %self.collection, ?reason, "subscription dropped");
                false
            }
        }
    }

    /// The current mirror. Cheap to clone; immutable once returned.
    pub fn snapshot(&self) -> Arc<Vec<Village>> {
        Arc::clone(&self.mirror.read())
    }

    /// Look up one village by id.
    pub fn get(&self, id: &VillageId) -> Option<Village> {
        self.mirror.read().iter().find(|v| &v.id == id).cloned()
    }

    pub fn contains(&self, id: &VillageId) -> bool {
        self.mirror.read().iter().any(|v| &v.id == id)
    }

    pub fn len(&self) -> usize {
        self.mirror.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.read().is_empty()
    }

    /// Collect the most recent connectivity error, if one occurred since the
    /// last call.
    pub fn take_last_error(&self) -> Option<String> {
        self.last_error.lock().take()
    }

    /// Close the subscription. The mirror keeps its last value; no further
    /// snapshots are delivered. Also invoked on drop.
    pub fn unsubscribe(&self) {
        if let Some(sub) = self.subscription.lock().take() {
            self.remote.unsubscribe(&self.collection, sub.id);
            debug!(collection = %self.collection, "subscription closed");
        }
    }
}

impl Drop for VillageStore {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Decode a remote snapshot into villages.
///
/// The document id always wins over any id embedded in the body. A document
/// whose body cannot be interpreted at all is skipped with a warning; one
/// bad document must not take down the rest of the snapshot.
fn decode_snapshot(docs: Vec<RemoteDocument>) -> Vec<Village> {
    let mut villages = Vec::with_capacity(docs.len());
    for doc in docs {
        let id = doc.id;
        match serde_json::from_value::<Village>(doc.data) {
            Ok(mut village) => {
                village.id = VillageId::new(id);
                villages.push(village);
            }
            Err(error) => {
                warn!(%id, %error, "skipping malformed village document");
            }
        }
    }
    villages
}
