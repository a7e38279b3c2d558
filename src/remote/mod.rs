//! Remote document store abstraction.
//!
//! The atlas never talks to a concrete database directly. Everything goes
//! through the [`RemoteStore`] trait, which models the three primitives the
//! system needs:
//!
//! - A subscription that delivers the full collection immediately and again
//!   after every change (complete snapshots, never deltas)
//! - A replace-semantics upsert keyed by document id
//! - A delete keyed by document id
//!
//! Documents cross this boundary as untyped JSON values; the typed
//! interpretation happens in the mirror layer. [`MemoryRemote`] is an
//! in-process implementation used by tests and offline tooling.
//!
//! # Example
//!
//! ```ignore
//! let remote = Arc::new(MemoryRemote::new());
//! let sub = remote.subscribe("villages", SubscriptionConfig::default())?;
//!
//! loop {
//!     match sub.recv() {
//!         Ok(RemoteEvent::Snapshot(docs)) => println!("{} documents", docs.len()),
//!         Ok(RemoteEvent::ConnectionError(msg)) => eprintln!("transient: {msg}"),
//!         Ok(RemoteEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod memory;

pub use memory::MemoryRemote;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before the subscriber is dropped.
    pub buffer_size: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self { buffer_size: 256 }
    }
}

/// One document as stored remotely: an id plus an uninterpreted JSON body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub id: String,
    pub data: Value,
}

impl RemoteDocument {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Events delivered to a subscription.
#[derive(Clone, Debug)]
pub enum RemoteEvent {
    /// The complete current contents of the collection.
    Snapshot(Vec<RemoteDocument>),

    /// A transient connectivity problem. The collection is unchanged as far
    /// as this client knows; consumers keep their last snapshot.
    ConnectionError(String),

    /// The subscription was terminated and will receive nothing further.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Handle to a live subscription.
pub struct RemoteSubscription {
    pub id: SubscriptionId,
    /// Channel delivering events in remote emission order.
    pub receiver: crossbeam_channel::Receiver<RemoteEvent>,
}

impl RemoteSubscription {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> std::result::Result<RemoteEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<RemoteEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> std::result::Result<RemoteEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// The remote document database, reduced to the primitives the atlas uses.
///
/// `write` has replace semantics: the supplied document fully overwrites any
/// existing document with the same id. `delete` of an absent id succeeds.
pub trait RemoteStore: Send + Sync {
    /// Open a subscription to a collection. The current full snapshot is
    /// delivered immediately, then again after every change.
    fn subscribe(&self, collection: &str, config: SubscriptionConfig) -> Result<RemoteSubscription>;

    /// Close a subscription. No further events are delivered afterwards.
    fn unsubscribe(&self, collection: &str, id: SubscriptionId);

    /// Replace-semantics upsert of a full document.
    fn write(&self, collection: &str, id: &str, document: Value) -> Result<()>;

    /// Delete by id. Deleting an absent id is not an error.
    fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
