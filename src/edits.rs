//! Mediates create/update/delete against the remote store.
//!
//! Edits deliberately do not touch the local mirror. A successful write is
//! acknowledged immediately; the mirror refreshes asynchronously when the
//! next subscription snapshot arrives. This keeps the remote store the
//! single source of truth and means a failed edit needs no rollback: the
//! view simply keeps showing pre-edit data.
//!
//! Each operation runs `idle -> pending (call in flight) -> resolved |
//! failed`; there is no automatic retry, the caller re-invokes to retry.
//! Concurrent edits to the same record race at the remote store, last write
//! wins.

use crate::error::{AtlasError, Result};
use crate::remote::RemoteStore;
use crate::store::VillageStore;
use crate::types::{Village, VillageId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Acknowledged outcome of an edit operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Created(VillageId),
    Updated(VillageId),
    Deleted(VillageId),
}

impl EditOutcome {
    pub fn id(&self) -> &VillageId {
        match self {
            EditOutcome::Created(id) | EditOutcome::Updated(id) | EditOutcome::Deleted(id) => id,
        }
    }
}

/// Coordinates edits against one remote collection.
pub struct EditCoordinator {
    remote: Arc<dyn RemoteStore>,
    collection: String,
    /// Disambiguates ids generated within the same microsecond.
    id_counter: AtomicU64,
}

impl EditCoordinator {
    pub fn new(remote: Arc<dyn RemoteStore>, collection: impl Into<String>) -> Self {
        Self {
            remote,
            collection: collection.into(),
            id_counter: AtomicU64::new(0),
        }
    }

    /// Save a village: a create if its id is unassigned or absent from the
    /// mirror, otherwise an update. Either way the remote receives a full
    /// document replace keyed by the id.
    ///
    /// On failure the mirror is untouched and the error carries the id and
    /// the remote's reason; retry by calling again.
    pub fn save(&self, store: &VillageStore, mut village: Village) -> Result<EditOutcome> {
        if village.id.is_unassigned() {
            village.id = self.generate_id(store);
        }
        let creating = !store.contains(&village.id);

        let document = serde_json::to_value(&village)?;
        self.remote
            .write(&self.collection, village.id.as_str(), document)
            .map_err(|e| AtlasError::WriteFailed {
                id: village.id.to_string(),
                reason: e.to_string(),
            })?;

        debug!(id = %village.id, creating, "village write acknowledged");
        Ok(if creating {
            EditOutcome::Created(village.id)
        } else {
            EditOutcome::Updated(village.id)
        })
    }

    /// Delete a village by id. The mirror drops the record on the next
    /// snapshot.
    pub fn remove(&self, id: &VillageId) -> Result<EditOutcome> {
        self.remote
            .delete(&self.collection, id.as_str())
            .map_err(|e| AtlasError::DeleteFailed {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        debug!(%id, "village delete acknowledged");
        Ok(EditOutcome::Deleted(id.clone()))
    }

    /// Bulk-seed the collection, saving each record in order. Fails fast on
    /// the first rejected write; returns the number saved.
    pub fn import(&self, store: &VillageStore, villages: Vec<Village>) -> Result<usize> {
        let mut saved = 0;
        for village in villages {
            self.save(store, village)?;
            saved += 1;
        }
        Ok(saved)
    }

    /// Generate a process-unique id: microsecond timestamp plus a counter,
    /// re-rolled while it collides with an id already in the mirror. The
    /// remote store owns permanent identity from then on.
    fn generate_id(&self, store: &VillageStore) -> VillageId {
        loop {
            let micros = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_micros())
                .unwrap_or_default();
            let n = self.id_counter.fetch_add(1, Ordering::Relaxed);
            let id = VillageId::new(format!("v{micros}-{n}"));
            if !store.contains(&id) {
                return id;
            }
        }
    }
}
