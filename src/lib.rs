//! # Village Atlas
//!
//! The synchronization and query core behind a village-visit tracker: a
//! live in-memory mirror of a remote document collection, pure
//! filtering/sorting and stats over that mirror, and an edit coordinator
//! for create/update/delete.
//!
//! ## Core Concepts
//!
//! - **Mirror**: [`VillageStore`] subscribes to the remote collection and
//!   replaces its snapshot on every delivery; consumers read immutable
//!   `Arc` snapshots
//! - **Derivations**: filtering, directory search, and status counts are
//!   pure functions over a snapshot
//! - **Edits**: [`EditCoordinator`] writes through to the remote store and
//!   lets the mirror refresh from the next snapshot, avoiding a second
//!   source of truth
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use village_atlas::{
//!     EditCoordinator, MemoryRemote, StatusFilter, Village, VillageStore,
//!     filter_villages,
//! };
//!
//! let remote = Arc::new(MemoryRemote::new());
//! let store = VillageStore::new(remote.clone(), "villages");
//! store.subscribe()?;
//!
//! let edits = EditCoordinator::new(remote, "villages");
//! edits.save(&store, Village::new("Alpha", [22.68, 77.26]))?;
//!
//! store.pump();
//! let visible = filter_villages(&store.snapshot(), "alp", StatusFilter::All);
//! ```

pub mod edits;
pub mod error;
pub mod export;
pub mod geocode;
pub mod query;
pub mod remote;
pub mod stats;
pub mod store;
pub mod types;

// Re-exports
pub use edits::{EditCoordinator, EditOutcome};
pub use error::{AtlasError, Result};
pub use export::export_csv;
pub use geocode::{external_marker, FixedGeocoder, Geocoder};
pub use query::{
    directory_search, filter_villages, marked_dates, recent_activity, SortKey, StatusFilter,
};
pub use remote::{
    DropReason, MemoryRemote, RemoteDocument, RemoteEvent, RemoteStore, RemoteSubscription,
    SubscriptionConfig, SubscriptionId,
};
pub use stats::{count_statuses, StatusCounts};
pub use store::VillageStore;
pub use types::{Contact, Status, Village, VillageId};
