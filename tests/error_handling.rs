//! Error handling and edge case tests.

use std::sync::Arc;
use std::time::Duration;
use village_atlas::{
    count_statuses, AtlasError, EditCoordinator, MemoryRemote, RemoteDocument, RemoteStore, Status,
    Village, VillageId, VillageStore,
};

use serde_json::json;

fn setup() -> (Arc<MemoryRemote>, VillageStore, EditCoordinator) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let remote = Arc::new(MemoryRemote::new());
    let store = VillageStore::new(Arc::clone(&remote) as Arc<dyn RemoteStore>, "villages");
    store.subscribe().unwrap();
    store.pump();
    let edits = EditCoordinator::new(Arc::clone(&remote) as Arc<dyn RemoteStore>, "villages");
    (remote, store, edits)
}

// --- Write/Delete Failures ---

#[test]
fn test_failed_write_leaves_mirror_untouched_and_is_retryable() {
    let (remote, store, edits) = setup();

    let mut village = Village::new("Alpha", [1.0, 2.0]);
    village.id = VillageId::new("1");

    remote.set_fail_writes(true);
    let err = edits.save(&store, village.clone()).unwrap_err();
    match err {
        AtlasError::WriteFailed { id, .. } => assert_eq!(id, "1"),
        other => panic!("expected WriteFailed, got {:?}", other),
    }

    // No optimistic mutation happened, so nothing to roll back.
    store.pump();
    assert!(store.is_empty());

    // Manual retry succeeds once the remote recovers.
    remote.set_fail_writes(false);
    edits.save(&store, village).unwrap();
    store.pump();
    assert!(store.contains(&VillageId::new("1")));
}

#[test]
fn test_failed_delete_keeps_record_visible() {
    let (remote, store, edits) = setup();

    let mut village = Village::new("Alpha", [1.0, 2.0]);
    village.id = VillageId::new("1");
    edits.save(&store, village).unwrap();
    store.pump();

    remote.set_fail_writes(true);
    let err = edits.remove(&VillageId::new("1")).unwrap_err();
    assert!(matches!(err, AtlasError::DeleteFailed { .. }));

    store.pump();
    assert!(store.contains(&VillageId::new("1")));
}

// --- Connectivity ---

#[test]
fn test_connectivity_error_serves_stale_data() {
    let (remote, store, edits) = setup();

    let mut village = Village::new("Alpha", [1.0, 2.0]);
    village.id = VillageId::new("1");
    edits.save(&store, village).unwrap();
    store.pump();

    remote.emit_connection_error("villages", "backend unreachable");
    store.pump();

    // Mirror unchanged, error surfaced exactly once.
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.take_last_error().as_deref(),
        Some("backend unreachable")
    );
    assert_eq!(store.take_last_error(), None);
}

#[test]
fn test_unsubscribed_store_receives_nothing() {
    let (remote, store, edits) = setup();

    store.unsubscribe();
    let mut village = Village::new("Alpha", [1.0, 2.0]);
    village.id = VillageId::new("1");
    edits.save(&store, village).unwrap();

    assert_eq!(store.pump(), 0);
    assert!(!store.wait_for_snapshot(Duration::from_millis(50)));
    assert!(store.is_empty());
    assert_eq!(remote.subscriber_count("villages"), 0);
}

#[test]
fn test_write_after_teardown_still_reaches_remote() {
    let (remote, store, edits) = setup();
    store.unsubscribe();

    // Fire-and-forget: teardown does not cancel edits.
    let mut village = Village::new("Alpha", [1.0, 2.0]);
    village.id = VillageId::new("1");
    edits.save(&store, village).unwrap();

    assert_eq!(remote.documents("villages").len(), 1);
}

// --- Malformed Remote Data ---

#[test]
fn test_unrecognized_status_degrades_not_crashes() {
    let (remote, store, _) = setup();

    remote.seed(
        "villages",
        vec![
            RemoteDocument::new("1", json!({"name": "Alpha", "status": "wip", "coords": [1.0, 2.0]})),
            RemoteDocument::new("2", json!({"name": "Beta", "status": "visited", "coords": [3.0, 4.0]})),
        ],
    );
    store.pump();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].status, Status::Unknown);

    let counts = count_statuses(&snapshot);
    assert_eq!(counts.total, 2);
    assert_eq!(counts.visited, 1);
    assert_eq!(counts.unknown(), 1);
}

#[test]
fn test_invalid_coordinates_excluded_from_map_only() {
    let (remote, store, _) = setup();

    remote.seed(
        "villages",
        vec![
            RemoteDocument::new("1", json!({"name": "Alpha", "status": "visited"})),
            RemoteDocument::new(
                "2",
                json!({"name": "Beta", "status": "planned", "coords": [3.0, 4.0]}),
            ),
        ],
    );
    store.pump();

    let snapshot = store.snapshot();
    // Both records are in the mirror and count toward stats...
    assert_eq!(count_statuses(&snapshot).total, 2);
    // ...but only one is renderable on the map.
    let on_map: Vec<&Village> = snapshot
        .iter()
        .filter(|v| v.map_position().is_some())
        .collect();
    assert_eq!(on_map.len(), 1);
    assert_eq!(on_map[0].id, VillageId::new("2"));
}

#[test]
fn test_coordless_record_survives_edit_roundtrip() {
    let (remote, store, edits) = setup();

    remote.seed(
        "villages",
        vec![RemoteDocument::new(
            "1",
            json!({"name": "Alpha", "status": "planned"}),
        )],
    );
    store.pump();

    // Edit the record without touching its (absent) position.
    let mut village = store.get(&VillageId::new("1")).unwrap();
    assert!(village.map_position().is_none());
    village.status = Status::Visited;
    edits.save(&store, village).unwrap();
    store.pump();

    // Still mirrored, still off the map, with the edit applied.
    let mirrored = store.get(&VillageId::new("1")).unwrap();
    assert_eq!(mirrored.status, Status::Visited);
    assert!(mirrored.map_position().is_none());
    assert_eq!(count_statuses(&store.snapshot()).total, 1);
}

#[test]
fn test_garbage_document_skipped_rest_of_snapshot_applies() {
    let (remote, store, _) = setup();

    remote.seed(
        "villages",
        vec![
            RemoteDocument::new("junk", json!(42)),
            RemoteDocument::new("1", json!({"name": "Alpha", "coords": [1.0, 2.0]})),
        ],
    );
    store.pump();

    assert_eq!(store.len(), 1);
    assert!(store.contains(&VillageId::new("1")));
}
