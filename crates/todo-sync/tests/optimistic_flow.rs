//! End-to-end behaviour of the coordinator against the in-process store.

use chrono::{Duration, Utc};
use todo_sync::{
    ClientId, Coordinator, CoordinatorConfig, MemoryStore, MutationToken, NonEmptyText, RowKey,
    SyncError, TodoBackend, TodoId, ViewRow,
};

fn connected_as(store: &MemoryStore, client: &str) -> Coordinator<MemoryStore> {
    let config = CoordinatorConfig {
        client: ClientId::from(client),
        ..Default::default()
    };
    let coordinator = Coordinator::new(store.clone(), store.snapshot(), config);
    coordinator.connect(store);
    coordinator
}

fn connected(store: &MemoryStore) -> Coordinator<MemoryStore> {
    connected_as(store, "main")
}

/// Token of a write made by some other window
fn elsewhere(seq: u64) -> MutationToken {
    MutationToken::new(ClientId::from("elsewhere"), seq)
}

fn texts(rows: &[ViewRow]) -> Vec<String> {
    rows.iter().map(|r| r.text.clone()).collect()
}

fn stored_id(coordinator: &Coordinator<MemoryStore>, text: &str) -> TodoId {
    coordinator
        .rows()
        .iter()
        .find(|r| r.text == text)
        .and_then(|r| r.key.stored())
        .expect("row should be stored")
}

#[tokio::test]
async fn test_toggle_twice_restores_original() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    coordinator.add_todo("water plants").unwrap().await.unwrap();
    let id = stored_id(&coordinator, "water plants");

    coordinator.toggle_todo(id).await.unwrap();
    assert!(coordinator.rows()[0].is_completed);
    coordinator.toggle_todo(id).await.unwrap();
    assert!(!coordinator.rows()[0].is_completed);
    assert!(!store.snapshot().todos[0].is_completed);
}

#[tokio::test]
async fn test_optimistic_add_round_trip() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    store.hold_delivery();

    let dispatch = coordinator.add_todo("buy milk").unwrap();
    let rows = coordinator.rows();
    assert_eq!(texts(&rows), ["buy milk"]);
    assert!(!rows[0].is_completed);
    assert!(rows[0].key.is_pending());

    // committed, but the live query has not caught up yet
    dispatch.await.unwrap();
    assert!(coordinator.rows()[0].key.is_pending());
    assert_eq!(coordinator.pending_count(), 1);

    store.release_delivery();
    let rows = coordinator.rows();
    assert_eq!(texts(&rows), ["buy milk"]);
    assert_eq!(rows[0].key, RowKey::Stored(store.snapshot().todos[0].id));
    assert_eq!(coordinator.pending_count(), 0);
}

#[tokio::test]
async fn test_rejected_toggle_rolls_back() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    coordinator.add_todo("a").unwrap().await.unwrap();
    let id = stored_id(&coordinator, "a");

    // another client deletes it, but we have not heard about it yet
    store.hold_delivery();
    store.remove_todo(&elsewhere(0), id).await.unwrap();
    let before = coordinator.rows();

    let dispatch = coordinator.toggle_todo(id);
    assert!(coordinator.rows()[0].is_completed);

    assert_eq!(dispatch.await, Err(SyncError::NotFound(id)));
    assert_eq!(coordinator.rows(), before);
    assert_eq!(coordinator.pending_count(), 0);

    store.release_delivery();
    assert!(coordinator.rows().is_empty());
}

#[tokio::test]
async fn test_remove_of_concurrently_deleted_reports_not_found() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    coordinator.add_todo("a").unwrap().await.unwrap();
    let id = stored_id(&coordinator, "a");

    store.hold_delivery();
    store.remove_todo(&elsewhere(0), id).await.unwrap();

    let result = coordinator.remove_todo(id).await;
    assert_eq!(result, Err(SyncError::NotFound(id)));
}

#[tokio::test]
async fn test_adds_keep_issue_order() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);

    let a = coordinator.add_todo("a").unwrap();
    let b = coordinator.add_todo("b").unwrap();
    assert_eq!(texts(&coordinator.rows()), ["a", "b"]);

    a.await.unwrap();
    b.await.unwrap();
    assert_eq!(texts(&coordinator.rows()), ["a", "b"]);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.todos[0].text, "a");
    assert_eq!(snapshot.todos[1].text, "b");
}

#[tokio::test]
async fn test_blank_add_never_dispatches() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);

    let result = coordinator.add_todo("   ");
    assert!(matches!(result, Err(SyncError::Validation(_))));
    assert!(coordinator.rows().is_empty());
    assert_eq!(coordinator.pending_count(), 0);
    assert_eq!(store.request_count(), 0);
}

#[tokio::test]
async fn test_two_clients_converge() {
    let store = MemoryStore::new();
    let first = connected_as(&store, "main");
    let second = connected_as(&store, "todo-1");

    first.add_todo("from first").unwrap().await.unwrap();
    second.add_todo("from second").unwrap().await.unwrap();
    let id = stored_id(&second, "from first");
    second.toggle_todo(id).await.unwrap();

    assert_eq!(first.rows(), second.rows());
    assert_eq!(first.authoritative(), store.snapshot());
    assert_eq!(second.authoritative(), store.snapshot());
    assert_eq!(first.active_count(), 1);
}

#[tokio::test]
async fn test_connectivity_failure_rolls_back() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    store.set_offline(true);

    let dispatch = coordinator.add_todo("offline").unwrap();
    assert_eq!(coordinator.rows().len(), 1);
    assert!(matches!(dispatch.await, Err(SyncError::Connectivity(_))));
    assert!(coordinator.rows().is_empty());

    store.set_offline(false);
    coordinator.add_todo("online").unwrap().await.unwrap();
    assert_eq!(texts(&coordinator.rows()), ["online"]);
}

#[tokio::test]
async fn test_unconfirmed_patch_expires() {
    let store = MemoryStore::new();
    let coordinator = Coordinator::new(
        store.clone(),
        store.snapshot(),
        CoordinatorConfig {
            confirm_timeout: Duration::seconds(5),
            ..Default::default()
        },
    );
    coordinator.connect(&store);

    // issued but never dispatched: the confirmation never arrives
    let _dispatch = coordinator.add_todo("lost").unwrap();
    assert!(coordinator.expire_stale(Utc::now()).is_empty());

    let errors = coordinator.expire_stale(Utc::now() + Duration::seconds(6));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SyncError::Connectivity(_)));
    assert!(coordinator.rows().is_empty());
}

#[tokio::test]
async fn test_resubscribe_gets_fresh_snapshot() {
    let store = MemoryStore::new();
    let coordinator = connected(&store);
    coordinator.disconnect();

    store
        .add_todo(&elsewhere(0), &NonEmptyText::parse("while away").unwrap())
        .await
        .unwrap();
    assert!(coordinator.rows().is_empty());

    coordinator.connect(&store);
    assert_eq!(texts(&coordinator.rows()), ["while away"]);
}

#[tokio::test]
async fn test_interleaved_clients_with_equal_sequence_numbers() {
    let store = MemoryStore::new();
    let first = connected_as(&store, "main");
    let second = connected_as(&store, "todo-1");
    store.hold_delivery();

    // both clients issue their first mutation (seq 0)
    let from_first = first.add_todo("from first").unwrap();
    let from_second = second.add_todo("from second").unwrap();
    from_first.await.unwrap();
    from_second.await.unwrap();

    store.release_delivery();
    assert_eq!(texts(&first.rows()), ["from first", "from second"]);
    assert_eq!(first.rows(), second.rows());
    assert_eq!(first.pending_count(), 0);
    assert_eq!(second.pending_count(), 0);
}

