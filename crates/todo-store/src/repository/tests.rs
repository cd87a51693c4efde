//! Repository Integration Tests
//!
//! Tests for TodoRepository with in-memory SQLite database.

use crate::domain::{new_todo, DomainError, NonEmptyText, TodoId};
use crate::repository::{init_db, insert_todo, Repository, TodoRepository, VersionedRepository};
use std::path::PathBuf;
use todo_sync::{ClientId, MutationToken, COMMIT_LOG_LEN};

async fn setup_test_db() -> TodoRepository {
    // Use in-memory database for tests
    let db_path = PathBuf::from(":memory:");
    let db_state = init_db(&db_path).await.expect("Failed to init test DB");
    TodoRepository::new(db_state.connection())
}

fn text(s: &str) -> NonEmptyText {
    NonEmptyText::parse(s).unwrap()
}

fn token(seq: u64) -> MutationToken {
    MutationToken::new(ClientId::from("main"), seq)
}

async fn commit_add(repo: &TodoRepository, seq: u64, s: &str) {
    let todo = new_todo(&text(s));
    repo.commit(&token(seq), move |conn| insert_todo(conn, &todo).map(|_| ()))
        .await
        .expect("Commit failed");
}

#[tokio::test]
async fn test_create_todo() {
    let repo = setup_test_db().await;

    let created = repo.create(&new_todo(&text("Test todo"))).await.expect("Failed to create");

    assert!(created.id.0 > 0);
    assert_eq!(created.text, "Test todo");
    assert!(!created.is_completed);
}

#[tokio::test]
async fn test_find_by_id() {
    let repo = setup_test_db().await;

    let created = repo.create(&new_todo(&text("Find me"))).await.expect("Failed to create");

    let found = repo.find_by_id(created.id).await.expect("Find failed");
    assert_eq!(found, Some(created));
    assert_eq!(repo.find_by_id(TodoId(404)).await.expect("Find failed"), None);
}

#[tokio::test]
async fn test_list_in_insertion_order() {
    let repo = setup_test_db().await;

    repo.create(&new_todo(&text("first"))).await.unwrap();
    repo.create(&new_todo(&text("second"))).await.unwrap();
    repo.create(&new_todo(&text("third"))).await.unwrap();

    let todos = repo.list().await.expect("List failed");
    let texts: Vec<_> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_update_todo() {
    let repo = setup_test_db().await;

    let mut created = repo.create(&new_todo(&text("Original"))).await.unwrap();
    created.is_completed = true;

    let updated = repo.update(&created).await.expect("Update failed");
    assert!(updated.is_completed);
    assert!(repo.find_by_id(created.id).await.unwrap().unwrap().is_completed);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let repo = setup_test_db().await;

    let mut ghost = new_todo(&text("ghost"));
    ghost.id = TodoId(77);
    assert_eq!(repo.update(&ghost).await, Err(DomainError::NotFound(TodoId(77))));
}

#[tokio::test]
async fn test_delete_todo() {
    let repo = setup_test_db().await;

    let created = repo.create(&new_todo(&text("To delete"))).await.unwrap();
    repo.delete(created.id).await.expect("Delete failed");

    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    assert_eq!(repo.delete(created.id).await, Err(DomainError::NotFound(created.id)));
}

#[tokio::test]
async fn test_commit_bumps_version_and_logs_token() {
    let repo = setup_test_db().await;
    assert_eq!(repo.current_version().await.unwrap(), 0);

    commit_add(&repo, 0, "a").await;
    commit_add(&repo, 1, "b").await;

    assert_eq!(repo.current_version().await.unwrap(), 2);
    let snapshot = repo.snapshot().await.unwrap();
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.todos.len(), 2);
    assert_eq!(snapshot.applied, [token(0), token(1)]);
}

#[tokio::test]
async fn test_failed_commit_leaves_nothing_behind() {
    let repo = setup_test_db().await;

    let result = repo
        .commit(&token(0), |conn| {
            insert_todo(conn, &new_todo(&text("half written")))?;
            Err(DomainError::Internal("later step failed".to_string()))
        })
        .await;
    assert_eq!(result, Err(DomainError::Internal("later step failed".to_string())));

    let snapshot = repo.snapshot().await.unwrap();
    assert_eq!(snapshot.version, 0);
    assert!(snapshot.todos.is_empty());
    assert!(snapshot.applied.is_empty());
}

#[tokio::test]
async fn test_commit_log_keeps_latest_tokens() {
    let repo = setup_test_db().await;

    for seq in 0..=COMMIT_LOG_LEN as u64 {
        commit_add(&repo, seq, "todo").await;
    }

    let snapshot = repo.snapshot().await.unwrap();
    assert_eq!(snapshot.applied.len(), COMMIT_LOG_LEN);
    assert_eq!(snapshot.applied.first(), Some(&token(1)));
    assert_eq!(snapshot.applied.last(), Some(&token(COMMIT_LOG_LEN as u64)));
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    let first = TodoRepository::new(init_db(&path).await.unwrap().connection());
    commit_add(&first, 0, "persisted").await;
    drop(first);

    let reopened = TodoRepository::new(init_db(&path).await.unwrap().connection());
    let snapshot = reopened.snapshot().await.unwrap();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.todos[0].text, "persisted");
    // tokens belong to clients of the previous run
    assert!(snapshot.applied.is_empty());
}
