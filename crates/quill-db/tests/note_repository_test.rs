//! Integration tests for the in-memory note repository.

use quill_core::{CreateNoteRequest, NoteRepository, UpdateNoteRequest};
use quill_db::MemoryNoteRepository;

fn req(title: &str, body: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        title: title.to_string(),
        body: body.to_string(),
        is_pinned: false,
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn test_update_applies_partial_fields_and_bumps_updated_at() {
    let store = MemoryNoteRepository::new();
    let id = store.insert(req("Old title", "Old body")).await.unwrap();
    let before = store.get(id).await.unwrap().unwrap();

    store
        .update(
            id,
            UpdateNoteRequest {
                title: Some("New title".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = store.get(id).await.unwrap().unwrap();
    assert_eq!(after.title, "New title");
    assert_eq!(after.body, "Old body");
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn test_set_embedding_replaces_vector_without_touching_updated_at() {
    let store = MemoryNoteRepository::new();
    let id = store.insert(req("Note", "text")).await.unwrap();
    let before = store.get(id).await.unwrap().unwrap();

    store.set_embedding(id, vec![0.1, 0.2, 0.3]).await.unwrap();
    store.set_embedding(id, vec![0.4, 0.5, 0.6]).await.unwrap();

    let after = store.get(id).await.unwrap().unwrap();
    assert_eq!(after.embedding, Some(vec![0.4, 0.5, 0.6]));
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_trash_hides_from_list_active_and_restore_returns_it() {
    let store = MemoryNoteRepository::new();
    let id = store.insert(req("Ephemeral", "")).await.unwrap();
    assert_eq!(store.list_active().await.unwrap().len(), 1);

    store.trash(id).await.unwrap();
    assert!(store.list_active().await.unwrap().is_empty());
    // Still present, just soft-deleted
    assert!(store.get(id).await.unwrap().is_some());

    store.restore(id).await.unwrap();
    assert_eq!(store.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let store = MemoryNoteRepository::new();
    let id = store.insert(req("Gone", "")).await.unwrap();
    store.delete(id).await.unwrap();
    assert!(store.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_active_orders_most_recently_updated_first() {
    let store = MemoryNoteRepository::new();
    let first = store.insert(req("First", "")).await.unwrap();
    let _second = store.insert(req("Second", "")).await.unwrap();

    // Touch the older note so it moves to the front.
    store
        .update(
            first,
            UpdateNoteRequest {
                body: Some("edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let notes = store.list_active().await.unwrap();
    assert_eq!(notes[0].id, first);
}

#[tokio::test]
async fn test_list_matching_filters_by_title_or_body() {
    let store = MemoryNoteRepository::new();
    store
        .insert(req("Meeting notes", "quarterly review"))
        .await
        .unwrap();
    store
        .insert(req("Groceries", "milk, eggs, rust crates"))
        .await
        .unwrap();
    let trashed = store.insert(req("Old meeting", "stale")).await.unwrap();
    store.trash(trashed).await.unwrap();

    let hits = store.list_matching("MEETING").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Meeting notes");

    let hits = store.list_matching("rust").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Groceries");

    assert!(store.list_matching("   ").await.unwrap().is_empty());
}
