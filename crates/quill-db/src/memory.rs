//! In-memory note repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use quill_core::{CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest};

/// In-memory [`NoteRepository`] backed by a `HashMap` behind an async lock.
///
/// Cloning is cheap and shares the underlying map. Each trait call takes
/// the lock once, so individual calls are atomic; there are no cross-call
/// transactions.
#[derive(Clone, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl MemoryNoteRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes held, trashed ones included.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    /// Whether the store holds no notes at all.
    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

fn sort_recent_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let note = Note {
            id,
            title: req.title,
            body: req.body,
            created_at: now,
            updated_at: now,
            trashed_at: None,
            is_pinned: req.is_pinned,
            tags: req.tags,
            embedding: None,
        };
        self.notes.write().await.insert(id, note);
        debug!(subsystem = "db", note_id = %id, "Inserted note");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .read()
            .await
            .values()
            .filter(|n| n.is_active())
            .cloned()
            .collect();
        sort_recent_first(&mut notes);
        Ok(notes)
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;

        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(body) = req.body {
            note.body = body;
        }
        if let Some(is_pinned) = req.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(tags) = req.tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();
        Ok(())
    }

    async fn set_embedding(&self, id: Uuid, embedding: Vec<f32>) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        note.embedding = Some(embedding);
        Ok(())
    }

    async fn trash(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        let now = Utc::now();
        note.trashed_at = Some(now);
        note.updated_at = now;
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes.get_mut(&id).ok_or(Error::NoteNotFound(id))?;
        note.trashed_at = None;
        note.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.notes
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list_matching(&self, query: &str) -> Result<Vec<Note>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut notes: Vec<Note> = self
            .notes
            .read()
            .await
            .values()
            .filter(|n| {
                n.is_active()
                    && (n.title.to_lowercase().contains(&needle)
                        || n.body.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        sort_recent_first(&mut notes);
        Ok(notes)
    }
}
