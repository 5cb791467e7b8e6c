//! Trait definitions for the document store and embedding backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateNoteRequest, Note, UpdateNoteRequest};

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note storage and retrieval.
///
/// The persistence engine behind this trait is deliberately unspecified;
/// only per-call atomicity is guaranteed, no cross-call transactions.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return its id.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid>;

    /// Fetch a note by id. `Ok(None)` if it does not exist.
    async fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// List all non-trashed notes, most recently updated first.
    async fn list_active(&self) -> Result<Vec<Note>>;

    /// Apply a partial update and bump `updated_at`.
    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<()>;

    /// Replace the note's stored embedding with a fresh whole vector.
    ///
    /// Index maintenance, not an edit: `updated_at` is left untouched.
    async fn set_embedding(&self, id: Uuid, embedding: Vec<f32>) -> Result<()>;

    /// Soft-delete a note.
    async fn trash(&self, id: Uuid) -> Result<()>;

    /// Undo a soft delete.
    async fn restore(&self, id: Uuid) -> Result<()>;

    /// Permanently delete a note.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Simple case-insensitive substring filter over title and body of
    /// active notes, most recently updated first.
    ///
    /// This is the store's plain predicate filtering; ranked search lives
    /// in the search crate.
    async fn list_matching(&self, query: &str) -> Result<Vec<Note>>;
}

// =============================================================================
// EMBEDDING BACKEND
// =============================================================================

/// Backend for generating text embeddings.
///
/// Implementations wrap a concrete model (local HTTP server, in-process
/// model, test mock). Output vectors have a fixed dimension per backend.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate an embedding for the given text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
