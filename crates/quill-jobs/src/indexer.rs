//! Embedding index maintainer.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use quill_core::{Error, NoteRepository, Result};
use quill_inference::EmbeddingService;

/// Keeps stored note embeddings in sync with note text.
///
/// Reindex operations are serialized through an internal lock so no two
/// of them can race on the same note; searches are unaffected and simply
/// see the old vector (or none) until a pass completes.
pub struct EmbeddingIndexer {
    store: Arc<dyn NoteRepository>,
    embeddings: EmbeddingService,
    reindex_gate: Mutex<()>,
}

impl EmbeddingIndexer {
    /// Create an indexer over a store and an embedding service.
    pub fn new(store: Arc<dyn NoteRepository>, embeddings: EmbeddingService) -> Self {
        Self {
            store,
            embeddings,
            reindex_gate: Mutex::new(()),
        }
    }

    /// Regenerate the embedding for one note.
    ///
    /// Returns `Ok(true)` when a fresh vector was written. No-ops
    /// (`Ok(false)`): the note is missing, it has no text to embed, or
    /// the embedding is unavailable, leaving the note unindexed.
    /// Idempotent for unchanged text. Store failures propagate.
    #[instrument(
        skip(self),
        fields(subsystem = "jobs", component = "indexer", op = "reindex_one", note_id = %id)
    )]
    pub async fn reindex_one(&self, id: Uuid) -> Result<bool> {
        let _gate = self.reindex_gate.lock().await;

        let note = match self.store.get(id).await? {
            Some(note) => note,
            None => {
                debug!("Note missing, nothing to reindex");
                return Ok(false);
            }
        };

        let source = note.embedding_source();
        if source.is_empty() {
            debug!("Note has no text, leaving unindexed");
            return Ok(false);
        }

        let vector = self.embeddings.embed(&source).await;
        if vector.is_empty() {
            debug!("Embedding unavailable, leaving unindexed");
            return Ok(false);
        }

        match self.store.set_embedding(id, vector).await {
            Ok(()) => Ok(true),
            // Deleted between read and write; the next pass will skip it.
            Err(Error::NoteNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Backfill embeddings for every active note that has none.
    ///
    /// Notes are processed sequentially; the returned count is the number
    /// of notes processed, whether or not each ended up indexed. Safe to
    /// run while searches are in flight: reads of still-missing vectors
    /// fall back to keyword ranking.
    #[instrument(
        skip(self),
        fields(subsystem = "jobs", component = "indexer", op = "reindex_all_missing")
    )]
    pub async fn reindex_all_missing(&self) -> Result<usize> {
        let notes = self.store.list_active().await?;

        let mut processed = 0;
        for note in notes.into_iter().filter(|n| !n.is_indexed()) {
            self.reindex_one(note.id).await?;
            processed += 1;
        }

        info!(result_count = processed, "Embedding backfill complete");
        Ok(processed)
    }
}
