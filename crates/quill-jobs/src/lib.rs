//! # quill-jobs
//!
//! Embedding index maintenance for quill.
//!
//! Keeps each note's stored embedding synchronized with its current text:
//! reindex a single note after an edit, or backfill every unindexed note
//! in one pass. Trigger wiring is the surrounding application's concern;
//! nothing here subscribes to change events.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quill_db::MemoryNoteRepository;
//! use quill_inference::{EmbeddingService, MockEmbeddingBackend, MockModelLoader};
//! use quill_jobs::EmbeddingIndexer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryNoteRepository::new());
//!     let embeddings = EmbeddingService::new(MockModelLoader::new(MockEmbeddingBackend::new()));
//!
//!     let indexer = EmbeddingIndexer::new(store, embeddings);
//!     let backfilled = indexer.reindex_all_missing().await?;
//!     assert_eq!(backfilled, 0);
//!     Ok(())
//! }
//! ```

pub mod indexer;

// Re-export core types
pub use quill_core::*;

pub use indexer::EmbeddingIndexer;
