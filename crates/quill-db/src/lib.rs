//! # quill-db
//!
//! Document store layer for quill.
//!
//! This crate provides the reference [`NoteRepository`] implementation: an
//! in-memory map behind an async lock. The store boundary is deliberately
//! narrow (CRUD plus simple predicate filtering) so a persistent engine
//! can replace it without touching the search or indexing crates.
//!
//! ## Example
//!
//! ```rust
//! use quill_db::MemoryNoteRepository;
//! use quill_core::{CreateNoteRequest, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryNoteRepository::new();
//!
//!     let note_id = store.insert(CreateNoteRequest {
//!         title: "Hello".to_string(),
//!         body: "First note".to_string(),
//!         is_pinned: false,
//!         tags: vec![],
//!     }).await?;
//!
//!     let note = store.get(note_id).await?.expect("just inserted");
//!     assert_eq!(note.title, "Hello");
//!     Ok(())
//! }
//! ```

pub mod memory;

// Re-export core types
pub use quill_core::*;

pub use memory::MemoryNoteRepository;
