//! # quill-core
//!
//! Core types, traits, and abstractions for the quill note library.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other quill crates depend on: the note model,
//! the error taxonomy, the document-store and embedding-backend seams,
//! tuning defaults, and the structured-logging field schema.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{CreateNoteRequest, MatchType, Note, SearchResult, UpdateNoteRequest};
pub use traits::{EmbeddingBackend, NoteRepository};
