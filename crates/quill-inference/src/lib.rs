//! # quill-inference
//!
//! Embedding backend abstraction for quill.
//!
//! This crate provides:
//! - [`EmbeddingService`]: the embedding provider consumed by search and
//!   indexing, with single-flight model loading, input truncation, output
//!   normalization, and graceful degradation on failure
//! - [`HttpEmbeddingBackend`]: an Ollama-style HTTP backend (default)
//! - [`mock`]: a deterministic backend and loader for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use quill_inference::{EmbeddingService, HttpModelLoader};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = EmbeddingService::new(HttpModelLoader::from_env());
//!     service.preload();
//!
//!     let vector = service.embed("morning pages").await;
//!     assert!(vector.is_empty() || vector.len() == 384);
//! }
//! ```

pub mod http;
pub mod mock;
pub mod service;

// Re-export core types
pub use quill_core::*;

pub use http::{HttpEmbeddingBackend, HttpModelLoader};
pub use mock::{MockEmbeddingBackend, MockModelLoader};
pub use service::{EmbeddingService, LoadState, ModelLoader};
