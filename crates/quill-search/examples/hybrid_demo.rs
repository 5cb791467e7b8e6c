//! End-to-end demo: create notes, backfill embeddings, run searches.
//!
//! Runs fully offline against the deterministic mock backend. To search
//! with a real model instead, build the service with
//! `EmbeddingService::new(HttpModelLoader::from_env())` and point
//! `QUILL_EMBED_BASE` at an Ollama-style server.
//!
//! ```sh
//! cargo run -p quill-search --example hybrid_demo
//! ```

use std::sync::Arc;

use quill_db::MemoryNoteRepository;
use quill_inference::{EmbeddingService, MockEmbeddingBackend, MockModelLoader};
use quill_jobs::EmbeddingIndexer;
use quill_search::{CreateNoteRequest, HybridSearchEngine, NoteRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = Arc::new(MemoryNoteRepository::new());
    let embeddings = EmbeddingService::new(MockModelLoader::new(MockEmbeddingBackend::new()));
    embeddings.preload();

    for (title, body) in [
        (
            "Project planning notes",
            "Roadmap for the next quarter: ship the editor rewrite, then search.",
        ),
        (
            "Grocery list",
            "Milk, eggs, coffee. Also look at the project budget spreadsheet.",
        ),
        (
            "Reading log",
            "Finished the distributed systems book, started the one on typography.",
        ),
    ] {
        store
            .insert(CreateNoteRequest {
                title: title.to_string(),
                body: body.to_string(),
                is_pinned: false,
                tags: Vec::new(),
            })
            .await?;
    }

    let indexer = EmbeddingIndexer::new(store.clone(), embeddings.clone());
    let backfilled = indexer.reindex_all_missing().await?;
    println!("Backfilled {} embeddings\n", backfilled);

    let engine = HybridSearchEngine::new(store, embeddings);
    for query in ["project planning", "books to read", "coffee"] {
        let results = engine.search(query, 5).await?;
        println!("query: {:?}", query);
        for result in results {
            println!(
                "  {:.3}  [{}]  {}",
                result.score, result.match_type, result.title
            );
        }
        println!();
    }

    Ok(())
}
