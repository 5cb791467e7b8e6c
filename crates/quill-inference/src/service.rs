//! Embedding service with single-flight model loading.
//!
//! The service is an explicit object passed by handle to every consumer;
//! there is no process-global state. The backend behind it is produced at
//! most once per service: concurrent callers that arrive while the model
//! is loading all await the same in-flight load future, and callers that
//! arrive after a successful load take the read-mostly fast path.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use quill_core::{defaults, EmbeddingBackend, Result};

/// Loader for the (possibly expensive) embedding backend.
///
/// Called at most once per successful load; a failed load may be retried
/// by a later caller.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>>;
}

/// Observable lifecycle of the backing model.
///
/// Transitions monotonically `Uninitialized` → `Loading` → `Ready`;
/// there is no teardown or reset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

/// The load future is shared between waiters, so its output must be
/// cloneable; errors travel as strings and are reconstructed at the edge.
type LoadOutcome = std::result::Result<Arc<dyn EmbeddingBackend>, String>;
type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

/// Embedding provider consumed by search and index maintenance.
///
/// `embed` never fails: empty input, a failed load, and a failed backend
/// call all degrade to the empty vector, which downstream code treats as
/// "unindexed". Cloning shares the underlying model handle.
#[derive(Clone)]
pub struct EmbeddingService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    loader: Arc<dyn ModelLoader>,
    /// Read-mostly after a successful load.
    ready: RwLock<Option<Arc<dyn EmbeddingBackend>>>,
    /// The single in-flight load, if any. Cleared once it settles.
    in_flight: Mutex<Option<SharedLoad>>,
    char_budget: usize,
}

impl EmbeddingService {
    /// Create a service with the default character budget.
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self::with_char_budget(loader, defaults::EMBED_CHAR_BUDGET)
    }

    /// Create a service with a custom truncation budget.
    pub fn with_char_budget(loader: impl ModelLoader + 'static, char_budget: usize) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                loader: Arc::new(loader),
                ready: RwLock::new(None),
                in_flight: Mutex::new(None),
                char_budget,
            }),
        }
    }

    /// Wrap an already-constructed backend. The first `embed` call still
    /// goes through the single-flight path, but the load is trivial.
    pub fn with_backend(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self::new(ReadyLoader(backend))
    }

    /// Current lifecycle state of the backing model.
    pub async fn load_state(&self) -> LoadState {
        if self.inner.ready.read().await.is_some() {
            return LoadState::Ready;
        }
        if self.inner.in_flight.lock().await.is_some() {
            LoadState::Loading
        } else {
            LoadState::Uninitialized
        }
    }

    /// Kick off the model load on a background task without blocking.
    ///
    /// Callers that arrive while the speculative load is running join it
    /// rather than starting another.
    pub fn preload(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(error) = service.backend().await {
                debug!(
                    subsystem = "inference",
                    error = %error,
                    "Speculative model load failed"
                );
            }
        });
    }

    /// Embed a text, degrading to the empty vector on any failure.
    ///
    /// Empty or whitespace-only input returns immediately without touching
    /// the model. Longer inputs are clipped to the character budget, so
    /// callers must not assume the full text was embedded. The output is
    /// L2-normalized.
    #[instrument(
        skip(self, text),
        fields(subsystem = "inference", component = "embedding_service", op = "embed")
    )]
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let backend = match self.backend().await {
            Ok(backend) => backend,
            Err(error) => {
                warn!(error = %error, "Embedding model unavailable, degrading to unindexed");
                return Vec::new();
            }
        };

        let clipped = truncate_chars(text, self.inner.char_budget);
        match backend.embed_text(clipped).await {
            Ok(vector) => normalize(vector),
            Err(error) => {
                warn!(
                    error = %error,
                    model = backend.model_name(),
                    "Embedding request failed, degrading to unindexed"
                );
                Vec::new()
            }
        }
    }

    /// Resolve the backend, loading it if necessary (single-flight).
    async fn backend(&self) -> LoadOutcome {
        if let Some(backend) = self.inner.ready.read().await.clone() {
            return Ok(backend);
        }

        let load = {
            let mut in_flight = self.inner.in_flight.lock().await;
            // Re-check under the lock: a load may have settled while we
            // waited for it.
            if let Some(backend) = self.inner.ready.read().await.clone() {
                return Ok(backend);
            }
            match in_flight.as_ref() {
                Some(shared) => shared.clone(),
                None => {
                    let loader = Arc::clone(&self.inner.loader);
                    let shared = async move { loader.load().await.map_err(|e| e.to_string()) }
                        .boxed()
                        .shared();
                    *in_flight = Some(shared.clone());
                    shared
                }
            }
        };

        let outcome = load.await;

        let mut in_flight = self.inner.in_flight.lock().await;
        if let Ok(backend) = &outcome {
            *self.inner.ready.write().await = Some(Arc::clone(backend));
        }
        // On failure the slot is simply cleared, so a later caller may
        // retry; everyone who raced this attempt shares its outcome.
        *in_flight = None;
        outcome
    }
}

/// Trivial loader around a pre-built backend.
struct ReadyLoader(Arc<dyn EmbeddingBackend>);

#[async_trait]
impl ModelLoader for ReadyLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>> {
        Ok(Arc::clone(&self.0))
    }
}

/// Clip to at most `budget` characters, respecting char boundaries.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Scale to unit L2 norm. A zero vector is returned unchanged.
fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_clips_to_budget() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "héllö wörld";
        let clipped = truncate_chars(text, 4);
        assert_eq!(clipped, "héll");
        assert_eq!(clipped.chars().count(), 4);
    }

    #[test]
    fn test_normalize_produces_unit_norm() {
        let v = normalize(vec![3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        assert_eq!(normalize(vec![0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
        assert!(normalize(Vec::new()).is_empty());
    }
}
