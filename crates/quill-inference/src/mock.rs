//! Mock embedding backend and loader for deterministic testing.
//!
//! The backend derives stable pseudo-random vectors from the input text,
//! so the same text always embeds to the same vector; specific texts can
//! be pinned to hand-chosen vectors when a test needs predictable
//! similarity arithmetic. Failures are explicit switches, never random.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quill_core::{defaults, EmbeddingBackend, Error, Result};

use crate::service::ModelLoader;

/// Deterministic in-process embedding backend for tests.
#[derive(Clone)]
pub struct MockEmbeddingBackend {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

#[derive(Clone)]
struct MockConfig {
    dimension: usize,
    latency_ms: u64,
    pinned: HashMap<String, Vec<f32>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: defaults::EMBED_DIMENSION,
            latency_ms: 0,
            pinned: HashMap::new(),
        }
    }
}

impl Default for MockEmbeddingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingBackend {
    /// Create a mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set simulated latency per embed call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Pin a specific input text to a hand-chosen vector.
    ///
    /// The key is matched against the text as submitted to the backend,
    /// after any truncation applied by the service.
    pub fn with_vector_for(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        Arc::make_mut(&mut self.config).pinned.insert(text.into(), vector);
        self
    }

    /// Make every subsequent embed call fail.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// Flip the failure switch at runtime.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Texts submitted to the backend, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of embed calls received.
    pub fn embed_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Embedding("mock backend failure".to_string()));
        }

        if let Some(vector) = self.config.pinned.get(text) {
            return Ok(vector.clone());
        }

        Ok(hash_vector(text, self.config.dimension))
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Loader around a mock backend, with call counting and failure injection
/// for exercising the single-flight path.
#[derive(Clone)]
pub struct MockModelLoader {
    backend: MockEmbeddingBackend,
    load_latency_ms: u64,
    fail_load: Arc<AtomicBool>,
    load_count: Arc<AtomicUsize>,
}

impl MockModelLoader {
    /// Create a loader that yields the given backend.
    pub fn new(backend: MockEmbeddingBackend) -> Self {
        Self {
            backend,
            load_latency_ms: 0,
            fail_load: Arc::new(AtomicBool::new(false)),
            load_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Simulate a slow model load.
    pub fn with_load_latency_ms(mut self, latency_ms: u64) -> Self {
        self.load_latency_ms = latency_ms;
        self
    }

    /// Make load attempts fail.
    pub fn failing(self) -> Self {
        self.fail_load.store(true, Ordering::SeqCst);
        self
    }

    /// Flip the load-failure switch at runtime.
    pub fn set_failing(&self, failing: bool) {
        self.fail_load.store(failing, Ordering::SeqCst);
    }

    /// Number of load attempts made.
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for MockModelLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>> {
        self.load_count.fetch_add(1, Ordering::SeqCst);

        if self.load_latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.load_latency_ms)).await;
        }

        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Error::Embedding("mock model load failure".to_string()));
        }

        Ok(Arc::new(self.backend.clone()))
    }
}

/// Stable pseudo-random vector for a text: FNV-1a over the bytes seeds a
/// small LCG, one step per dimension, mapped into [-1, 1).
fn hash_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut seed: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        seed ^= u64::from(byte);
        seed = seed.wrapping_mul(0x100000001b3);
    }

    let mut state = seed;
    (0..dimension)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            unit * 2.0 - 1.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_is_deterministic() {
        let backend = MockEmbeddingBackend::new().with_dimension(16);
        let a = backend.embed_text("hello world").await.unwrap();
        let b = backend.embed_text("hello world").await.unwrap();
        let c = backend.embed_text("goodbye moon").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
        assert_eq!(backend.embed_call_count(), 3);
    }

    #[tokio::test]
    async fn test_pinned_vector_wins() {
        let backend = MockEmbeddingBackend::new().with_vector_for("query", vec![1.0, 0.0]);
        assert_eq!(backend.embed_text("query").await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let backend = MockEmbeddingBackend::new();
        backend.set_failing(true);
        assert!(backend.embed_text("anything").await.is_err());
        backend.set_failing(false);
        assert!(backend.embed_text("anything").await.is_ok());
    }

    #[test]
    fn test_hash_vector_values_in_range() {
        let v = hash_vector("range check", 64);
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
    }
}
