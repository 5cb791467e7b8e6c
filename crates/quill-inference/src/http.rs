//! HTTP embedding backend for an Ollama-style local model server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use quill_core::{defaults, EmbeddingBackend, Error, Result};

use crate::service::ModelLoader;

/// Default embedding endpoint.
pub const DEFAULT_BASE_URL: &str = defaults::EMBED_BASE_URL;

/// Default embedding model.
pub const DEFAULT_MODEL: &str = defaults::EMBED_MODEL;

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = defaults::EMBED_DIMENSION;

/// Embedding backend speaking the Ollama `/api/embed` protocol.
pub struct HttpEmbeddingBackend {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
    timeout_secs: u64,
}

impl HttpEmbeddingBackend {
    /// Create a backend with default settings.
    pub fn new() -> Self {
        Self::with_config(
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            DEFAULT_DIMENSION,
        )
    }

    /// Create a backend with custom configuration.
    pub fn with_config(base_url: String, model: String, dimension: usize) -> Self {
        let timeout_secs = std::env::var("QUILL_EMBED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::EMBED_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "Initializing embedding backend: url={}, model={}",
            base_url, model
        );

        Self {
            client,
            base_url,
            model,
            dimension,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `QUILL_EMBED_BASE` | `http://127.0.0.1:11434` |
    /// | `QUILL_EMBED_MODEL` | `all-minilm` |
    /// | `QUILL_EMBED_DIM` | `384` |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("QUILL_EMBED_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("QUILL_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let dimension = std::env::var("QUILL_EMBED_DIM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DIMENSION);

        Self::with_config(base_url, model, dimension)
    }
}

impl Default for HttpEmbeddingBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for the `/api/embed` endpoint.
#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

/// Response body from the `/api/embed` endpoint.
#[derive(Deserialize)]
struct EmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingBackend for HttpEmbeddingBackend {
    #[instrument(
        skip(self, text),
        fields(subsystem = "inference", component = "http", op = "embed_text", model = %self.model)
    )]
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();

        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Embedding server returned {}: {}",
                status, body
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse response: {}", e)))?;

        let vector = result
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Empty embedding response".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(duration_ms = elapsed, "Embedding complete");
        if elapsed > 5000 {
            warn!(duration_ms = elapsed, slow = true, "Slow embedding request");
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Loader that constructs the HTTP backend and warms the remote model.
///
/// The first request to an Ollama-style server pulls the model into
/// memory, so the probe does the expensive part of initialization up
/// front; a probe failure fails the load.
pub struct HttpModelLoader {
    base_url: String,
    model: String,
    dimension: usize,
}

impl HttpModelLoader {
    /// Create a loader with custom configuration.
    pub fn with_config(base_url: String, model: String, dimension: usize) -> Self {
        Self {
            base_url,
            model,
            dimension,
        }
    }

    /// Create a loader configured from the same environment variables as
    /// [`HttpEmbeddingBackend::from_env`].
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("QUILL_EMBED_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("QUILL_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let dimension = std::env::var("QUILL_EMBED_DIM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DIMENSION);

        Self::with_config(base_url, model, dimension)
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self) -> Result<Arc<dyn EmbeddingBackend>> {
        let backend = HttpEmbeddingBackend::with_config(
            self.base_url.clone(),
            self.model.clone(),
            self.dimension,
        );

        let start = Instant::now();
        backend.embed_text("warmup").await?;
        info!(
            subsystem = "inference",
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "Embedding model warmed"
        );

        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_request_shape() {
        let request = EmbeddingRequest {
            model: "all-minilm".to_string(),
            input: "hello".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "all-minilm");
        assert_eq!(json["input"], "hello");
    }

    #[test]
    fn test_embedding_response_shape() {
        let json = r#"{"model":"all-minilm","embeddings":[[0.1,0.2,0.3]]}"#;
        let response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.embeddings.len(), 1);
        assert_eq!(response.embeddings[0], vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_embedding_response_empty_embeddings() {
        let json = r#"{"embeddings":[]}"#;
        let response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert!(response.embeddings.is_empty());
    }

    #[test]
    fn test_backend_reports_configured_dimension_and_model() {
        let backend = HttpEmbeddingBackend::with_config(
            "http://localhost:11434".to_string(),
            "all-minilm".to_string(),
            384,
        );
        assert_eq!(backend.dimension(), 384);
        assert_eq!(backend.model_name(), "all-minilm");
    }
}
