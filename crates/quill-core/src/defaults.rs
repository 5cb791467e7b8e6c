//! Tuning constants for quill.
//!
//! Central home for every magic number in the workspace. The search blend
//! weights are fixed heuristics carried over from the original ranking
//! behavior; they are exposed as configurable fields on the search configs
//! with these values as defaults.

// =============================================================================
// EMBEDDING
// =============================================================================

/// Maximum number of characters submitted to the embedding model.
/// Longer texts are clipped to this prefix to bound latency and memory.
pub const EMBED_CHAR_BUDGET: usize = 2000;

/// Default embedding model served by a local Ollama instance.
pub const EMBED_MODEL: &str = "all-minilm";

/// Embedding dimension for all-minilm.
pub const EMBED_DIMENSION: usize = 384;

/// Default base URL of the embedding endpoint.
pub const EMBED_BASE_URL: &str = "http://127.0.0.1:11434";

/// Timeout for embedding requests (seconds).
pub const EMBED_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// HYBRID SEARCH
// =============================================================================

/// Default number of results returned by a search.
pub const SEARCH_LIMIT: usize = 10;

/// Weight of the semantic score when a note matches both signals.
pub const SEMANTIC_BLEND_WEIGHT: f32 = 0.7;

/// Weight of the keyword score when a note matches both signals.
pub const KEYWORD_BLEND_WEIGHT: f32 = 0.3;

/// Discount applied to notes matched by keywords only.
pub const KEYWORD_ONLY_DISCOUNT: f32 = 0.5;

// =============================================================================
// KEYWORD SCORING
// =============================================================================

/// Score contribution of the full query appearing in a note title.
pub const TITLE_PHRASE_WEIGHT: f32 = 1.0;

/// Score contribution of the full query appearing in a note body.
pub const BODY_PHRASE_WEIGHT: f32 = 0.5;

/// Score contribution per query token found in a note title.
pub const TITLE_TOKEN_WEIGHT: f32 = 0.3;

/// Score contribution per query token found in a note body.
pub const BODY_TOKEN_WEIGHT: f32 = 0.1;

/// Minimum token length considered for per-token scoring.
pub const MIN_TOKEN_CHARS: usize = 3;
