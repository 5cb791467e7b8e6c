//! Structured logging schema and field name constants for quill.
//!
//! All crates use these field names for consistent structured logging so
//! log tooling can query by the same keys across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (per-note scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "db", "inference", "jobs"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "hybrid", "keyword", "embedding_service", "indexer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "embed", "reindex_one", "reindex_all_missing"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Search query text.
pub const QUERY: &str = "query";

/// Embedding model name.
pub const MODEL: &str = "model";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or backfill.
pub const RESULT_COUNT: &str = "result_count";

/// Number of semantic hits before merging.
pub const SEMANTIC_HITS: &str = "semantic_hits";

/// Number of keyword hits before merging.
pub const KEYWORD_HITS: &str = "keyword_hits";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
