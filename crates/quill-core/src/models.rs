//! Data model for quill notes and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE
// =============================================================================

/// A note as held by the document store.
///
/// The `body` is the plain-text rendering of the note content; rich-text
/// structure never reaches this layer. The store owns every field; the
/// search and indexing components read them and write only `embedding`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    /// Plain text used for keyword scoring and embedding.
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. A note is a search candidate iff this is `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trashed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Semantic vector for this note, maintained by the embedding indexer.
    /// Absent or empty means unindexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Note {
    /// Whether the note is a search candidate (not trashed).
    pub fn is_active(&self) -> bool {
        self.trashed_at.is_none()
    }

    /// Whether the note carries a usable stored embedding.
    pub fn is_indexed(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Text submitted to the embedding model for this note.
    ///
    /// Title and body joined by a blank line, trimmed. Empty result means
    /// there is nothing to embed and the note stays unindexed.
    pub fn embedding_source(&self) -> String {
        format!("{}\n\n{}", self.title, self.body).trim().to_string()
    }
}

/// Request to create a new note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to update an existing note. Fields left as `None` are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_pinned: Option<bool>,
    pub tags: Option<Vec<String>>,
}

// =============================================================================
// SEARCH RESULTS
// =============================================================================

/// Which signal produced a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Matched by embedding similarity only.
    Semantic,
    /// Matched by keyword scoring only.
    Keyword,
    /// Matched by both signals; score is the blended value.
    Both,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Semantic => write!(f, "semantic"),
            Self::Keyword => write!(f, "keyword"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// A single ranked search hit. Ephemeral, produced per query.
///
/// `score` is non-negative; result lists are ordered by descending score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub note_id: Uuid,
    pub title: String,
    pub score: f32,
    pub match_type: MatchType,
}
