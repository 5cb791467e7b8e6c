//! Hybrid search combining embedding similarity and keyword scoring.
//!
//! Semantic similarity is a broad-recall, noisy signal; keyword presence
//! is narrow but precise. The merge boosts notes that satisfy both and
//! discounts keyword-only hits, which approximates a blended ranking
//! without a learned model. When the semantic side is unavailable (no
//! query vector, nothing indexed yet) the engine falls back to keyword
//! ranking alone rather than failing the search.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};
use uuid::Uuid;

use quill_core::{defaults, MatchType, Note, NoteRepository, Result, SearchResult};
use quill_inference::EmbeddingService;

use crate::keyword::{KeywordRanker, KeywordWeights};
use crate::vector::cosine_similarity;

/// Configuration for hybrid search.
///
/// The blend values are fixed heuristics carried over from the original
/// ranking behavior; they are exposed here rather than hard-coded, but no
/// derivation beyond "works well for small personal corpora" exists.
#[derive(Debug, Clone)]
pub struct HybridSearchConfig {
    /// Weight of the semantic score when a note matches both signals.
    pub semantic_weight: f32,
    /// Weight of the keyword score when a note matches both signals.
    pub keyword_weight: f32,
    /// Discount applied to keyword-only matches.
    pub keyword_only_discount: f32,
    /// Weights for the lexical ranker.
    pub keyword: KeywordWeights,
}

impl Default for HybridSearchConfig {
    fn default() -> Self {
        Self {
            semantic_weight: defaults::SEMANTIC_BLEND_WEIGHT,
            keyword_weight: defaults::KEYWORD_BLEND_WEIGHT,
            keyword_only_discount: defaults::KEYWORD_ONLY_DISCOUNT,
            keyword: KeywordWeights::default(),
        }
    }
}

impl HybridSearchConfig {
    /// Create a config with custom blend weights.
    pub fn with_weights(semantic_weight: f32, keyword_weight: f32) -> Self {
        Self {
            semantic_weight,
            keyword_weight,
            ..Default::default()
        }
    }

    /// Set the keyword-only discount.
    pub fn with_keyword_only_discount(mut self, discount: f32) -> Self {
        self.keyword_only_discount = discount;
        self
    }

    /// Set the lexical ranker weights.
    pub fn with_keyword_weights(mut self, weights: KeywordWeights) -> Self {
        self.keyword = weights;
        self
    }
}

/// Hybrid search engine over a note store and an embedding service.
pub struct HybridSearchEngine {
    store: Arc<dyn NoteRepository>,
    embeddings: EmbeddingService,
    ranker: KeywordRanker,
    config: HybridSearchConfig,
}

impl HybridSearchEngine {
    /// Create an engine with the default configuration.
    pub fn new(store: Arc<dyn NoteRepository>, embeddings: EmbeddingService) -> Self {
        Self::with_config(store, embeddings, HybridSearchConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(
        store: Arc<dyn NoteRepository>,
        embeddings: EmbeddingService,
        config: HybridSearchConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            ranker: KeywordRanker::with_weights(config.keyword.clone()),
            config,
        }
    }

    /// Rank notes for a query, best first.
    ///
    /// Store failures are fatal and propagate; embedding failures silently
    /// degrade to keyword-only results.
    #[instrument(
        skip(self),
        fields(subsystem = "search", component = "hybrid", op = "search", query = %query, limit)
    )]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();

        let candidates = self.store.list_active().await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embeddings.embed(query).await;

        let indexed: Vec<&Note> = candidates
            .iter()
            .filter(|n| has_usable_embedding(n, query_vector.len()))
            .collect();

        if indexed.is_empty() || query_vector.is_empty() {
            let results = self.ranker.rank_all(query, &candidates, limit);
            debug!(
                keyword_hits = results.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Semantic scoring unavailable, keyword fallback"
            );
            return Ok(results);
        }

        let mut semantic: Vec<SearchResult> = indexed
            .iter()
            .map(|note| SearchResult {
                note_id: note.id,
                title: note.title.clone(),
                // Cosine can dip below zero for anti-correlated vectors;
                // result scores stay non-negative.
                score: cosine_similarity(
                    &query_vector,
                    note.embedding.as_deref().unwrap_or_default(),
                )
                .max(0.0),
                match_type: MatchType::Semantic,
            })
            .collect();
        semantic.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let keyword = self.ranker.rank_all(query, &candidates, limit);

        debug!(
            semantic_hits = semantic.len(),
            keyword_hits = keyword.len(),
            "Merging result sets"
        );

        let mut results = merge_results(semantic, keyword, &self.config);
        results.truncate(limit);

        debug!(
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(results)
    }
}

/// Whether a stored embedding can be scored against a query vector of the
/// given length. Mismatched vectors are treated as unindexed, not errors.
fn has_usable_embedding(note: &Note, query_len: usize) -> bool {
    match note.embedding.as_deref() {
        Some(e) if !e.is_empty() => query_len == 0 || e.len() == query_len,
        _ => false,
    }
}

/// Merge keyword hits into the semantic result set.
///
/// Builds a fresh map keyed by note identity: semantic entries seed it; a
/// keyword hit for a seeded note replaces the entry with the blended score
/// and `MatchType::Both`; a keyword hit for an unseeded note enters with
/// its score discounted. Output is sorted descending. Deterministic
/// regardless of how the two input sets were computed.
fn merge_results(
    semantic: Vec<SearchResult>,
    keyword: Vec<SearchResult>,
    config: &HybridSearchConfig,
) -> Vec<SearchResult> {
    let mut merged: HashMap<Uuid, SearchResult> = semantic
        .into_iter()
        .map(|result| (result.note_id, result))
        .collect();

    for hit in keyword {
        let entry = match merged.get(&hit.note_id).map(|r| r.score) {
            Some(semantic_score) => SearchResult {
                score: semantic_score * config.semantic_weight + hit.score * config.keyword_weight,
                match_type: MatchType::Both,
                ..hit
            },
            None => SearchResult {
                score: hit.score * config.keyword_only_discount,
                ..hit
            },
        };
        merged.insert(entry.note_id, entry);
    }

    let mut results: Vec<SearchResult> = merged.into_values().collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: Uuid, score: f32, match_type: MatchType) -> SearchResult {
        SearchResult {
            note_id: id,
            title: String::new(),
            score,
            match_type,
        }
    }

    #[test]
    fn test_merge_blends_notes_matched_by_both_signals() {
        let id = Uuid::new_v4();
        let semantic = vec![result(id, 0.8, MatchType::Semantic)];
        let keyword = vec![result(id, 1.5, MatchType::Keyword)];

        let merged = merge_results(semantic, keyword, &HybridSearchConfig::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].match_type, MatchType::Both);
        assert!((merged[0].score - (0.8 * 0.7 + 1.5 * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_merge_discounts_keyword_only_matches() {
        let semantic_id = Uuid::new_v4();
        let keyword_id = Uuid::new_v4();
        let semantic = vec![result(semantic_id, 0.4, MatchType::Semantic)];
        let keyword = vec![result(keyword_id, 1.0, MatchType::Keyword)];

        let merged = merge_results(semantic, keyword, &HybridSearchConfig::default());
        assert_eq!(merged.len(), 2);

        let keyword_entry = merged.iter().find(|r| r.note_id == keyword_id).unwrap();
        assert_eq!(keyword_entry.match_type, MatchType::Keyword);
        assert!((keyword_entry.score - 0.5).abs() < 1e-6);

        let semantic_entry = merged.iter().find(|r| r.note_id == semantic_id).unwrap();
        assert_eq!(semantic_entry.match_type, MatchType::Semantic);
        assert!((semantic_entry.score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_merge_sorts_descending() {
        let merged = merge_results(
            vec![
                result(Uuid::new_v4(), 0.2, MatchType::Semantic),
                result(Uuid::new_v4(), 0.9, MatchType::Semantic),
                result(Uuid::new_v4(), 0.5, MatchType::Semantic),
            ],
            Vec::new(),
            &HybridSearchConfig::default(),
        );
        assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_usable_embedding_rejects_mismatched_lengths() {
        let now = chrono::Utc::now();
        let mut note = Note {
            id: Uuid::new_v4(),
            title: String::new(),
            body: String::new(),
            created_at: now,
            updated_at: now,
            trashed_at: None,
            is_pinned: false,
            tags: Vec::new(),
            embedding: Some(vec![0.1, 0.2, 0.3]),
        };

        assert!(has_usable_embedding(&note, 3));
        assert!(!has_usable_embedding(&note, 4));

        note.embedding = Some(Vec::new());
        assert!(!has_usable_embedding(&note, 3));

        note.embedding = None;
        assert!(!has_usable_embedding(&note, 3));
    }
}
