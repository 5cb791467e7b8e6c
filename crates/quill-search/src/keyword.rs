//! Deterministic lexical scoring over note title and body text.

use quill_core::{defaults, MatchType, Note, SearchResult};

/// Additive weights for keyword scoring.
///
/// Phrase-level and token-level bonuses stack; a note whose title contains
/// the whole query also collects the per-token title bonuses.
#[derive(Debug, Clone)]
pub struct KeywordWeights {
    /// Full query appears in the title.
    pub title_phrase: f32,
    /// Full query appears in the body.
    pub body_phrase: f32,
    /// A query token appears in the title.
    pub title_token: f32,
    /// A query token appears in the body.
    pub body_token: f32,
    /// Tokens shorter than this are ignored.
    pub min_token_chars: usize,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            title_phrase: defaults::TITLE_PHRASE_WEIGHT,
            body_phrase: defaults::BODY_PHRASE_WEIGHT,
            title_token: defaults::TITLE_TOKEN_WEIGHT,
            body_token: defaults::BODY_TOKEN_WEIGHT,
            min_token_chars: defaults::MIN_TOKEN_CHARS,
        }
    }
}

/// Lexical ranker. Pure function of its inputs, no model, no suspension.
#[derive(Debug, Clone, Default)]
pub struct KeywordRanker {
    weights: KeywordWeights,
}

impl KeywordRanker {
    /// Create a ranker with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker with custom weights.
    pub fn with_weights(weights: KeywordWeights) -> Self {
        Self { weights }
    }

    /// Lexical relevance of a note for a query. Case-insensitive.
    pub fn score(&self, query: &str, note: &Note) -> f32 {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return 0.0;
        }

        let title = note.title.to_lowercase();
        let body = note.body.to_lowercase();

        let mut score = 0.0;

        if title.contains(&needle) {
            score += self.weights.title_phrase;
        }
        if body.contains(&needle) {
            score += self.weights.body_phrase;
        }

        for token in needle
            .split_whitespace()
            .filter(|t| t.chars().count() >= self.weights.min_token_chars)
        {
            if title.contains(token) {
                score += self.weights.title_token;
            }
            if body.contains(token) {
                score += self.weights.body_token;
            }
        }

        score
    }

    /// Score every candidate, drop zero scores, sort descending, truncate.
    ///
    /// The sort is stable, so candidates with equal scores keep their
    /// input order.
    pub fn rank_all(&self, query: &str, notes: &[Note], limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = notes
            .iter()
            .filter_map(|note| {
                let score = self.score(query, note);
                if score > 0.0 {
                    Some(SearchResult {
                        note_id: note.id,
                        title: note.title.clone(),
                        score,
                        match_type: MatchType::Keyword,
                    })
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }
}
