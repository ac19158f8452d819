//! Cosine similarity and the threshold decision procedure.

use serde::{Deserialize, Serialize};

use crate::constants::DEGENERATE_SIMILARITY;

/// Result of verifying a query embedding against a subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A stored vector reached the threshold. `matched_index` is its position
    /// in stored order; later vectors were not evaluated.
    Match { similarity: f64, matched_index: usize },
    /// Every stored vector was evaluated and none reached the threshold.
    NoMatch { best_similarity: f64 },
    /// Nothing is enrolled under the requested subject id.
    SubjectNotFound,
}

/// Cosine similarity with `f64` accumulation.
///
/// Returns [`DEGENERATE_SIMILARITY`] (-1) when the lengths differ, either norm is
/// zero, or the result is not finite.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine(a, b).unwrap_or(DEGENERATE_SIMILARITY)
}

fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let xd = f64::from(*x);
        let yd = f64::from(*y);
        dot += xd * yd;
        norm_a += xd * xd;
        norm_b += yd * yd;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    similarity.is_finite().then_some(similarity)
}

/// Scans `stored` in order and returns on the first vector whose similarity to
/// `query` is `>= threshold`.
///
/// First match wins: a later vector with a higher score is never looked at, so
/// the reported similarity depends on stored order. Without a match the best
/// score seen is reported, or -1 for an empty set.
#[must_use]
pub fn decide(stored: &[Vec<f32>], query: &[f32], threshold: f64) -> MatchOutcome {
    let mut best = DEGENERATE_SIMILARITY;
    for (index, candidate) in stored.iter().enumerate() {
        // Degenerate pairs score -1 and never match, even at a threshold of -1.
        let Some(similarity) = cosine(candidate, query) else {
            tracing::debug!(index, "degenerate stored embedding, skipping");
            continue;
        };
        tracing::debug!(index, similarity, threshold, "evaluated stored embedding");
        if similarity >= threshold {
            return MatchOutcome::Match { similarity, matched_index: index };
        }
        best = best.max(similarity);
    }
    MatchOutcome::NoMatch { best_similarity: best }
}
