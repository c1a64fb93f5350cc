//! Fuzzy string scoring on a 0–100 scale.
//!
//! Score = normalized Levenshtein similarity × 100. Identical strings score 100.

use strsim::normalized_levenshtein;

pub const MAX_SCORE: f64 = 100.0;

pub fn score(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * MAX_SCORE
}

/// Best-scoring choice for `query`, as `(index, score)`.
///
/// Ties resolve to the earliest choice. Returns `None` only when `choices` is empty.
pub fn best_match<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, choice) in choices.iter().enumerate() {
        let s = score(query, choice.as_ref());
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((idx, s));
            if s >= MAX_SCORE {
                break;
            }
        }
    }
    best
}
