use std::collections::HashSet;

use crate::skill::tokenize::tokenize;

/// Longest n-gram considered a candidate skill phrase.
pub const MAX_NGRAM: usize = 4;

/// Generates every contiguous 1..=4-token phrase of `text`, lowercased and space-joined.
pub fn generate_candidates(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let tokens = tokenize(&lowered);

    let mut candidates = HashSet::new();
    for n in 1..=MAX_NGRAM {
        for window in tokens.windows(n) {
            candidates.insert(window.join(" "));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ngrams_of_short_phrase() {
        let candidates = generate_candidates("machine learning expert");
        for expected in [
            "machine",
            "learning",
            "expert",
            "machine learning",
            "learning expert",
            "machine learning expert",
        ] {
            assert!(candidates.contains(expected), "missing {expected}");
        }
        assert_eq!(candidates.len(), 6);
    }

    #[test]
    fn test_ngrams_capped_at_four_tokens() {
        let candidates = generate_candidates("a b c d e");
        assert!(candidates.contains("a b c d"));
        assert!(candidates.contains("b c d e"));
        assert!(!candidates.contains("a b c d e"));
        assert!(candidates.iter().all(|c| c.split(' ').count() <= MAX_NGRAM));
    }

    #[test]
    fn test_candidates_are_lowercased_and_deduplicated() {
        let candidates = generate_candidates("Rust rust RUST");
        assert!(candidates.contains("rust"));
        assert!(candidates.contains("rust rust rust"));
        assert!(!candidates.iter().any(|c| c.contains('R')));
        // "rust", "rust rust", "rust rust rust"
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_empty_text_has_no_candidates() {
        assert!(generate_candidates("").is_empty());
        assert!(generate_candidates(" .,; ").is_empty());
    }
}
