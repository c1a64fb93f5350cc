//! Overlap Scorer: the single routine behind both matchers' `match_skills`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::skill::errors::SkillError;

/// Share of the reference skill set found among the extracted skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// matched / total, in [0, 1]
    pub ratio: f64,
    pub matched: usize,
    pub total: usize,
    /// "matched/total"
    pub formatted: String,
}

impl MatchResult {
    fn new(matched: usize, total: usize) -> Self {
        Self {
            ratio: matched as f64 / total as f64,
            matched,
            total,
            formatted: format!("{matched}/{total}"),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Counts the distinct extracted keys that appear among the reference keys.
///
/// `key` maps a skill to its comparison form: canonicalization for the list
/// strategy, identity for the entity strategy. `total` is `main_skills.len()`.
/// `matched` is bounded by the number of distinct reference keys, so the ratio
/// stays in [0, 1] even with duplicated inputs.
pub fn score_overlap<S, T, F>(
    main_skills: &[S],
    extracted_skills: &[T],
    key: F,
) -> Result<MatchResult, SkillError>
where
    S: AsRef<str>,
    T: AsRef<str>,
    F: Fn(&str) -> String,
{
    if main_skills.is_empty() {
        return Err(SkillError::DivisionByZero);
    }

    let reference: HashSet<String> = main_skills.iter().map(|s| key(s.as_ref())).collect();
    let extracted: HashSet<String> = extracted_skills
        .iter()
        .map(|s| key(s.as_ref()))
        .collect();

    let matched = extracted.intersection(&reference).count();

    Ok(MatchResult::new(matched, main_skills.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_empty_main_is_division_by_zero() {
        let err = score_overlap::<&str, &str, _>(&[], &["rust"], identity).unwrap_err();
        assert!(matches!(err, SkillError::DivisionByZero));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_no_extracted_skills_scores_zero() {
        let result = score_overlap::<_, &str, _>(&["a", "b", "c"], &[], identity).unwrap();
        assert_eq!(result.ratio, 0.0);
        assert_eq!(result.formatted, "0/3");
    }

    #[test]
    fn test_all_extracted_scores_one() {
        let main = ["python", "rust"];
        let result = score_overlap(&main, &main, identity).unwrap();
        assert_eq!(result.ratio, 1.0);
        assert_eq!(result.formatted, "2/2");
    }

    #[test]
    fn test_partial_overlap() {
        let result =
            score_overlap(&["python", "leadership", "research"], &["python", "leadership", "go"], identity)
                .unwrap();
        assert_eq!(result.matched, 2);
        assert_eq!(result.total, 3);
        assert!((result.ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.to_string(), "2/3");
    }

    #[test]
    fn test_duplicates_keep_ratio_in_unit_range() {
        let result = score_overlap(&["rust", "go"], &["rust", "rust", "rust"], identity).unwrap();
        assert_eq!(result.formatted, "1/2");

        let result = score_overlap(&["rust", "rust"], &["rust"], identity).unwrap();
        assert_eq!(result.formatted, "1/2");
        assert!(result.ratio <= 1.0);
    }

    #[test]
    fn test_key_function_is_applied_to_both_sides() {
        let lower = |s: &str| s.to_lowercase();
        let result = score_overlap(&["Rust"], &["RUST"], lower).unwrap();
        assert_eq!(result.formatted, "1/1");

        let result = score_overlap(&["Rust"], &["RUST"], identity).unwrap();
        assert_eq!(result.formatted, "0/1");
    }

    #[test]
    fn test_duplicate_references_count_once() {
        let result =
            score_overlap(&["python", "python", "go"], &["python"], identity).unwrap();
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 3);
        assert_eq!(result.formatted, "1/3");
    }

    #[test]
    fn test_extracted_keys_outside_reference_are_ignored() {
        let result = score_overlap(&["go"], &["go", "rust", "python"], identity).unwrap();
        assert_eq!(result.formatted, "1/1");
        assert_eq!(result.ratio, 1.0);
    }
}
