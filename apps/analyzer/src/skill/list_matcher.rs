//! Fuzzy List Matcher: finds reference skills mentioned in free text.
//!
//! Algorithm:
//! 1. Canonicalize every reference skill once.
//! 2. Generate all 1..=4-gram candidate phrases from the text.
//! 3. For each candidate, take its single best fuzzy match in the canonical
//!    reference list (ties → earliest reference); keep it when score ≥ threshold.
//! 4. Return the matched canonical skills, deduplicated and sorted.

use std::collections::BTreeSet;

use tracing::debug;

use crate::skill::candidates::generate_candidates;
use crate::skill::errors::SkillError;
use crate::skill::fuzzy::{self, MAX_SCORE};
use crate::skill::normalizer::Normalizer;
use crate::skill::overlap::{score_overlap, MatchResult};

pub const DEFAULT_THRESHOLD: f64 = 95.0;

#[derive(Clone)]
pub struct SkillListMatcher {
    normalizer: Normalizer,
    threshold: f64,
}

impl SkillListMatcher {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(normalizer: Normalizer, threshold: f64) -> Result<Self, SkillError> {
        validate_threshold(threshold)?;
        Ok(Self {
            normalizer,
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Extracts reference skills from `text` using the matcher's threshold.
    pub fn extract<S: AsRef<str>>(
        &self,
        text: &str,
        reference_skills: &[S],
    ) -> Result<Vec<String>, SkillError> {
        self.extract_with_threshold(text, reference_skills, self.threshold)
    }

    pub fn extract_with_threshold<S: AsRef<str>>(
        &self,
        text: &str,
        reference_skills: &[S],
        threshold: f64,
    ) -> Result<Vec<String>, SkillError> {
        if reference_skills.is_empty() {
            return Err(SkillError::InvalidArgument(
                "reference skill list must not be empty".to_string(),
            ));
        }
        validate_threshold(threshold)?;

        let canonical = self.normalizer.canonicalize_all(reference_skills);
        let candidates = generate_candidates(text);

        let mut found = BTreeSet::new();
        for phrase in &candidates {
            if let Some((idx, score)) = fuzzy::best_match(phrase, &canonical) {
                if score >= threshold {
                    found.insert(canonical[idx].clone());
                }
            }
        }

        debug!(
            "List matcher: {} candidates, {} reference skills, {} matched",
            candidates.len(),
            canonical.len(),
            found.len()
        );

        Ok(found.into_iter().collect())
    }

    /// Overlap of `extracted_skills` with `main_skills`, both canonicalized.
    pub fn match_skills<S: AsRef<str>, T: AsRef<str>>(
        &self,
        main_skills: &[S],
        extracted_skills: &[T],
    ) -> Result<MatchResult, SkillError> {
        score_overlap(main_skills, extracted_skills, |s| {
            self.normalizer.canonicalize(s)
        })
    }
}

fn validate_threshold(threshold: f64) -> Result<(), SkillError> {
    if !(0.0..=MAX_SCORE).contains(&threshold) {
        return Err(SkillError::InvalidArgument(format!(
            "threshold must be within 0..=100, got {threshold}"
        )));
    }
    Ok(())
}
