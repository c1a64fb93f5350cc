//! Entity-Based Matcher: skills are whatever the entity labeler tags as `SKILLS`.
//!
//! No n-grams, no fuzzy threshold and no lemmatization: extracted skills are the
//! lowercased span texts, and `match_skills` compares raw strings.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::skill::entity::{EntityLabeler, PatternEntityModel};
use crate::skill::errors::SkillError;
use crate::skill::overlap::{score_overlap, MatchResult};

/// Default location of the entity model artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/skill-ner/patterns.jsonl";

/// Any label containing this marker counts as a skill.
pub const SKILL_LABEL: &str = "SKILLS";

#[derive(Clone)]
pub struct SkillDynamicMatcher {
    labeler: Arc<dyn EntityLabeler>,
}

impl SkillDynamicMatcher {
    /// Loads the pattern model artifact at `path`. Fails with `ModelLoad` if it is missing or corrupt.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkillError> {
        let model = PatternEntityModel::load(path)?;
        Ok(Self::with_labeler(Arc::new(model)))
    }

    pub fn with_labeler(labeler: Arc<dyn EntityLabeler>) -> Self {
        Self { labeler }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let skills: BTreeSet<String> = self
            .labeler
            .label(text)
            .into_iter()
            .filter(|span| span.label.contains(SKILL_LABEL))
            .map(|span| span.text.to_lowercase())
            .collect();

        debug!("Entity matcher: {} distinct skills", skills.len());
        skills.into_iter().collect()
    }

    /// Overlap of `extracted_skills` with `main_skills` by exact string equality.
    pub fn match_skills<S: AsRef<str>, T: AsRef<str>>(
        &self,
        main_skills: &[S],
        extracted_skills: &[T],
    ) -> Result<MatchResult, SkillError> {
        score_overlap(main_skills, extracted_skills, str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::entity::EntitySpan;

    fn matcher() -> SkillDynamicMatcher {
        SkillDynamicMatcher::with_labeler(Arc::new(PatternEntityModel::from_patterns([
            ("SKILLS", "python"),
            ("SKILLS", "machine learning"),
            ("HARD_SKILLS", "kubernetes"),
            ("ORG", "google"),
        ])))
    }

    #[test]
    fn test_extract_collects_skill_labels_lowercased() {
        let skills = matcher().extract("Python and Machine Learning at Google");
        assert_eq!(skills, vec!["machine learning", "python"]);
    }

    #[test]
    fn test_extract_accepts_labels_containing_skills() {
        let skills = matcher().extract("Kubernetes operator");
        assert_eq!(skills, vec!["kubernetes"]);
    }

    #[test]
    fn test_extract_deduplicates_repeated_spans() {
        let skills = matcher().extract("Python, python, PYTHON and more Python.");
        assert_eq!(skills, vec!["python"]);
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(matcher().extract("").is_empty());
    }

    #[test]
    fn test_match_is_not_lemmatized() {
        let m = matcher();
        let result = m
            .match_skills(&["managing teams", "python"], &["manage team", "python"])
            .unwrap();
        assert_eq!(result.formatted, "1/2");
    }

    #[test]
    fn test_match_empty_main_fails() {
        let empty: [&str; 0] = [];
        let err = matcher().match_skills(&empty, &["python"]).unwrap_err();
        assert!(matches!(err, SkillError::DivisionByZero));
    }

    #[test]
    fn test_match_full_and_empty() {
        let m = matcher();
        let main = ["python", "sql"];
        assert_eq!(m.match_skills(&main, &main).unwrap().formatted, "2/2");
        let empty: [&str; 0] = [];
        let result = m.match_skills(&main, &empty).unwrap();
        assert_eq!(result.ratio, 0.0);
        assert_eq!(result.formatted, "0/2");
    }

    #[test]
    fn test_match_duplicate_references_count_once() {
        let result = matcher()
            .match_skills(&["python", "python", "go"], &["python"])
            .unwrap();
        assert_eq!(result.formatted, "1/3");
    }

    struct FixedLabeler(Vec<EntitySpan>);

    impl EntityLabeler for FixedLabeler {
        fn label(&self, _text: &str) -> Vec<EntitySpan> {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_labeler_seam() {
        let span = |text: &str, label: &str| EntitySpan {
            start: 0,
            end: text.len(),
            label: label.to_string(),
            text: text.to_string(),
        };
        let m = SkillDynamicMatcher::with_labeler(Arc::new(FixedLabeler(vec![
            span("Rust", "SKILLS"),
            span("RUST", "SKILLS"),
            span("Berlin", "GPE"),
        ])));
        assert_eq!(m.extract("ignored"), vec!["rust"]);
    }

    #[test]
    fn test_load_missing_model_fails() {
        let err = SkillDynamicMatcher::load("/nonexistent/patterns.jsonl")
            .err()
            .unwrap();
        assert!(matches!(err, SkillError::ModelLoad { .. }));
    }
}
