//! Analysis pipeline: preprocessing → skill matching → similarity → recommendation.
//!
//! Skill matching is the only step that fails the request. Similarity and
//! recommendation are independent collaborators; their failures become warnings.

pub mod handlers;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::preprocess::Preprocessor;
use crate::recommendation::Recommender;
use crate::similarity::TextSimilarity;
use crate::skill::{MatchResult, SkillDynamicMatcher, SkillError, SkillListMatcher, SkillStrategy};

pub const NO_SKILLS_TO_COMPARE: &str = "No skills to compare";
pub const RECOMMENDATIONS_DISABLED: &str =
    "AI recommendations are disabled (ANTHROPIC_API_KEY is not set)";

// ────────────────────────────────────────────────────────────────────────────
// Request / report models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub strategy: SkillStrategy,
    /// Reference skills for the list strategy. Ignored by the entity strategy.
    #[serde(default)]
    pub reference_skills: Vec<String>,
    /// Overrides the configured fuzzy threshold (list strategy only).
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default = "default_recommend")]
    pub recommend: bool,
}

fn default_recommend() -> bool {
    true
}

/// One reference skill and whether the resume shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCheck {
    pub skill: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub score: f64,
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub strategy: SkillStrategy,
    pub reference_skills: Vec<String>,
    pub resume_skills: Vec<String>,
    pub skill_checks: Vec<SkillCheck>,
    /// None when there is nothing to compare against.
    pub skill_match: Option<MatchResult>,
    pub similarity: Option<SimilarityScore>,
    pub recommendation: Option<String>,
    pub warnings: Vec<String>,
}

/// Output of the CPU-bound part of the pipeline.
#[derive(Debug, Default)]
struct SkillOutcome {
    reference_skills: Vec<String>,
    resume_skills: Vec<String>,
    skill_checks: Vec<SkillCheck>,
    skill_match: Option<MatchResult>,
    warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct Analyzer {
    list_matcher: SkillListMatcher,
    dynamic_matcher: SkillDynamicMatcher,
    preprocessor: Preprocessor,
    similarity: Arc<dyn TextSimilarity>,
    recommender: Option<Recommender>,
}

impl Analyzer {
    pub fn new(
        list_matcher: SkillListMatcher,
        dynamic_matcher: SkillDynamicMatcher,
        preprocessor: Preprocessor,
        similarity: Arc<dyn TextSimilarity>,
        recommender: Option<Recommender>,
    ) -> Self {
        Self {
            list_matcher,
            dynamic_matcher,
            preprocessor,
            similarity,
            recommender,
        }
    }

    pub fn list_matcher(&self) -> &SkillListMatcher {
        &self.list_matcher
    }

    pub fn dynamic_matcher(&self) -> &SkillDynamicMatcher {
        &self.dynamic_matcher
    }

    /// Runs the full pipeline for one resume / JD pair.
    pub async fn analyze(self: &Arc<Self>, request: AnalysisRequest) -> Result<AnalysisReport, AppError> {
        let AnalysisRequest {
            resume_text,
            jd_text,
            strategy,
            reference_skills,
            threshold,
            recommend,
        } = request;

        let analyzer = Arc::clone(self);
        let (resume, jd) = (Arc::<str>::from(resume_text), Arc::<str>::from(jd_text));
        let (resume_in, jd_in) = (Arc::clone(&resume), Arc::clone(&jd));

        let (outcome, pre_resume, pre_jd) = tokio::task::spawn_blocking(move || {
            let outcome =
                analyzer.match_skills(strategy, &reference_skills, threshold, &resume_in, &jd_in)?;
            let pre_resume = analyzer.preprocessor.preprocess(&resume_in);
            let pre_jd = analyzer.preprocessor.preprocess(&jd_in);
            Ok::<_, SkillError>((outcome, pre_resume, pre_jd))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow!("skill matching task failed: {e}")))??;

        let SkillOutcome {
            reference_skills,
            resume_skills,
            skill_checks,
            skill_match,
            mut warnings,
        } = outcome;

        let similarity = match self.similarity.similarity(&pre_resume, &pre_jd).await {
            Ok(score) => Some(SimilarityScore {
                score,
                backend: self.similarity.backend().to_string(),
            }),
            Err(e) => {
                warn!("Similarity scoring failed: {e}");
                warnings.push(format!("Similarity unavailable: {e}"));
                None
            }
        };

        let recommendation = if !recommend {
            None
        } else if let Some(recommender) = &self.recommender {
            match recommender.recommend(&resume, &jd).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Recommendation failed: {e}");
                    warnings.push(format!("Recommendation unavailable: {e}"));
                    None
                }
            }
        } else {
            warnings.push(RECOMMENDATIONS_DISABLED.to_string());
            None
        };

        let report = AnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            strategy,
            reference_skills,
            resume_skills,
            skill_checks,
            skill_match,
            similarity,
            recommendation,
            warnings,
        };

        info!(
            "Analysis {} ({:?}): match={}, similarity={:?}",
            report.analysis_id,
            report.strategy,
            report
                .skill_match
                .as_ref()
                .map(|m| m.formatted.as_str())
                .unwrap_or("n/a"),
            report.similarity.as_ref().map(|s| s.score),
        );

        Ok(report)
    }

    fn match_skills(
        &self,
        strategy: SkillStrategy,
        reference_skills: &[String],
        threshold: Option<f64>,
        resume: &str,
        jd: &str,
    ) -> Result<SkillOutcome, SkillError> {
        match strategy {
            SkillStrategy::Entity => self.match_with_entities(resume, jd),
            SkillStrategy::List => self.match_with_list(reference_skills, threshold, resume),
        }
    }

    /// Reference = skills tagged in the JD; compared by raw string equality.
    fn match_with_entities(&self, resume: &str, jd: &str) -> Result<SkillOutcome, SkillError> {
        let reference_skills = self.dynamic_matcher.extract(jd);
        let resume_skills = self.dynamic_matcher.extract(resume);

        let present: HashSet<&str> = resume_skills.iter().map(String::as_str).collect();
        let skill_checks = reference_skills
            .iter()
            .map(|skill| SkillCheck {
                skill: skill.clone(),
                present: present.contains(skill.as_str()),
            })
            .collect();

        let mut warnings = Vec::new();
        let skill_match = guard_empty(
            self.dynamic_matcher
                .match_skills(&reference_skills, &resume_skills),
            &mut warnings,
        )?;

        Ok(SkillOutcome {
            reference_skills,
            resume_skills,
            skill_checks,
            skill_match,
            warnings,
        })
    }

    /// Reference = caller skills; resume skills found by fuzzy n-gram matching.
    fn match_with_list(
        &self,
        reference_skills: &[String],
        threshold: Option<f64>,
        resume: &str,
    ) -> Result<SkillOutcome, SkillError> {
        let threshold = threshold.unwrap_or(self.list_matcher.threshold());
        let mut warnings = Vec::new();

        let extracted =
            self.list_matcher
                .extract_with_threshold(resume, reference_skills, threshold);
        let resume_skills = match extracted {
            Ok(skills) => skills,
            Err(SkillError::InvalidArgument(_)) if reference_skills.is_empty() => Vec::new(),
            Err(e) => return Err(e),
        };

        let normalizer = self.list_matcher.normalizer();
        let present: HashSet<&str> = resume_skills.iter().map(String::as_str).collect();
        let skill_checks = reference_skills
            .iter()
            .map(|skill| SkillCheck {
                skill: skill.clone(),
                present: present.contains(normalizer.canonicalize(skill).as_str()),
            })
            .collect();

        let skill_match = guard_empty(
            self.list_matcher.match_skills(reference_skills, &resume_skills),
            &mut warnings,
        )?;

        Ok(SkillOutcome {
            reference_skills: reference_skills.to_vec(),
            resume_skills,
            skill_checks,
            skill_match,
            warnings,
        })
    }
}

/// An empty reference set is reported, not raised.
fn guard_empty(
    result: Result<MatchResult, SkillError>,
    warnings: &mut Vec<String>,
) -> Result<Option<MatchResult>, SkillError> {
    match result {
        Ok(m) => Ok(Some(m)),
        Err(SkillError::DivisionByZero) => {
            warnings.push(NO_SKILLS_TO_COMPARE.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
