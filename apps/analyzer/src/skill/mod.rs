// Skill matching core: normalization, candidate generation, the two matcher
// strategies and the overlap scorer they share. Pure and synchronous; loaded
// models are immutable and shared through Arc.

pub mod candidates;
pub mod dynamic_matcher;
pub mod entity;
pub mod errors;
pub mod fuzzy;
pub mod list_matcher;
pub mod morphology;
pub mod normalizer;
pub mod overlap;
pub mod tokenize;

pub use dynamic_matcher::SkillDynamicMatcher;
pub use errors::SkillError;
pub use list_matcher::SkillListMatcher;
pub use morphology::NlpruleLemmatizer;
pub use normalizer::{Lemmatizer, LookupLemmatizer, Normalizer};
pub use overlap::MatchResult;

use serde::{Deserialize, Serialize};

/// Which matcher an analysis uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStrategy {
    /// Fuzzy matching against a caller-supplied reference list.
    List,
    /// Entity labeling of both documents.
    #[default]
    Entity,
}

impl std::str::FromStr for SkillStrategy {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(SkillStrategy::List),
            "entity" | "dynamic" => Ok(SkillStrategy::Entity),
            other => Err(SkillError::InvalidArgument(format!(
                "unknown skill strategy '{other}'"
            ))),
        }
    }
}
