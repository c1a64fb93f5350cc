use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the skill-matching core.
#[derive(Debug, Error)]
pub enum SkillError {
    /// A lemma table or entity model could not be loaded. Fatal at startup.
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `match_skills` was called with an empty reference set.
    #[error("cannot compute a match ratio against an empty reference skill set")]
    DivisionByZero,
}

impl SkillError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SkillError::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for caller errors. `DivisionByZero` is a sub-case of an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SkillError::InvalidArgument(_) | SkillError::DivisionByZero
        )
    }
}
