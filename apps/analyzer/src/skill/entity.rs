//! Entity labeling resource used by the dynamic skill matcher.
//!
//! `PatternEntityModel` is a phrase-pattern labeler loaded from a JSON-lines artifact:
//!
//! ```text
//! {"label": "SKILLS", "pattern": "machine learning"}
//! {"label": "SKILLS", "pattern": "Python"}
//! ```
//!
//! Matching is case-insensitive over word tokens, greedy from left to right,
//! longest pattern first. Returned spans never overlap.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::skill::errors::SkillError;
use crate::skill::tokenize::{token_spans, tokenize};

/// A labeled span of the input text. `start`/`end` are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

/// Labels spans of text with categories.
pub trait EntityLabeler: Send + Sync {
    fn label(&self, text: &str) -> Vec<EntitySpan>;
}

#[derive(Debug, Deserialize)]
struct PatternLine {
    label: String,
    pattern: String,
}

#[derive(Debug, Clone)]
struct Pattern {
    tokens: Vec<String>,
    label: String,
}

#[derive(Debug, Clone, Default)]
pub struct PatternEntityModel {
    /// first token → patterns starting with it, longest first
    index: HashMap<String, Vec<Pattern>>,
    pattern_count: usize,
}

impl PatternEntityModel {
    /// Loads a JSON-lines pattern artifact. Any unreadable or malformed artifact is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkillError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| SkillError::model_load(path, e))?;

        let mut patterns = Vec::new();
        for (line_no, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parsed: PatternLine = serde_json::from_str(line).map_err(|e| {
                SkillError::model_load(path, format!("line {}: {e}", line_no + 1))
            })?;
            patterns.push((parsed.label, parsed.pattern));
        }

        let model = Self::from_patterns(patterns);
        if model.is_empty() {
            return Err(SkillError::model_load(path, "artifact contains no patterns"));
        }

        info!(
            "Loaded entity model from {} ({} patterns)",
            path.display(),
            model.len()
        );
        Ok(model)
    }

    /// Builds a model from `(label, pattern)` pairs. Patterns without word tokens are ignored.
    pub fn from_patterns<L, P, I>(patterns: I) -> Self
    where
        L: Into<String>,
        P: AsRef<str>,
        I: IntoIterator<Item = (L, P)>,
    {
        let mut index: HashMap<String, Vec<Pattern>> = HashMap::new();
        let mut pattern_count = 0;

        for (label, pattern) in patterns {
            let lowered = pattern.as_ref().to_lowercase();
            let tokens: Vec<String> = tokenize(&lowered).into_iter().map(String::from).collect();
            let Some(first) = tokens.first().cloned() else {
                continue;
            };
            index.entry(first).or_default().push(Pattern {
                tokens,
                label: label.into(),
            });
            pattern_count += 1;
        }

        for bucket in index.values_mut() {
            bucket.sort_by(|a, b| b.tokens.len().cmp(&a.tokens.len()));
        }

        Self {
            index,
            pattern_count,
        }
    }

    pub fn len(&self) -> usize {
        self.pattern_count
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}

impl EntityLabeler for PatternEntityModel {
    fn label(&self, text: &str) -> Vec<EntitySpan> {
        let tokens: Vec<(usize, usize, String)> = token_spans(text)
            .map(|m| (m.start(), m.end(), m.as_str().to_lowercase()))
            .collect();

        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let hit = self.index.get(&tokens[i].2).and_then(|bucket| {
                bucket.iter().find(|p| {
                    p.tokens.len() <= tokens.len() - i
                        && p.tokens
                            .iter()
                            .zip(&tokens[i..])
                            .all(|(want, (_, _, got))| want == got)
                })
            });

            match hit {
                Some(pattern) => {
                    let last = i + pattern.tokens.len() - 1;
                    let (start, end) = (tokens[i].0, tokens[last].1);
                    spans.push(EntitySpan {
                        start,
                        end,
                        label: pattern.label.clone(),
                        text: text[start..end].to_string(),
                    });
                    i = last + 1;
                }
                None => i += 1,
            }
        }
        spans
    }
}
