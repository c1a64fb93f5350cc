//! Text Normalizer: canonical form of skill phrases.
//!
//! Canonical form = lowercase, trimmed, tokenized, lemmatized, single-space joined.
//! Two skill phrases are equal for overlap scoring iff their canonical forms are equal.
//!
//! Production lemmatization is `morphology::NlpruleLemmatizer`; the lookup table
//! here is its override layer and a model-free lemmatizer for tests.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::skill::errors::SkillError;
use crate::skill::tokenize::{is_single_token, tokenize};

/// Default English override table compiled into the binary.
const ENGLISH_LEMMA_TABLE: &str = include_str!("../../resources/lemma_lookup.en.json");

/// Maps an inflected token to its base form. Tokens are already lowercased.
///
/// Implementations must be idempotent: `lemma(lemma(t)) == lemma(t)`.
pub trait Lemmatizer: Send + Sync {
    fn lemma<'a>(&'a self, token: &'a str) -> Cow<'a, str>;
}

/// Lemmatizer backed by an `inflected form → lemma` lookup table.
///
/// Chains are resolved at load time, so `lemma(lemma(t)) == lemma(t)` for every token.
/// Identity entries (`"learning": "learning"`) pin a form so the morphological
/// model never reduces it.
#[derive(Debug, Clone, Default)]
pub struct LookupLemmatizer {
    table: HashMap<String, String>,
}

impl LookupLemmatizer {
    /// Loads the embedded English table.
    pub fn english() -> Result<Self, SkillError> {
        Self::from_json_str(ENGLISH_LEMMA_TABLE)
            .map_err(|reason| SkillError::model_load("<embedded lemma_lookup.en.json>", reason))
    }

    /// Loads a JSON object of `"inflected": "lemma"` pairs from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkillError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| SkillError::model_load(path, e))?;
        let lemmatizer =
            Self::from_json_str(&raw).map_err(|reason| SkillError::model_load(path, reason))?;
        info!(
            "Loaded lemma table from {} ({} entries)",
            path.display(),
            lemmatizer.len()
        );
        Ok(lemmatizer)
    }

    fn from_json_str(raw: &str) -> Result<Self, String> {
        let parsed: HashMap<String, String> =
            serde_json::from_str(raw).map_err(|e| format!("invalid lemma table: {e}"))?;

        let mut table = HashMap::with_capacity(parsed.len());
        let mut skipped = 0usize;
        for (form, lemma) in parsed {
            let form = form.trim().to_lowercase();
            let lemma = lemma.trim().to_lowercase();
            if !is_single_token(&lemma) {
                return Err(format!("lemma '{lemma}' for '{form}' is not a single word token"));
            }
            if !is_single_token(&form) {
                skipped += 1;
                continue;
            }
            table.insert(form, lemma);
        }
        if skipped > 0 {
            debug!("Skipped {skipped} lemma table keys that are not word tokens");
        }

        Ok(Self {
            table: resolve_chains(table)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The table entry for `token`, pinned identities included.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.table.get(token).map(String::as_str)
    }
}

impl Lemmatizer for LookupLemmatizer {
    fn lemma<'a>(&'a self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(self.get(token).unwrap_or(token))
    }
}

/// Rewrites `a → b, b → c` into `a → c, b → c`. Identity entries end a chain.
/// Fails on cycles.
fn resolve_chains(table: HashMap<String, String>) -> Result<HashMap<String, String>, String> {
    let mut resolved = HashMap::with_capacity(table.len());
    for (form, lemma) in &table {
        let mut current = lemma;
        let mut steps = 0usize;
        while let Some(next) = table.get(current) {
            if next == current {
                break;
            }
            steps += 1;
            if steps > table.len() {
                return Err(format!("lemma cycle detected starting at '{form}'"));
            }
            current = next;
        }
        resolved.insert(form.clone(), current.clone());
    }
    Ok(resolved)
}

/// Canonicalizes skill phrases with a shared lemmatizer.
#[derive(Clone)]
pub struct Normalizer {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl Normalizer {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// Lowercase, trim, tokenize, lemmatize, rejoin with single spaces.
    pub fn canonicalize(&self, phrase: &str) -> String {
        let lowered = phrase.to_lowercase();
        tokenize(lowered.trim())
            .into_iter()
            .map(|token| self.lemmatizer.lemma(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn canonicalize_all<S: AsRef<str>>(&self, phrases: &[S]) -> Vec<String> {
        phrases
            .iter()
            .map(|p| self.canonicalize(p.as_ref()))
            .collect()
    }
}
