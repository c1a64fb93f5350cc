//! Morphological lemmatizer backed by an nlprule English tokenizer binary.
//!
//! Lookup order per token: override table, then the tagger's lemmas. The
//! result is iterated to a fixed point, so lemmatization is idempotent even
//! when the dictionary maps a lemma onward (`t → a → b`).

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock};

use nlprule::Tokenizer;
use tracing::info;

use crate::skill::errors::SkillError;
use crate::skill::normalizer::{Lemmatizer, LookupLemmatizer};
use crate::skill::tokenize::is_single_token;

/// Default location of the nlprule English tokenizer, relative to the working directory.
pub const DEFAULT_TOKENIZER_PATH: &str = "models/nlprule/en_tokenizer.bin";

const CACHE_CAPACITY: usize = 100_000;
const MAX_SETTLE_STEPS: usize = 16;

pub struct NlpruleLemmatizer {
    tokenizer: Mutex<Tokenizer>,
    overrides: LookupLemmatizer,
    cache: RwLock<HashMap<String, String>>,
}

impl NlpruleLemmatizer {
    /// Loads the tokenizer binary at `path`. Fails with `ModelLoad` if it is missing or corrupt.
    pub fn load(path: impl AsRef<Path>, overrides: LookupLemmatizer) -> Result<Self, SkillError> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::new(path).map_err(|e| SkillError::model_load(path, e))?;
        info!(
            "Loaded nlprule tokenizer from {} ({} override entries)",
            path.display(),
            overrides.len()
        );
        Ok(Self {
            tokenizer: Mutex::new(tokenizer),
            overrides,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Lemmas the tagger assigns to `token` read as a one-word sentence.
    /// Empty when the tokenizer splits the token (`c++`, `ci/cd`) or knows no tags.
    fn model_lemmas(&self, token: &str) -> Vec<String> {
        let tokenizer = self.tokenizer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut words = Vec::new();
        for sentence in tokenizer.pipe(token) {
            for tok in sentence.tokens() {
                let text = tok.word().text().as_str();
                if text.trim().is_empty() {
                    continue;
                }
                let lemmas: Vec<String> = tok
                    .word()
                    .tags()
                    .iter()
                    .map(|data| data.lemma().as_str().to_string())
                    .collect();
                words.push((text.to_lowercase(), lemmas));
            }
        }

        match words.as_slice() {
            [(text, lemmas)] if text == token => lemmas.clone(),
            _ => Vec::new(),
        }
    }

    fn cached(&self, token: &str) -> Option<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(token).cloned()
    }

    fn remember(&self, token: &str, lemma: &str) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() < CACHE_CAPACITY {
            cache.insert(token.to_string(), lemma.to_string());
        }
    }
}

impl Lemmatizer for NlpruleLemmatizer {
    fn lemma<'a>(&'a self, token: &'a str) -> Cow<'a, str> {
        let lemma = match self.cached(token) {
            Some(lemma) => lemma,
            None => {
                let lemma = resolve_lemma(token, &self.overrides, |t| self.model_lemmas(t));
                self.remember(token, &lemma);
                lemma
            }
        };
        if lemma == token {
            Cow::Borrowed(token)
        } else {
            Cow::Owned(lemma)
        }
    }
}

/// One lemmatization step followed to its fixed point.
///
/// A step is the override entry when present, otherwise the preferred model
/// lemma, otherwise the token itself.
fn resolve_lemma<F>(token: &str, overrides: &LookupLemmatizer, model_lemmas: F) -> String
where
    F: Fn(&str) -> Vec<String>,
{
    settle(token, |t| match overrides.get(t) {
        Some(lemma) => lemma.to_string(),
        None => pick_lemma(model_lemmas(t).iter().map(String::as_str))
            .unwrap_or_else(|| t.to_string()),
    })
}

/// Shortest lowercase single-token lemma, ties broken alphabetically.
/// `leading → {leading, lead}` picks `lead`.
fn pick_lemma<'a>(lemmas: impl IntoIterator<Item = &'a str>) -> Option<String> {
    lemmas
        .into_iter()
        .map(|lemma| lemma.trim().to_lowercase())
        .filter(|lemma| is_single_token(lemma))
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
}

/// Follows `step` from `token` until a form repeats. A fixed point is returned
/// as is; a longer cycle resolves to its alphabetically smallest member, which
/// every entry point into that cycle agrees on.
fn settle(token: &str, step: impl Fn(&str) -> String) -> String {
    let mut path = vec![token.to_string()];
    for _ in 0..MAX_SETTLE_STEPS {
        let next = step(&path[path.len() - 1]);
        if let Some(start) = path.iter().position(|form| *form == next) {
            return path.split_off(start).into_iter().min().unwrap_or(next);
        }
        path.push(next);
    }
    path.pop().unwrap_or_else(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use super::*;
    use crate::skill::Normalizer;

    /// Stand-in for the tagger with the readings an English dictionary gives.
    fn dictionary(token: &str) -> Vec<String> {
        let lemmas: &[&str] = match token {
            "clouds" => &["cloud"],
            "studies" => &["study", "study"],
            "negotiated" => &["negotiate", "negotiate"],
            "audited" => &["audit", "audit"],
            "contracts" => &["contract", "contract"],
            "spreadsheets" => &["spreadsheet"],
            "leading" => &["leading", "lead"],
            "learning" => &["learning", "learn"],
            "saw" => &["see", "saw"],
            "better" => &["better", "good", "well"],
            "worse" => &["bad", "badly", "worse"],
            _ => &[],
        };
        lemmas.iter().map(|s| s.to_string()).collect()
    }

    fn overrides() -> LookupLemmatizer {
        LookupLemmatizer::english().unwrap()
    }

    #[test]
    fn test_model_reduces_inflections_missing_from_overrides() {
        let table = overrides();
        for (token, expected) in [
            ("clouds", "cloud"),
            ("studies", "study"),
            ("audited", "audit"),
            ("contracts", "contract"),
            ("spreadsheets", "spreadsheet"),
        ] {
            assert!(table.get(token).is_none(), "{token} is already in the table");
            assert_eq!(resolve_lemma(token, &table, dictionary), expected);
        }
    }

    #[test]
    fn test_overrides_win_over_model() {
        let table = overrides();
        // Pinned skill noun: the model alone would pick "learn".
        assert_eq!(resolve_lemma("learning", &table, dictionary), "learning");
        // Table entry: the model alone would pick "saw".
        assert_eq!(resolve_lemma("saw", &table, dictionary), "see");

        let empty = LookupLemmatizer::default();
        assert_eq!(resolve_lemma("learning", &empty, dictionary), "learn");
        assert_eq!(resolve_lemma("saw", &empty, dictionary), "saw");
    }

    #[test]
    fn test_unknown_tokens_are_their_own_lemma() {
        assert_eq!(resolve_lemma("kubernetes", &overrides(), dictionary), "kubernetes");
        assert_eq!(resolve_lemma("c++", &overrides(), dictionary), "c++");
    }

    #[test]
    fn test_pick_lemma_prefers_shortest_then_alphabetical() {
        assert_eq!(pick_lemma(["leading", "lead"]).as_deref(), Some("lead"));
        assert_eq!(pick_lemma(["see", "saw"]).as_deref(), Some("saw"));
        assert_eq!(pick_lemma(["Python"]).as_deref(), Some("python"));
        assert_eq!(pick_lemma(["", "two words"]), None);
        assert_eq!(pick_lemma(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_settle_follows_chains_to_fixed_point() {
        let step = |t: &str| match t {
            "a" => "b".to_string(),
            "b" => "c".to_string(),
            other => other.to_string(),
        };
        assert_eq!(settle("a", step), "c");
        assert_eq!(settle("c", step), "c");
    }

    #[test]
    fn test_settle_resolves_cycles_consistently() {
        let step = |t: &str| match t {
            "x" => "z".to_string(),
            "z" => "y".to_string(),
            "y" => "z".to_string(),
            other => other.to_string(),
        };
        assert_eq!(settle("x", step), "y");
        assert_eq!(settle("y", step), "y");
        assert_eq!(settle("z", step), "y");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = overrides();
        for token in [
            "clouds", "studies", "negotiated", "leading", "learning", "saw", "better", "worse",
            "managed", "running", "python",
        ] {
            let once = resolve_lemma(token, &table, dictionary);
            assert_eq!(
                resolve_lemma(&once, &table, dictionary),
                once,
                "not idempotent for {token}"
            );
        }
    }

    #[test]
    fn test_load_missing_tokenizer_is_model_load_error() {
        let err = NlpruleLemmatizer::load("/nonexistent/en_tokenizer.bin", overrides())
            .err()
            .unwrap();
        assert!(matches!(err, SkillError::ModelLoad { .. }));
    }

    #[test]
    fn test_load_corrupt_tokenizer_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en_tokenizer.bin");
        std::fs::write(&path, b"not a tokenizer").unwrap();
        let err = NlpruleLemmatizer::load(&path, overrides()).err().unwrap();
        assert!(matches!(err, SkillError::ModelLoad { .. }));
    }

    /// The tokenizer binary is a deployment artifact (see models/nlprule/README.md).
    /// Set NLPRULE_TOKENIZER_PATH or place it at the default path to run this test.
    fn installed_tokenizer() -> Option<PathBuf> {
        let path = std::env::var_os("NLPRULE_TOKENIZER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
                    .join(DEFAULT_TOKENIZER_PATH)
            });
        if path.is_file() {
            Some(path)
        } else {
            eprintln!("skipping: no nlprule tokenizer at {}", path.display());
            None
        }
    }

    #[test]
    fn test_canonicalize_with_installed_tokenizer() {
        let Some(path) = installed_tokenizer() else {
            return;
        };
        let lemmatizer = NlpruleLemmatizer::load(path, overrides()).unwrap();
        let normalizer = Normalizer::new(Arc::new(lemmatizer));

        assert_eq!(normalizer.canonicalize("Clouds"), "cloud");
        assert_eq!(normalizer.canonicalize("Case Studies"), "case study");
        assert_eq!(normalizer.canonicalize("Negotiated Contracts"), "negotiate contract");
        assert_eq!(normalizer.canonicalize("Spreadsheets"), "spreadsheet");
        assert_eq!(normalizer.canonicalize("Machine Learning"), "machine learning");

        for phrase in [
            "Case Studies",
            "Negotiated Contracts",
            "Mentored Engineers",
            "Wrote Specifications",
            "Built Dashboards",
            "Led Migrations",
        ] {
            let once = normalizer.canonicalize(phrase);
            assert_eq!(normalizer.canonicalize(&once), once, "not idempotent for {phrase}");
        }
    }
}
