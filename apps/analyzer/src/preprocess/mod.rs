//! Document Preprocessor: cleans whole documents before similarity scoring.
//!
//! Unlike skill canonicalization this strips punctuation and removes stop words.

mod stopwords;

use std::collections::HashSet;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::skill::Lemmatizer;

lazy_static! {
    static ref LABEL_RE: Regex = Regex::new(r"(\w+):").unwrap();
    static ref CAMEL_JOIN_RE: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
}

#[derive(Clone)]
pub struct Preprocessor {
    lemmatizer: Arc<dyn Lemmatizer>,
    stop_words: HashSet<&'static str>,
}

impl Preprocessor {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self {
            lemmatizer,
            stop_words: stopwords::ENGLISH.iter().copied().collect(),
        }
    }

    pub fn preprocess(&self, text: &str) -> String {
        // Text pulled from PDFs often glues "Skills:Python" or "engineerLed" together.
        let text = LABEL_RE.replace_all(text, "$1:\n");
        let text = CAMEL_JOIN_RE.replace_all(&text, "$1 \n$2");
        let text = WHITESPACE_RE.replace_all(&text, " ");
        let text = PUNCTUATION_RE.replace_all(&text, "");
        let text = text.to_lowercase();

        text.split_whitespace()
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| self.lemmatizer.lemma(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
