//! Word tokenizer shared by canonicalization, candidate generation and entity labeling.
//!
//! Tokens are runs of letters/digits that may be joined by `.`, `-`, `'`, `/` or `&`
//! and may end in `+` or `#`, so `c++`, `c#`, `node.js`, `ci/cd` and `r&d` survive
//! as single tokens. Stand-alone punctuation is dropped.

use lazy_static::lazy_static;
use regex::{Match, Regex};

lazy_static! {
    static ref WORD_RE: Regex =
        Regex::new(r"[\p{L}\p{N}_]+(?:[.\-'’/&][\p{L}\p{N}_]+)*[+#]*").unwrap();
}

/// Splits `text` into word tokens, preserving case.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Word tokens with their byte offsets in `text`.
pub fn token_spans(text: &str) -> impl Iterator<Item = Match<'_>> {
    WORD_RE.find_iter(text)
}

/// True when `word` tokenizes to exactly itself.
pub fn is_single_token(word: &str) -> bool {
    matches!(tokenize(word).as_slice(), [only] if *only == word)
}
