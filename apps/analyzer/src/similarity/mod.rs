//! Resume ↔ JD similarity: pluggable, trait-based scorer.
//!
//! Default: `TfIdfSimilarity` (local, deterministic, no network).
//! Optional: `EmbeddingSimilarity` (remote embedding model, enabled by config).
//!
//! `Analyzer` holds an `Arc<dyn TextSimilarity>`, chosen at startup.

pub mod embedding;
pub mod tfidf;

use async_trait::async_trait;
use thiserror::Error;

pub use embedding::EmbeddingSimilarity;
pub use tfidf::TfIdfSimilarity;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding API returned {got} vectors, expected {expected}")]
    MissingEmbeddings { expected: usize, got: usize },

    #[error("Embedding dimensions differ: {0} vs {1}")]
    DimensionMismatch(usize, usize),
}

#[async_trait]
pub trait TextSimilarity: Send + Sync {
    /// Similarity of two documents, higher is closer.
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;

    /// Backend label reported alongside scores.
    fn backend(&self) -> &'static str;
}

/// Cosine similarity of two vectors. Zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch(a.len(), b.len()));
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
