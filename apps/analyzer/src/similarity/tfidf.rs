//! Word-unigram TF-IDF cosine similarity between two documents.
//!
//! IDF is fitted on the pair itself with smoothing: `idf(t) = ln((1 + n) / (1 + df(t))) + 1`,
//! so shared terms weigh 1.0 and terms unique to one document weigh `ln(1.5) + 1`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use super::{cosine_similarity, SimilarityError, TextSimilarity};

#[derive(Debug, Clone, Default)]
pub struct TfIdfSimilarity;

#[async_trait]
impl TextSimilarity for TfIdfSimilarity {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        tfidf_cosine(&[a, b])
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

fn term_counts(doc: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for term in doc.split_whitespace() {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

fn tfidf_cosine(docs: &[&str; 2]) -> Result<f64, SimilarityError> {
    let counts: Vec<HashMap<&str, usize>> = docs.iter().map(|d| term_counts(d)).collect();

    // BTreeMap gives every vector the same term order.
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &counts {
        for term in doc.keys() {
            *df.entry(*term).or_insert(0) += 1;
        }
    }

    let n = docs.len() as f64;
    let vectors: Vec<Vec<f32>> = counts
        .iter()
        .map(|doc| {
            df.iter()
                .map(|(term, freq)| {
                    let tf = *doc.get(term).unwrap_or(&0) as f64;
                    let idf = ((1.0 + n) / (1.0 + *freq as f64)).ln() + 1.0;
                    (tf * idf) as f32
                })
                .collect()
        })
        .collect();

    cosine_similarity(&vectors[0], &vectors[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identical_documents() {
        let s = TfIdfSimilarity
            .similarity("rust python sql", "rust python sql")
            .await
            .unwrap();
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_disjoint_documents() {
        let s = TfIdfSimilarity.similarity("rust go", "painting music").await.unwrap();
        assert_eq!(s, 0.0);
    }

    #[tokio::test]
    async fn test_partial_overlap_is_between() {
        let s = TfIdfSimilarity
            .similarity("rust python leadership", "rust research")
            .await
            .unwrap();
        assert!(s > 0.0 && s < 1.0, "score was {s}");
    }

    #[tokio::test]
    async fn test_more_overlap_scores_higher() {
        let jd = "rust kubernetes distributed system";
        let close = TfIdfSimilarity
            .similarity("rust kubernetes system", jd)
            .await
            .unwrap();
        let far = TfIdfSimilarity.similarity("rust marketing sale", jd).await.unwrap();
        assert!(close > far);
    }

    #[tokio::test]
    async fn test_empty_document_scores_zero() {
        assert_eq!(TfIdfSimilarity.similarity("", "rust").await.unwrap(), 0.0);
        assert_eq!(TfIdfSimilarity.similarity("", "").await.unwrap(), 0.0);
    }

    #[test]
    fn test_backend_label() {
        assert_eq!(TfIdfSimilarity.backend(), "tfidf");
    }
}
