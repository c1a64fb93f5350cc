//! Similarity via a remote embedding model (OpenAI-compatible `/embeddings` API).
//!
//! Both documents are embedded in one request; the score is the cosine of the two vectors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{cosine_similarity, SimilarityError, TextSimilarity};

pub const DEFAULT_EMBEDDING_MODEL: &str = "mixedbread-ai/mxbai-embed-large-v1";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingSimilarity {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingSimilarity {
    pub fn new(url: String, api_key: Option<String>, model: String) -> Result<Self, SimilarityError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
        })
    }

    async fn embed_pair(&self, a: &str, b: &str) -> Result<(Vec<f32>, Vec<f32>), SimilarityError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: [a, b],
        };

        let mut last_error: Option<SimilarityError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(SimilarityError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = Some(SimilarityError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }
            if !status.is_success() {
                return Err(SimilarityError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }

            let parsed: EmbeddingResponse = response.json().await?;
            return into_pair(parsed);
        }

        Err(last_error.unwrap_or(SimilarityError::Api {
            status: 429,
            message: format!("gave up after {MAX_RETRIES} attempts"),
        }))
    }
}

fn into_pair(mut response: EmbeddingResponse) -> Result<(Vec<f32>, Vec<f32>), SimilarityError> {
    if response.data.len() != 2 {
        return Err(SimilarityError::MissingEmbeddings {
            expected: 2,
            got: response.data.len(),
        });
    }
    response.data.sort_by_key(|d| d.index);
    let second = response.data.pop().map(|d| d.embedding).unwrap_or_default();
    let first = response.data.pop().map(|d| d.embedding).unwrap_or_default();
    Ok((first, second))
}

#[async_trait]
impl TextSimilarity for EmbeddingSimilarity {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        let (ea, eb) = self.embed_pair(a, b).await?;
        debug!("Embedded pair with {} dimensions", ea.len());
        cosine_similarity(&ea, &eb)
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_pair() {
        let body = EmbeddingRequest {
            model: "m",
            input: ["resume", "jd"],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["input"][1], "jd");
    }

    #[test]
    fn test_into_pair_orders_by_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{"data": [
                {"index": 1, "embedding": [0.0, 1.0], "object": "embedding"},
                {"index": 0, "embedding": [1.0, 0.0], "object": "embedding"}
            ], "model": "m"}"#,
        )
        .unwrap();
        let (a, b) = into_pair(response).unwrap();
        assert_eq!(a, vec![1.0, 0.0]);
        assert_eq!(b, vec![0.0, 1.0]);
    }

    #[test]
    fn test_into_pair_requires_two_vectors() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();
        assert!(matches!(
            into_pair(response),
            Err(SimilarityError::MissingEmbeddings { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_backend_label() {
        let s = EmbeddingSimilarity::new(
            "http://localhost:9/v1/embeddings".to_string(),
            None,
            DEFAULT_EMBEDDING_MODEL.to_string(),
        )
        .unwrap();
        assert_eq!(s.backend(), "embedding");
    }
}
