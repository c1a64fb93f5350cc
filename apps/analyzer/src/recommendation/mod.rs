//! AI Recommendation: improvement advice for a resume against a job description.
//! All LLM calls go through llm_client.

pub mod prompts;

use tracing::info;

use crate::llm_client::prompts::GROUNDED_ADVISOR_SYSTEM;
use crate::llm_client::{GenerationParams, LlmClient, LlmError};
use prompts::RECOMMENDATION_PROMPT_TEMPLATE;

/// Short answers with some variety, matching a chat-style suggestion box.
const RECOMMENDATION_PARAMS: GenerationParams = GenerationParams {
    max_tokens: 300,
    temperature: Some(0.7),
};

#[derive(Clone)]
pub struct Recommender {
    llm: LlmClient,
}

impl Recommender {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn recommend(&self, resume: &str, job_description: &str) -> Result<String, LlmError> {
        let prompt = build_prompt(resume, job_description);
        let answer = self
            .llm
            .call_text(&prompt, GROUNDED_ADVISOR_SYSTEM, RECOMMENDATION_PARAMS)
            .await?;
        info!("Generated recommendation ({} chars)", answer.len());
        Ok(answer)
    }
}

fn build_prompt(resume: &str, job_description: &str) -> String {
    render(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("{resume_text}", resume.trim()),
            ("{jd_text}", job_description.trim()),
        ],
    )
}

/// Single pass over `template`: inserted values are never rescanned for placeholders.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        match values.iter().find(|(placeholder, _)| rest.starts_with(placeholder)) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &rest[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
