//! Axum route handlers for the Analysis and Skills APIs.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisReport, AnalysisRequest};
use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::skill::{MatchResult, SkillStrategy};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
    #[serde(default)]
    pub strategy: SkillStrategy,
    #[serde(default)]
    pub reference_skills: Vec<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchSkillsRequest {
    #[serde(default)]
    pub strategy: SkillStrategy,
    pub reference_skills: Vec<String>,
    pub extracted_skills: Vec<String>,
}

/// An uploaded file before text extraction.
struct Upload {
    content_type: Option<String>,
    file_name: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: `resume` and `job_description` files (PDF, DOCX or plain text),
/// optional `skills` (JSON array or comma/newline separated), `strategy`, `recommend`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut resume: Option<Upload> = None;
    let mut job_description: Option<Upload> = None;
    let mut reference_skills = Vec::new();
    let mut strategy = SkillStrategy::default();
    let mut recommend = true;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "job_description" => {
                let upload = Upload {
                    content_type: field.content_type().map(str::to_string),
                    file_name: field.file_name().map(str::to_string),
                    bytes: field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?,
                };
                if name == "resume" {
                    resume = Some(upload);
                } else {
                    job_description = Some(upload);
                }
            }
            "skills" | "strategy" | "recommend" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                match name.as_str() {
                    "skills" => reference_skills = parse_skill_list(&value),
                    "strategy" => strategy = value.parse()?,
                    _ => recommend = parse_flag(&value)?,
                }
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("job_description file is required".to_string()))?;

    let resume_text = extract_upload(resume).await?;
    let jd_text = extract_upload(job_description).await?;

    let request = AnalysisRequest {
        resume_text,
        jd_text,
        strategy,
        reference_skills,
        threshold: None,
        recommend,
    };
    let report = state.analyzer.analyze(request).await?;
    Ok(Json(report))
}

/// POST /api/v1/analyze/text
///
/// Same pipeline as the upload endpoint for callers that already hold plain text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let report = state.analyzer.analyze(request).await?;
    Ok(Json(report))
}

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let skills = match request.strategy {
        SkillStrategy::Entity => state.analyzer.dynamic_matcher().extract(&request.text),
        SkillStrategy::List => {
            let matcher = state.analyzer.list_matcher();
            let threshold = request.threshold.unwrap_or(matcher.threshold());
            matcher.extract_with_threshold(&request.text, &request.reference_skills, threshold)?
        }
    };
    Ok(Json(ExtractSkillsResponse { skills }))
}

/// POST /api/v1/skills/match
///
/// Empty `reference_skills` is a 400: there is nothing to compare against.
pub async fn handle_match_skills(
    State(state): State<AppState>,
    Json(request): Json<MatchSkillsRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let result = match request.strategy {
        SkillStrategy::Entity => state
            .analyzer
            .dynamic_matcher()
            .match_skills(&request.reference_skills, &request.extracted_skills)?,
        SkillStrategy::List => state
            .analyzer
            .list_matcher()
            .match_skills(&request.reference_skills, &request.extracted_skills)?,
    };
    Ok(Json(result))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn extract_upload(upload: Upload) -> Result<String, AppError> {
    let kind = DocumentKind::detect(upload.content_type.as_deref(), upload.file_name.as_deref())?;
    let text = tokio::task::spawn_blocking(move || extract_text(kind, &upload.bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("text extraction task failed: {e}")))??;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the uploaded document".to_string(),
        ));
    }
    debug!("Extracted {} chars from {:?} upload", text.len(), kind);
    Ok(text)
}

/// Accepts a JSON array of strings or a comma/newline separated list.
fn parse_skill_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Validation(format!(
            "recommend must be a boolean, got '{other}'"
        ))),
    }
}
