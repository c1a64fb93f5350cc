/// Prompt for resume improvement advice.
/// Placeholders: {resume_text}, {jd_text}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Given the following resume and job description, provide specific, actionable recommendations to improve the resume so it better matches the job description.

Focus on:
- skills and keywords the job description asks for that the resume does not show
- experience in the resume that should be reworded or moved up to match the role
- concrete edits, one per bullet

Resume:
{resume_text}

Job Description:
{jd_text}"#;
