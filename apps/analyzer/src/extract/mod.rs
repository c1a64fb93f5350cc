//! Document Text Source: raw text out of uploaded resumes and job descriptions.
//!
//! Parsing internals belong to the underlying crates (`pdf-extract`, `zip`);
//! this module only dispatches on document kind and normalizes failures.

mod docx;

use std::path::Path;

use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from a MIME type, falling back to the file extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Result<Self, ExtractError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            PDF_MIME => return Ok(DocumentKind::Pdf),
            DOCX_MIME => return Ok(DocumentKind::Docx),
            TEXT_MIME => return Ok(DocumentKind::PlainText),
            _ => {}
        }

        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            Some("txt") | Some("md") => Ok(DocumentKind::PlainText),
            _ => Err(ExtractError::UnsupportedType(
                content_type
                    .or(file_name)
                    .unwrap_or("unknown")
                    .to_string(),
            )),
        }
    }
}

/// Extracts plain text from a document. CPU-bound; call from a blocking context.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => docx::extract_text(bytes),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_mime() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), None).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some(DOCX_MIME), Some("cv.bin")).unwrap(),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::detect(Some("text/plain; charset=utf-8"), None).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), Some("Resume.PDF")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(None, Some("jd.txt")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_unsupported() {
        let err = DocumentKind::detect(Some("image/png"), Some("photo.png")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedType(t) if t == "image/png"));
        assert!(DocumentKind::detect(None, None).is_err());
    }

    #[test]
    fn test_plain_text_is_lossy_utf8() {
        let text = extract_text(DocumentKind::PlainText, b"Rust \xff engineer").unwrap();
        assert!(text.starts_with("Rust "));
        assert!(text.ends_with(" engineer"));
    }

    #[test]
    fn test_invalid_pdf_is_error() {
        let err = extract_text(DocumentKind::Pdf, b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
