//! Document → text extraction for uploaded resumes.
//!
//! Format detection trusts magic bytes first, then the file extension, then the
//! declared content type. PDF goes through `pdf_extract` (which can panic on
//! malformed input, hence `catch_unwind`), DOCX through `docx_lite` over a temp
//! file, and plain text is decoded as lossy UTF-8.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    fn from_extension(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "text" | "md" | "markdown" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            DOCX_CONTENT_TYPE => Some(DocumentFormat::Docx),
            t if t.starts_with("text/") => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

pub fn detect_format(
    bytes: &[u8],
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<DocumentFormat, AppError> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(DocumentFormat::Pdf);
    }
    if bytes.starts_with(ZIP_MAGIC) {
        return Ok(DocumentFormat::Docx);
    }
    if let Some(format) = filename.and_then(DocumentFormat::from_extension) {
        return Ok(format);
    }
    if let Some(format) = content_type.and_then(DocumentFormat::from_content_type) {
        return Ok(format);
    }
    if std::str::from_utf8(bytes).is_ok() && !bytes.contains(&0) {
        return Ok(DocumentFormat::PlainText);
    }
    Err(AppError::UnsupportedMediaType(format!(
        "Cannot determine document type of '{}'; upload a PDF, DOCX or plain text file",
        filename.unwrap_or("upload")
    )))
}

/// Synchronous; call it inside `spawn_blocking`.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, AppError> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };
    debug!("Extracted {} chars from {:?} document", text.len(), format);
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AppError> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            Err(AppError::Extraction(format!("Could not read PDF: {e}")))
        }
        Err(_) => {
            warn!("PDF extraction panicked (malformed PDF)");
            Err(AppError::Extraction("Could not read PDF: malformed document".to_string()))
        }
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let mut file = tempfile::Builder::new()
        .suffix(".docx")
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp file: {e}")))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write temp file: {e}")))?;

    docx_lite::extract_text(file.path()).map_err(|e| {
        warn!("DOCX extraction failed: {e}");
        AppError::Extraction(format!("Could not read DOCX: {e}"))
    })
}
