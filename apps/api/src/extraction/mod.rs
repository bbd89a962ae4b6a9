//! Text Extractor: turns an uploaded PDF, DOCX, or plain-text file into a string.
//!
//! Extraction is blocking. Async callers go through `extract_text_blocking`,
//! which moves the work onto tokio's blocking pool.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod docx;
pub mod pdf;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Case-insensitive, with or without a leading dot. `None` for anything unsupported.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// Extracts text from the file at `path`, dispatching on `extension`.
///
/// Unsupported extensions return an empty string without touching the file.
/// Callers treat an empty result as "nothing extracted".
pub fn extract_text(path: &Path, extension: &str) -> Result<String, ExtractError> {
    let Some(format) = DocumentFormat::from_extension(extension) else {
        return Ok(String::new());
    };

    let bytes = std::fs::read(path)?;
    match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(&bytes),
        DocumentFormat::Docx => docx::extract_docx_text(&bytes),
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// `extract_text` on the blocking pool.
pub async fn extract_text_blocking(path: PathBuf, extension: String) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&path, &extension))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}
