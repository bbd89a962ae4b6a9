//! Axum route handler for single-resume parsing.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_text_blocking, DocumentFormat};
use crate::resume::structurer::{structure_resume, StructuredResume};
use crate::state::AppState;
use crate::uploads::{stage, UploadForm};

/// Multipart field carrying the PDF.
pub const PDF_FIELD: &str = "pdf_doc";

/// POST /process
///
/// Extracts the uploaded PDF's text and returns it structured by the oracle.
/// Oracle failures are surfaced; unparsable oracle output comes back as a degraded record.
pub async fn handle_process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StructuredResume>, AppError> {
    let form = UploadForm::read(multipart).await?;

    let Some(upload) = form.files_named(PDF_FIELD).next() else {
        // A browser that submits the form without a file may send the field as plain text.
        return Err(AppError::InvalidInput(if form.text(PDF_FIELD).is_some() {
            "No file selected.".to_string()
        } else {
            "No file uploaded.".to_string()
        }));
    };
    if upload.file_name.trim().is_empty() {
        return Err(AppError::InvalidInput("No file selected.".to_string()));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, "Parsing '{}' ({} bytes)", upload.file_name, upload.data.len());

    let extension = DocumentFormat::Pdf.extension();
    let staged = stage(&state.config.upload_dir, upload, extension).await?;
    let text = extract_text_blocking(staged.path_buf(), extension.to_string())
        .await
        .map_err(|e| AppError::Processing(e.to_string()))?;
    drop(staged);

    if text.trim().is_empty() {
        return Err(AppError::Processing(
            "No text could be extracted from the PDF.".to_string(),
        ));
    }

    let structured = structure_resume(&text, state.oracle.as_ref())
        .await
        .map_err(|e| AppError::Processing(e.to_string()))?;

    info!(%request_id, degraded = structured.is_degraded(), "Resume parsed");
    Ok(Json(structured))
}
