//! Axum route handler for batch matching.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::matcher::{
    match_extracted, validate_request, ExtractedBatch, MatchReport, ResumeFile,
};
use crate::state::AppState;
use crate::uploads::{stage, UploadForm, UploadedFile};

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUMES_FIELD: &str = "resumes";

/// POST /match_resumes
///
/// Ranks the uploaded resumes against the job description (top 5) and lists the
/// job keywords none of them cover.
pub async fn handle_match_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let form = UploadForm::read(multipart).await?;

    let job_description = form.text(JOB_DESCRIPTION_FIELD).unwrap_or_default();
    let uploads: Vec<&UploadedFile> = form
        .files_named(RESUMES_FIELD)
        .filter(|f| !f.file_name.trim().is_empty())
        .collect();

    // Fail fast before anything touches the disk.
    validate_request(job_description, uploads.len())?;

    let request_id = Uuid::new_v4();
    info!(%request_id, "Matching {} resumes", uploads.len());

    // Each upload is on disk only while its text is extracted.
    let mut batch = ExtractedBatch::default();
    for upload in uploads {
        let staged = stage(&state.config.match_upload_dir, upload, &upload.extension()).await?;
        batch
            .add(&ResumeFile {
                filename: staged.file_name.clone(),
                extension: staged.extension.clone(),
                path: staged.path_buf(),
            })
            .await;
    }

    let report = match_extracted(job_description, batch, state.oracle.as_ref()).await?;

    info!(
        %request_id,
        "Match complete: {} ranked, {} skipped, {} missing keywords",
        report.results.len(),
        report.skipped_files.len(),
        report.missing_keywords.len()
    );
    Ok(Json(report))
}
