//! Match pipeline: ranks a batch of resumes against a job description and
//! reports the job keywords none of them cover.
//!
//! Flow: validate, extract each file (skip empties), rank, structure each
//! resume, aggregate keywords, diff against the job description.
//!
//! Extraction and the rest are separate steps so callers can release each
//! upload as soon as its text is out.
//!
//! One bad resume never fails the batch: extraction failures skip the file and
//! oracle failures become degraded records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::extract_text_blocking;
use crate::llm_client::TextOracle;
use crate::matching::keywords::{aggregate_resume_keywords, extract_keywords, missing_keywords};
use crate::matching::ranker::{rank_resumes, RankedResume, ResumeText};
use crate::resume::structurer::{structure_resume, StructuredResume};

/// Shown alongside every match until tailored suggestions exist.
pub const SUGGESTIONS_PLACEHOLDER: &str =
    "Consider working the missing keywords into your resume where they reflect real experience.";

/// A resume file already on disk, with the name the client uploaded it under.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub extension: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub results: Vec<RankedResume>,
    pub missing_keywords: Vec<String>,
    pub suggestions: String,
    /// Uploads that produced no text and took no part in the ranking.
    pub skipped_files: Vec<String>,
}

/// Request-level checks shared by the HTTP handler and the pipeline.
pub fn validate_request(job_description: &str, file_count: usize) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Job description is required.".to_string(),
        ));
    }
    if file_count == 0 {
        return Err(AppError::InvalidInput(
            "Please upload at least one resume.".to_string(),
        ));
    }
    Ok(())
}

/// Text pulled from a batch of uploads, plus the uploads that gave none.
#[derive(Debug, Default)]
pub struct ExtractedBatch {
    pub resumes: Vec<ResumeText>,
    pub skipped_files: Vec<String>,
}

impl ExtractedBatch {
    /// Extracts `file`. Failures and empty text are recorded as skipped, never returned.
    pub async fn add(&mut self, file: &ResumeFile) {
        match extract_text_blocking(file.path.clone(), file.extension.clone()).await {
            Ok(text) if !text.trim().is_empty() => self.resumes.push(ResumeText {
                filename: file.filename.clone(),
                text,
            }),
            Ok(_) => {
                warn!("No text extracted from '{}'; skipping", file.filename);
                self.skipped_files.push(file.filename.clone());
            }
            Err(e) => {
                warn!("Extraction failed for '{}': {e}; skipping", file.filename);
                self.skipped_files.push(file.filename.clone());
            }
        }
    }
}

pub async fn match_resumes(
    job_description: &str,
    files: &[ResumeFile],
    oracle: &dyn TextOracle,
) -> Result<MatchReport, AppError> {
    validate_request(job_description, files.len())?;

    let mut batch = ExtractedBatch::default();
    for file in files {
        batch.add(file).await;
    }

    match_extracted(job_description, batch, oracle).await
}

/// Everything after extraction: rank, structure each resume, keyword gap.
pub async fn match_extracted(
    job_description: &str,
    batch: ExtractedBatch,
    oracle: &dyn TextOracle,
) -> Result<MatchReport, AppError> {
    let ExtractedBatch {
        resumes: extracted,
        skipped_files,
    } = batch;

    if extracted.is_empty() {
        return Err(AppError::NoExtractableText);
    }

    // Step 1: rank
    let results = rank_resumes(job_description, &extracted);
    info!(
        "Ranked {} of {} resumes (top score {:?})",
        results.len(),
        extracted.len(),
        results.first().map(|r| r.score)
    );

    // Step 2: structure every resume for the keyword gap
    let mut parsed = Vec::with_capacity(extracted.len());
    for resume in &extracted {
        let outcome = match structure_resume(&resume.text, oracle).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Oracle failed for '{}': {e}; using degraded record", resume.filename);
                StructuredResume::degraded(String::new(), e.to_string())
            }
        };
        if outcome.is_degraded() {
            warn!("Resume '{}' could not be structured", resume.filename);
        }
        parsed.push(outcome);
    }

    // Step 3: keyword gap
    let job_keywords = extract_keywords(job_description);
    let resume_keywords = aggregate_resume_keywords(parsed.iter().map(StructuredResume::resume));
    let missing_keywords = missing_keywords(&job_keywords, &resume_keywords);

    Ok(MatchReport {
        results,
        missing_keywords,
        suggestions: SUGGESTIONS_PLACEHOLDER.to_string(),
        skipped_files,
    })
}
