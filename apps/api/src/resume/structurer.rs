//! Resume Structurer: one oracle round trip from extracted text to a `ParsedResume`.
//!
//! Flow: prompt → oracle (temperature 0) → `clean_json` → JSON parse → lenient build.
//!
//! Oracle failures propagate. Anything wrong with the *content* of the oracle's
//! answer is recovered here: the caller gets `StructuredResume::Degraded` with the
//! raw output attached, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CompletionRequest, LlmError, TextOracle};
use crate::models::resume::ParsedResume;
use crate::resume::prompts::RESUME_PARSE_SYSTEM;

/// Deterministic sampling.
pub const TEMPERATURE: f32 = 0.0;
/// Room for a full resume's worth of JSON.
pub const MAX_OUTPUT_TOKENS: u32 = 5000;

const DEGRADED_REASON: &str = "Failed to parse resume";

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("No JSON object found in response")]
    NoJsonFound,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A resume the oracle's output could not be parsed into.
/// Serializes as the full (empty) resume shape plus `error` and `raw_output`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradedResume {
    pub error: String,
    pub raw_output: String,
    #[serde(flatten)]
    pub resume: ParsedResume,
}

/// Outcome of structuring one resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredResume {
    Parsed(ParsedResume),
    Degraded(DegradedResume),
}

impl StructuredResume {
    pub fn degraded(raw_output: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Degraded(DegradedResume {
            error: reason.into(),
            raw_output: raw_output.into(),
            resume: ParsedResume::default(),
        })
    }

    /// The resume data; empty for a degraded record.
    pub fn resume(&self) -> &ParsedResume {
        match self {
            Self::Parsed(resume) => resume,
            Self::Degraded(degraded) => &degraded.resume,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// Sends `resume_text` to the oracle and structures the answer.
pub async fn structure_resume(
    resume_text: &str,
    oracle: &dyn TextOracle,
) -> Result<StructuredResume, LlmError> {
    let system = format!("{RESUME_PARSE_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}");
    let raw_output = oracle
        .complete(CompletionRequest {
            system: &system,
            user: resume_text,
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        })
        .await?;

    if raw_output.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(parse_oracle_output(raw_output))
}

/// Sanitizes and parses raw oracle text. Never fails.
pub fn parse_oracle_output(raw_output: String) -> StructuredResume {
    match clean_json(&raw_output).and_then(|cleaned| Ok(serde_json::from_str::<Value>(&cleaned)?)) {
        Ok(value) => {
            let resume = ParsedResume::from_value(&value);
            info!(
                "Structured resume: {} experience, {} education, {} projects",
                resume.experience.len(),
                resume.education.len(),
                resume.projects.len()
            );
            StructuredResume::Parsed(resume)
        }
        Err(e) => {
            warn!("JSON parsing error: {e}; raw output: {raw_output}");
            StructuredResume::degraded(raw_output, DEGRADED_REASON)
        }
    }
}

/// Cuts `text` down to the outermost `{ … }` and strips trailing commas before `}` or `]`.
pub fn clean_json(text: &str) -> Result<String, SanitizeError> {
    let start = text.find('{').ok_or(SanitizeError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(SanitizeError::NoJsonFound)?;
    if end < start {
        return Err(SanitizeError::NoJsonFound);
    }

    Ok(TRAILING_COMMA
        .replace_all(&text[start..=end], "$1")
        .into_owned())
}
