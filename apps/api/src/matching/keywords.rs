//! Keyword Analyzer: normalized keyword sets and the job-vs-resume gap.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::ParsedResume;

/// Lowercase keywords with set semantics. Ordered, so iteration is deterministic.
pub type KeywordSet = BTreeSet<String>;

const KEYWORD_STOPWORDS: &[&str] = &[
    "and", "or", "the", "for", "with", "a", "an", "of", "to", "in", "on", "by", "at", "from",
    "as", "is", "are", "be", "will", "was", "were", "that", "this",
];

static ALPHA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Alphabetic runs of `text`, lowercased, minus stopwords.
pub fn extract_keywords(text: &str) -> KeywordSet {
    ALPHA_RUN
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .filter(|word| !KEYWORD_STOPWORDS.contains(&word.as_str()))
        .collect()
}

/// Every skill, soft skill, certification field and project field across `resumes`, lowercased.
///
/// Values are kept whole ("machine learning" stays one entry).
pub fn aggregate_resume_keywords<'a, I>(resumes: I) -> KeywordSet
where
    I: IntoIterator<Item = &'a ParsedResume>,
{
    let mut keywords = KeywordSet::new();

    for resume in resumes {
        let values = resume
            .technical_skills
            .values()
            .flatten()
            .map(String::as_str)
            .chain(resume.soft_skills.iter().map(String::as_str))
            .chain(resume.certifications.iter().flat_map(|c| c.text_fields()))
            .chain(resume.projects.iter().flat_map(|p| p.text_fields()));

        keywords.extend(
            values
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty()),
        );
    }

    keywords
}

/// Job keywords the resumes do not cover, sorted.
pub fn missing_keywords(job_keywords: &KeywordSet, resume_keywords: &KeywordSet) -> Vec<String> {
    job_keywords.difference(resume_keywords).cloned().collect()
}
