//! Similarity Ranker: TF-IDF vectors over {job description} ∪ {resumes},
//! cosine similarity against the job description, top-N by score.
//!
//! Weighting follows the usual bag-of-words recipe:
//! - tokens: lowercase runs of 2+ word characters, English stopwords removed
//! - vocabulary: the `MAX_FEATURES` most frequent terms across the corpus
//! - idf: `ln((1 + n) / (1 + df)) + 1`
//! - rows L2-normalized, so cosine similarity is a dot product

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Vocabulary cap. A tunable, not a correctness constraint.
pub const MAX_FEATURES: usize = 1000;
/// How many resumes a match returns at most.
pub const TOP_N: usize = 5;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "for", "former", "formerly",
    "from", "further", "had", "has", "have", "he", "hence", "her", "here", "hereafter", "hereby",
    "herein", "hers", "herself", "him", "himself", "his", "how", "however", "ie", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter", "least", "less",
    "made", "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover", "most",
    "mostly", "much", "must", "my", "myself", "namely", "neither", "never", "nevertheless",
    "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere", "of", "off",
    "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our",
    "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same",
    "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
    "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// A resume's extracted text, keyed by its upload filename.
#[derive(Debug, Clone)]
pub struct ResumeText {
    pub filename: String,
    pub text: String,
}

/// One entry of a ranking. `score` is a percentage with one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResume {
    pub filename: String,
    pub score: f64,
}

/// Fits a TF-IDF vocabulary on a corpus and returns its L2-normalized rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// One row per document, all over the same vocabulary.
    pub fn fit_transform(&self, documents: &[&str]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        // Corpus-wide counts decide which terms make the vocabulary.
        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *corpus_counts.entry(token.as_str()).or_default() += 1;
            }
        }
        let mut terms: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_features);

        let vocabulary: HashMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(column, (term, _))| (*term, column))
            .collect();

        let counts: Vec<Vec<f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&column) = vocabulary.get(token.as_str()) {
                        row[column] += 1.0;
                    }
                }
                row
            })
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = (0..vocabulary.len())
            .map(|column| {
                let df = counts.iter().filter(|row| row[column] > 0.0).count() as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        counts
            .into_iter()
            .map(|mut row| {
                for (value, weight) in row.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                l2_normalize(&mut row);
                row
            })
            .collect()
    }
}

/// Ranks `resumes` against `job_description`, best first, at most `TOP_N` entries.
///
/// Callers reject an empty job description or an empty resume list first;
/// an empty list here simply yields an empty ranking. Equal scores keep input order.
pub fn rank_resumes(job_description: &str, resumes: &[ResumeText]) -> Vec<RankedResume> {
    if resumes.is_empty() {
        return Vec::new();
    }

    let corpus: Vec<&str> = std::iter::once(job_description)
        .chain(resumes.iter().map(|r| r.text.as_str()))
        .collect();
    let rows = TfidfVectorizer::default().fit_transform(&corpus);
    let Some((job_row, resume_rows)) = rows.split_first() else {
        return Vec::new();
    };

    let mut scored: Vec<(usize, f64)> = resume_rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, cosine_similarity(job_row, row)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(TOP_N.min(resumes.len()))
        .map(|(i, similarity)| RankedResume {
            filename: resumes[i].filename.clone(),
            score: to_percent(similarity),
        })
        .collect()
}

/// Cosine similarity. Zero vectors score 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot / (magnitude_a * magnitude_b)
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !ENGLISH_STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in row.iter_mut() {
            *value /= norm;
        }
    }
}

/// Similarity in [0, 1] → percentage rounded to one decimal.
fn to_percent(similarity: f64) -> f64 {
    (similarity.clamp(0.0, 1.0) * 1000.0).round() / 10.0
}
