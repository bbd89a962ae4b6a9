// Batch matching: keyword gap, TF-IDF ranking, the match pipeline, /match_resumes.

pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod ranker;
