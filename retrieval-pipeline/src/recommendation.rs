use common::utils::config::{AppConfig, DEFAULT_SOLUTION_NOTE};

/// Tuning for how many matches are returned and the note attached to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationConfig {
    pub top_k: usize,
    pub solution_note: String,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            solution_note: DEFAULT_SOLUTION_NOTE.to_string(),
        }
    }
}

impl From<&AppConfig> for RecommendationConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            top_k: config.recommendation_count.max(1),
            solution_note: config.solution_note.clone(),
        }
    }
}

/// Best match, echoing the caller's original problem text.
#[derive(Debug, Clone, PartialEq)]
pub struct MainRecommendation {
    pub problem: String,
    pub verse: String,
    pub solution_note: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherRecommendation {
    pub verse: String,
    pub solution_note: String,
    pub similarity: f64,
}

/// Ranked answer to one query; `others` is ordered by descending similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub main: MainRecommendation,
    pub others: Vec<OtherRecommendation>,
}
