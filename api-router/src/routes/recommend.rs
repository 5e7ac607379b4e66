use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use retrieval_pipeline::{MainRecommendation, OtherRecommendation, Recommendation};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub problem: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    #[serde(rename = "Main_Recommendation")]
    pub main_recommendation: MainRecommendationBody,
    #[serde(rename = "Other_Recommendations")]
    pub other_recommendations: Vec<OtherRecommendationBody>,
}

#[derive(Debug, Serialize)]
pub struct MainRecommendationBody {
    #[serde(rename = "Problem")]
    pub problem: String,
    #[serde(rename = "Shloka")]
    pub shloka: String,
    #[serde(rename = "Solution")]
    pub solution: String,
    #[serde(rename = "Similarity")]
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct OtherRecommendationBody {
    #[serde(rename = "Shloka")]
    pub shloka: String,
    #[serde(rename = "Solution")]
    pub solution: String,
    #[serde(rename = "Similarity")]
    pub similarity: f64,
}

impl From<MainRecommendation> for MainRecommendationBody {
    fn from(main: MainRecommendation) -> Self {
        Self {
            problem: main.problem,
            shloka: main.verse,
            solution: main.solution_note,
            similarity: main.similarity,
        }
    }
}

impl From<OtherRecommendation> for OtherRecommendationBody {
    fn from(other: OtherRecommendation) -> Self {
        Self {
            shloka: other.verse,
            solution: other.solution_note,
            similarity: other.similarity,
        }
    }
}

impl From<Recommendation> for RecommendResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            main_recommendation: recommendation.main.into(),
            other_recommendations: recommendation
                .others
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// A missing or `null` problem is treated the same as a blank one.
#[instrument(skip_all)]
pub async fn recommend(
    State(state): State<ApiState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(request) = payload?;
    let problem = request.problem.unwrap_or_default();

    info!(
        problem_chars = problem.chars().count(),
        "Received recommendation request"
    );

    let recommendation = state.index.recommend(&problem).await?;

    Ok(Json(recommendation.into()))
}
