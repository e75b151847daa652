//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::recommendation::pipeline::{RecommendationOutcome, RecommendationResult};
use crate::recommendation::prompts::EXAMPLE_QUERIES;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    /// Restrict candidates to one practice area. Absent or "All" considers everyone.
    pub practice_area: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExampleQueriesResponse {
    pub examples: Vec<&'static str>,
}

/// POST /api/v1/recommendations
///
/// Runs the recommendation pipeline over the (optionally filtered) roster.
/// Succeeded and EmptyResult are 200s with a `status` discriminator; a backend
/// failure is returned as an error envelope keyed by failure kind.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationResult>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let roster = state.roster()?;
    let subset = roster.filter_by_practice_area(request.practice_area.as_deref());
    if subset.is_empty() {
        return Err(AppError::Validation(
            "No professionals match the selected practice area.".to_string(),
        ));
    }

    info!(
        "Recommending from {} of {} professionals",
        subset.len(),
        roster.len()
    );
    let result = state.pipeline.recommend(&request.query, &subset).await;

    match result.outcome {
        RecommendationOutcome::Failed { kind, message } => Err(AppError::Llm { kind, message }),
        _ => Ok(Json(result)),
    }
}

/// GET /api/v1/recommendations/examples
pub async fn handle_example_queries() -> Json<ExampleQueriesResponse> {
    Json(ExampleQueriesResponse {
        examples: EXAMPLE_QUERIES.to_vec(),
    })
}
