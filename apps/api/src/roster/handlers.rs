use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::professional::{ExpertiseTag, ProfessionalCard};
use crate::roster::{card_listing, ALL_PRACTICE_AREAS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub practice_area: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RosterListResponse {
    pub practice_area: String,
    /// Professionals matching the filter, including those without listed expertise.
    pub showing: usize,
    pub professionals: Vec<ProfessionalCard>,
}

#[derive(Debug, Serialize)]
pub struct PracticeAreasResponse {
    pub practice_areas: Vec<ExpertiseTag>,
}

/// GET /api/v1/roster?practice_area=...
pub async fn handle_list_roster(
    State(state): State<AppState>,
    Query(params): Query<RosterQuery>,
) -> Result<Json<RosterListResponse>, AppError> {
    let roster = state.roster()?;
    let filtered = roster.filter_by_practice_area(params.practice_area.as_deref());

    Ok(Json(RosterListResponse {
        practice_area: params
            .practice_area
            .unwrap_or_else(|| ALL_PRACTICE_AREAS.to_string()),
        showing: filtered.len(),
        professionals: card_listing(&filtered)
            .into_iter()
            .map(ProfessionalCard::from)
            .collect(),
    }))
}

/// GET /api/v1/roster/practice-areas
pub async fn handle_practice_areas(
    State(state): State<AppState>,
) -> Result<Json<PracticeAreasResponse>, AppError> {
    let roster = state.roster()?;
    Ok(Json(PracticeAreasResponse {
        practice_areas: roster.practice_areas(),
    }))
}
