pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers as recommendation;
use crate::roster::handlers as roster;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Roster API
        .route("/api/v1/roster", get(roster::handle_list_roster))
        .route(
            "/api/v1/roster/practice-areas",
            get(roster::handle_practice_areas),
        )
        // Recommendation API
        .route(
            "/api/v1/recommendations",
            post(recommendation::handle_recommend),
        )
        .route(
            "/api/v1/recommendations/examples",
            get(recommendation::handle_example_queries),
        )
        .with_state(state)
}
