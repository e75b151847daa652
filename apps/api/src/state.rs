use std::sync::Arc;

use crate::errors::AppError;
use crate::recommendation::pipeline::RecommendationPipeline;
use crate::roster::{Roster, RosterError};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup. A load failure is kept so roster routes can report it.
    pub roster: Arc<Result<Roster, RosterError>>,
    pub pipeline: RecommendationPipeline,
}

impl AppState {
    pub fn roster(&self) -> Result<&Roster, AppError> {
        self.roster.as_ref().as_ref().map_err(AppError::from)
    }
}
