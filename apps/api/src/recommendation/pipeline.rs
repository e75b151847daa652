//! Recommendation Pipeline — orchestrates one invocation end to end.
//!
//! Flow: Idle → Building (build_prompt) → Requesting (backend) → Parsing (parse_response)
//!       → Succeeded | EmptyResult | Failed.
//!
//! Stateless between invocations. Nothing is written mid-pipeline, so an abandoned
//! request leaves nothing to undo.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::llm_client::{FailureKind, GenerationBackend, LlmError};
use crate::models::professional::ProfessionalRecord;
use crate::models::recommendation::RecommendationRecord;
use crate::recommendation::heuristics::Heuristics;
use crate::recommendation::parser::{parse_response, ParseError, RecordOrdering};
use crate::recommendation::prompt_builder::build_prompt;

/// Non-terminal stages, logged as the invocation advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Building,
    Requesting,
    Parsing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Building => "building",
            PipelineStage::Requesting => "requesting",
            PipelineStage::Parsing => "parsing",
        };
        f.write_str(name)
    }
}

/// Why a successful call produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The answer had no MATCH_START/MATCH_END block at all.
    NoSentinelBlocks,
    /// Blocks were present but none carried a recognized field.
    NoRecognizedFields,
}

/// Terminal state of one invocation. Callers must branch on all three.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Succeeded {
        recommendations: Vec<RecommendationRecord>,
        ordering: RecordOrdering,
    },
    EmptyResult {
        reason: EmptyReason,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl RecommendationOutcome {
    fn failed(err: &LlmError) -> Self {
        RecommendationOutcome::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub invocation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub heuristics_version: String,
    pub candidates_considered: usize,
    #[serde(flatten)]
    pub outcome: RecommendationOutcome,
}

/// Owns the heuristics asset and a handle to the generation backend.
/// Cheap to clone; share one per process.
#[derive(Clone)]
pub struct RecommendationPipeline {
    backend: Arc<dyn GenerationBackend>,
    heuristics: Arc<Heuristics>,
    timeout: Duration,
}

impl RecommendationPipeline {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        heuristics: Arc<Heuristics>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            heuristics,
            timeout,
        }
    }

    /// Runs one invocation. `subset` is rendered in the given order; the caller
    /// is responsible for filtering and sorting it.
    pub async fn recommend(
        &self,
        query: &str,
        subset: &[&ProfessionalRecord],
    ) -> RecommendationResult {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("recommend", %invocation_id, candidates = subset.len());

        let outcome = self.run(query, subset).instrument(span).await;

        RecommendationResult {
            invocation_id,
            generated_at: Utc::now(),
            heuristics_version: self.heuristics.version.clone(),
            candidates_considered: subset.len(),
            outcome,
        }
    }

    async fn run(&self, query: &str, subset: &[&ProfessionalRecord]) -> RecommendationOutcome {
        debug!("stage {} -> {}", PipelineStage::Idle, PipelineStage::Building);
        let prompt = build_prompt(query, subset, &self.heuristics);

        debug!(
            "stage {} -> {} (prompt {} chars)",
            PipelineStage::Building,
            PipelineStage::Requesting,
            prompt.len()
        );
        let raw = match tokio::time::timeout(self.timeout, self.backend.generate(&prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!("Generation backend failed ({:?}): {e}", e.kind());
                return RecommendationOutcome::failed(&e);
            }
            Err(_) => {
                let e = LlmError::ServiceUnavailable(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f32()
                ));
                warn!("Generation backend timed out: {e}");
                return RecommendationOutcome::failed(&e);
            }
        };

        debug!("stage {} -> {}", PipelineStage::Requesting, PipelineStage::Parsing);
        let parsed = parse_response(&raw);
        if let Ok(p) = &parsed {
            debug!(
                "parsed {} records from {} blocks",
                p.records.len(),
                p.blocks_found
            );
        }
        let outcome = match parsed {
            Err(ParseError::NoParseableMatches) => RecommendationOutcome::EmptyResult {
                reason: EmptyReason::NoSentinelBlocks,
            },
            Ok(parsed) if parsed.records.is_empty() => RecommendationOutcome::EmptyResult {
                reason: EmptyReason::NoRecognizedFields,
            },
            Ok(parsed) => RecommendationOutcome::Succeeded {
                recommendations: attach_contacts(parsed.records, subset),
                ordering: parsed.ordering,
            },
        };

        match &outcome {
            RecommendationOutcome::Succeeded {
                recommendations,
                ordering,
            } => info!(
                "Recommendation succeeded: {} matches ({:?} order)",
                recommendations.len(),
                ordering
            ),
            RecommendationOutcome::EmptyResult { reason } => {
                info!("Recommendation produced no matches: {:?}", reason)
            }
            RecommendationOutcome::Failed { .. } => {}
        }

        outcome
    }
}

/// Fills `contact` for records whose name resolves to someone in the subset.
/// Names that don't resolve are left as the model wrote them.
fn attach_contacts(
    records: Vec<RecommendationRecord>,
    subset: &[&ProfessionalRecord],
) -> Vec<RecommendationRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if let Some(name) = record.name.as_deref() {
                record.contact = subset
                    .iter()
                    .find(|p| p.is_named(name))
                    .and_then(|p| p.contact())
                    .map(str::to_string);
            }
            record
        })
        .collect()
}
