//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::analyzer::{run_analysis, AnalysisOutcome};
use crate::analysis::query::JobQuery;
use crate::analysis::store::{fetch_analysis, fetch_latest};
use crate::errors::AppError;
use crate::models::analysis::JobAnalysisRow;
use crate::state::AppState;

/// Request body for POST /analyze. All fields optional at the wire level so
/// that missing input maps to a 400 `InvalidQuery`, not a deserialization
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub responsibilities: Option<String>,
    pub skills: Option<String>,
}

/// POST /analyze
///
/// Validates input, runs the full pipeline (prompt → provider → normalize →
/// validate → persist) and returns the stored result with its id.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let query = JobQuery::from_parts(
        request.job_title,
        request.industry,
        request.responsibilities,
        request.skills,
    )
    .map_err(|violations| {
        AppError::InvalidQuery(
            violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;

    let outcome = run_analysis(&state.db, &state.llm, query).await?;
    Ok(Json(outcome))
}

/// GET /analyze/latest
///
/// Returns the most recently persisted analysis.
pub async fn handle_get_latest(
    State(state): State<AppState>,
) -> Result<Json<JobAnalysisRow>, AppError> {
    let row = fetch_latest(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No analyses have been stored yet".to_string()))?;

    Ok(Json(row))
}

/// GET /analyze/:id
///
/// Returns one persisted analysis by id.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<JobAnalysisRow>, AppError> {
    let row = fetch_analysis(&state.db, analysis_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))?;

    Ok(Json(row))
}
