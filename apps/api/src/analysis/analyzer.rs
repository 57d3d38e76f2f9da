//! Analysis pipeline — orchestrates one analysis request end to end.
//!
//! Flow: build prompts → provider call → normalize → validate → persist.
//!
//! Every stage failure maps to its own error kind (`ProviderError`,
//! `ParseFailure`, `ValidationFailure`, `PersistenceError`) and ends the
//! request; nothing is persisted unless validation passed.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::normalizer::normalize;
use crate::analysis::prompts::{analysis_system, build_user_prompt};
use crate::analysis::query::JobQuery;
use crate::analysis::schema::{validate, AnalysisResult};
use crate::analysis::store::store_analysis;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// A completed, persisted analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    pub result: AnalysisResult,
}

/// Runs the full analysis pipeline for a validated query.
pub async fn run_analysis(
    pool: &PgPool,
    llm: &LlmClient,
    query: JobQuery,
) -> Result<AnalysisOutcome, AppError> {
    info!(
        "Running analysis for {:?} in {:?}",
        query.job_title, query.industry
    );

    let system = analysis_system();
    let user = build_user_prompt(&query);

    let completion = llm.complete(&system, &user).await?;
    debug!("provider returned {} chars", completion.len());

    let value = normalize(&completion)?;
    let result = validate(value).map_err(AppError::ValidationFailure)?;

    let analysis_id = store_analysis(pool, &query, &result).await?;
    info!(
        "Stored analysis {analysis_id} (impact score {})",
        result.overview.impact_score
    );

    Ok(AnalysisOutcome {
        analysis_id,
        result,
    })
}
