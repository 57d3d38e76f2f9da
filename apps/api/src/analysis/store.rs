//! Persistence gateway for analyses.
//!
//! The pipeline consumes exactly these operations: store a validated result,
//! fetch the most recent analysis, fetch one by id. A successful store is
//! durable; a failed store surfaces as `PersistenceError`, distinct from
//! analysis errors because the analysis itself succeeded.

use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::query::JobQuery;
use crate::analysis::schema::AnalysisResult;
use crate::models::analysis::JobAnalysisRow;

/// Inserts a completed analysis and returns its id.
pub async fn store_analysis(
    pool: &PgPool,
    query: &JobQuery,
    result: &AnalysisResult,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO job_analyses
            (id, job_title, industry, responsibilities, skills, analysis_result, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'completed')
        "#,
    )
    .bind(id)
    .bind(&query.job_title)
    .bind(&query.industry)
    .bind(query.responsibilities.as_deref().unwrap_or(""))
    .bind(query.skills.as_deref().unwrap_or(""))
    .bind(sqlx::types::Json(result))
    .execute(pool)
    .await?;

    Ok(id)
}

/// Returns the most recently created analysis, if any.
pub async fn fetch_latest(pool: &PgPool) -> Result<Option<JobAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, JobAnalysisRow>(
        "SELECT * FROM job_analyses ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
}

/// Returns one analysis by id.
pub async fn fetch_analysis(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<JobAnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, JobAnalysisRow>("SELECT * FROM job_analyses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
