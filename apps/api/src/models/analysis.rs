use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted analysis. `analysis_result` is the validated payload stored
/// as jsonb; rows are immutable after insert and retrieved read-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobAnalysisRow {
    pub id: Uuid,
    pub job_title: String,
    pub industry: String,
    pub responsibilities: String,
    pub skills: String,
    pub analysis_result: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
