use sqlx::PgPool;

use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// There is no shared mutable state across requests: the pool and client are
/// cheap cloneable handles, and the normalizer/validator are pure functions.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
}
