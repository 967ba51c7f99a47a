use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Join entity between a user and a job. No attributes beyond the pair,
/// unique together, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub username: String,
    pub job_id: i32,
}
