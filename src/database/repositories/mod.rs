pub mod application;
pub mod company;
pub mod job;
pub mod user;

pub use application::ApplicationRepository;
pub use company::CompanyRepository;
pub use job::JobRepository;
pub use user::UserRepository;

use crate::database::manager::DatabaseError;
use crate::error::ApiError;

// Postgres error codes the repositories classify at the storage boundary
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Classify a write failure: duplicate unique key becomes Conflict, a
/// broken reference becomes the caller-facing `reference_error`, anything
/// else is an unexpected storage fault.
pub(crate) fn classify_write_error(
    err: sqlx::Error,
    conflict: ApiError,
    reference_error: ApiError,
    statement: &str,
    params: &[serde_json::Value],
) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return conflict,
            Some(FOREIGN_KEY_VIOLATION) => return reference_error,
            _ => {}
        }
    }
    DatabaseError::query_execution(statement, params, err).into()
}
