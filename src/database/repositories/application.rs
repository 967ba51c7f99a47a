use sqlx::{PgPool, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Application;
use crate::database::repositories::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::error::ApiError;

pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Record that a user applied to a job. The pair is unique; a second
    /// attempt is rejected, not upserted. Missing user or job surfaces as
    /// NotFound via the foreign key constraints.
    pub async fn apply(&self, username: &str, job_id: i32) -> Result<Application, ApiError> {
        let sql = "INSERT INTO applications (username, job_id) \
                   VALUES ($1, $2) RETURNING username, job_id";

        sqlx::query_as::<_, Application>(sql)
            .bind(username)
            .bind(job_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.classify_apply_error(e, username, job_id, sql))
    }

    fn classify_apply_error(
        &self,
        err: sqlx::Error,
        username: &str,
        job_id: i32,
        statement: &str,
    ) -> ApiError {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return ApiError::conflict(format!(
                        "User {} already applied to job {}",
                        username, job_id
                    ))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    // The pair references both tables; report whichever is missing
                    let constraint = db_err.constraint().unwrap_or_default();
                    return if constraint.contains("job") {
                        ApiError::not_found(format!("No such job: {}", job_id))
                    } else {
                        ApiError::not_found(format!("No such user: {}", username))
                    };
                }
                _ => {}
            }
        }
        DatabaseError::query_execution(statement, &[], err).into()
    }

    /// Job ids a user has applied to, for the user detail view
    pub async fn job_ids_for(&self, username: &str) -> Result<Vec<i32>, ApiError> {
        let rows = sqlx::query("SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id")
            .bind(username)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("job_id").map_err(DatabaseError::from)?);
        }
        Ok(ids)
    }
}
