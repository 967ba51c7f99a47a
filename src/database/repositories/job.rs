use std::collections::HashMap;

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::database::bind::bind_param_query_as;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::job::{JOB_COLUMNS, JOB_SEARCH};
use crate::database::models::{Job, NewJob};
use crate::database::repositories::classify_write_error;
use crate::database::update::partial_update;
use crate::error::ApiError;

const JOB_FIELDS: &str = "id, title, salary, equity, company_handle";

pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Create a job referencing an existing company. Companies are never
    /// silently created; a missing reference is a caller error with no row
    /// inserted.
    pub async fn create(&self, input: &NewJob) -> Result<Job, ApiError> {
        let company = sqlx::query("SELECT handle FROM companies WHERE handle = $1")
            .bind(&input.company_handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if company.is_none() {
            return Err(ApiError::bad_request(format!(
                "No such company: {}",
                input.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            JOB_FIELDS
        );

        sqlx::query_as::<_, Job>(&sql)
            .bind(&input.title)
            .bind(input.salary)
            .bind(input.equity)
            .bind(&input.company_handle)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    ApiError::conflict("Duplicate job"),
                    // Company deleted between check and insert
                    ApiError::bad_request(format!("No such company: {}", input.company_handle)),
                    &sql,
                    &[],
                )
            })
    }

    pub async fn search(&self, criteria: &HashMap<String, String>) -> Result<Vec<Job>, ApiError> {
        let predicate = JOB_SEARCH.build(criteria)?;

        let sql = match &predicate {
            Some(p) => format!("SELECT {} FROM jobs WHERE {} ORDER BY id", JOB_FIELDS, p.clause),
            None => format!("SELECT {} FROM jobs ORDER BY id", JOB_FIELDS),
        };
        let params = predicate.map(|p| p.params).unwrap_or_default();

        let mut query = sqlx::query_as::<_, Job>(&sql);
        for param in params.iter() {
            query = bind_param_query_as(query, param);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::query_execution(&sql, &params, e).into())
    }

    pub async fn get(&self, id: i32) -> Result<Job, ApiError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_FIELDS);

        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?
            .ok_or_else(|| ApiError::not_found(format!("No such job: {}", id)))
    }

    pub async fn update(&self, id: i32, fields: &Map<String, Value>) -> Result<Job, ApiError> {
        let set = partial_update(fields, &JOB_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.set_clause(),
            set.next_param(),
            JOB_FIELDS
        );

        let mut query = sqlx::query_as::<_, Job>(&sql);
        for value in set.values.iter() {
            query = bind_param_query_as(query, value);
        }
        query = query.bind(id);

        match query.fetch_optional(&self.pool).await {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(ApiError::not_found(format!("No such job: {}", id))),
            Err(e) => Err(classify_write_error(
                e,
                ApiError::conflict("Duplicate job"),
                ApiError::bad_request("Invalid job reference"),
                &sql,
                &set.values,
            )),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if deleted.is_none() {
            return Err(ApiError::not_found(format!("No such job: {}", id)));
        }
        Ok(())
    }
}
