use std::collections::HashMap;

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::database::bind::bind_param_query_as;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::company::{COMPANY_COLUMNS, COMPANY_SEARCH};
use crate::database::models::job::Job;
use crate::database::models::{Company, NewCompany};
use crate::database::repositories::classify_write_error;
use crate::database::update::partial_update;
use crate::error::ApiError;

const COMPANY_FIELDS: &str = "handle, name, description, num_employees, logo_url";

pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create(&self, input: &NewCompany) -> Result<Company, ApiError> {
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COMPANY_FIELDS
        );

        sqlx::query_as::<_, Company>(&sql)
            .bind(&input.handle)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.num_employees)
            .bind(&input.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    ApiError::conflict(format!("Duplicate company: {}", input.handle)),
                    ApiError::bad_request("Invalid company reference"),
                    &sql,
                    &[],
                )
            })
    }

    /// Filtered listing. No criteria means the full listing with no WHERE
    /// clause at all; an empty filtered result is an empty list, never 404.
    pub async fn search(&self, criteria: &HashMap<String, String>) -> Result<Vec<Company>, ApiError> {
        let predicate = COMPANY_SEARCH.build(criteria)?;

        let sql = match &predicate {
            Some(p) => format!(
                "SELECT {} FROM companies WHERE {} ORDER BY name",
                COMPANY_FIELDS, p.clause
            ),
            None => format!("SELECT {} FROM companies ORDER BY name", COMPANY_FIELDS),
        };
        let params = predicate.map(|p| p.params).unwrap_or_default();

        let mut query = sqlx::query_as::<_, Company>(&sql);
        for param in params.iter() {
            query = bind_param_query_as(query, param);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::query_execution(&sql, &params, e).into())
    }

    pub async fn get(&self, handle: &str) -> Result<Company, ApiError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_FIELDS);

        sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?
            .ok_or_else(|| ApiError::not_found(format!("No such company: {}", handle)))
    }

    /// The jobs belonging to one company, for the company detail view
    pub async fn jobs_for(&self, handle: &str) -> Result<Vec<Job>, ApiError> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle FROM jobs \
             WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(rows)
    }

    pub async fn update(&self, handle: &str, fields: &Map<String, Value>) -> Result<Company, ApiError> {
        let set = partial_update(fields, &COMPANY_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.set_clause(),
            set.next_param(),
            COMPANY_FIELDS
        );

        let mut query = sqlx::query_as::<_, Company>(&sql);
        for value in set.values.iter() {
            query = bind_param_query_as(query, value);
        }
        query = query.bind(handle);

        match query.fetch_optional(&self.pool).await {
            Ok(Some(company)) => Ok(company),
            Ok(None) => Err(ApiError::not_found(format!("No such company: {}", handle))),
            Err(e) => Err(classify_write_error(
                e,
                ApiError::conflict("Duplicate company name"),
                ApiError::bad_request("Invalid company reference"),
                &sql,
                &set.values,
            )),
        }
    }

    pub async fn delete(&self, handle: &str) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if deleted.is_none() {
            return Err(ApiError::not_found(format!("No such company: {}", handle)));
        }
        Ok(())
    }
}
