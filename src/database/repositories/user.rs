use serde_json::{Map, Value};
use sqlx::{PgPool, Row};

use crate::auth::password::{hash_password, verify_password};
use crate::database::bind::bind_param_query_as;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::USER_COLUMNS;
use crate::database::models::{NewUser, User};
use crate::database::repositories::classify_write_error;
use crate::database::update::partial_update;
use crate::error::ApiError;

const USER_FIELDS: &str = "username, first_name, last_name, email, is_admin";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Create a user with a hashed credential. The stored password never
    /// appears in the returned value.
    pub async fn create(&self, input: &NewUser) -> Result<User, ApiError> {
        let hashed = hash_password(&input.password);
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_FIELDS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&input.username)
            .bind(&hashed)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    ApiError::conflict(format!("Duplicate username: {}", input.username)),
                    ApiError::bad_request("Invalid user reference"),
                    &sql,
                    &[],
                )
            })
    }

    /// Verify a presented credential. Failures are deliberately uniform:
    /// a missing user and a wrong password report the same fault.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let sql = format!("SELECT {}, password FROM users WHERE username = $1", USER_FIELDS);

        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        let Some(row) = row else {
            return Err(ApiError::unauthorized("Invalid username/password"));
        };

        let stored: String = row.try_get("password").map_err(DatabaseError::from)?;
        if !verify_password(password, &stored) {
            return Err(ApiError::unauthorized("Invalid username/password"));
        }

        Ok(User {
            username: row.try_get("username").map_err(DatabaseError::from)?,
            first_name: row.try_get("first_name").map_err(DatabaseError::from)?,
            last_name: row.try_get("last_name").map_err(DatabaseError::from)?,
            email: row.try_get("email").map_err(DatabaseError::from)?,
            is_admin: row.try_get("is_admin").map_err(DatabaseError::from)?,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_FIELDS);
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(users)
    }

    pub async fn get(&self, username: &str) -> Result<User, ApiError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_FIELDS);

        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?
            .ok_or_else(|| ApiError::not_found(format!("No such user: {}", username)))
    }

    /// Partial update. A supplied password is re-hashed before it reaches
    /// the assembler; identity fields are dropped by the assembler itself.
    pub async fn update(&self, username: &str, fields: &Map<String, Value>) -> Result<User, ApiError> {
        let mut fields = fields.clone();
        if let Some(plain) = fields.get("password").and_then(Value::as_str) {
            let hashed = hash_password(plain);
            fields.insert("password".to_string(), Value::String(hashed));
        }

        let set = partial_update(&fields, &USER_COLUMNS)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.set_clause(),
            set.next_param(),
            USER_FIELDS
        );

        let mut query = sqlx::query_as::<_, User>(&sql);
        for value in set.values.iter() {
            query = bind_param_query_as(query, value);
        }
        query = query.bind(username);

        match query.fetch_optional(&self.pool).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ApiError::not_found(format!("No such user: {}", username))),
            // Params withheld from diagnostics: they may carry a credential
            Err(e) => Err(classify_write_error(
                e,
                ApiError::conflict("Duplicate user attribute"),
                ApiError::bad_request("Invalid user reference"),
                &sql,
                &[],
            )),
        }
    }

    pub async fn delete(&self, username: &str) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if deleted.is_none() {
            return Err(ApiError::not_found(format!("No such user: {}", username)));
        }
        Ok(())
    }
}
