use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::database::models::{Credentials, NewUser};
use crate::database::repositories::UserRepository;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// POST /auth/token - exchange a username/password for a signed token
pub async fn token(Json(creds): Json<Credentials>) -> Result<Json<Value>, ApiError> {
    let repo = UserRepository::new().await?;
    let user = repo.authenticate(&creds.username, &creds.password).await?;

    let token = generate_jwt(&Claims::new(user.username, user.is_admin))?;
    Ok(Json(json!({ "success": true, "data": { "token": token } })))
}

/// POST /auth/register - open self-registration; always creates a
/// non-administrator regardless of the payload
pub async fn register(
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let repo = UserRepository::new().await?;
    let user = repo
        .create(&NewUser {
            username: input.username,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_admin: false,
        })
        .await?;

    let token = generate_jwt(&Claims::new(user.username, user.is_admin))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "token": token } })),
    ))
}
