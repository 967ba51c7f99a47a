use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Map, Value};

use crate::database::models::NewUser;
use crate::database::repositories::{ApplicationRepository, UserRepository};
use crate::error::ApiError;
use crate::handlers::{check_patch_fields, to_value};
use crate::middleware::gates;
use crate::middleware::AuthUser;

// username is recognized but immutable; isAdmin is deliberately absent so
// nobody escalates privileges through a partial update
const PATCH_FIELDS: &[&str] = &["username", "firstName", "lastName", "email", "password"];

fn identity(user: &Option<Extension<AuthUser>>) -> Option<&AuthUser> {
    user.as_ref().map(|Extension(u)| u)
}

/// GET /users - admin only (enforced by route middleware)
pub async fn list() -> Result<Json<Value>, ApiError> {
    let repo = UserRepository::new().await?;
    let users = repo.find_all().await?;
    Ok(Json(json!({ "success": true, "data": users })))
}

/// POST /users - admin only; unlike open registration this may create
/// administrators
pub async fn create(Json(input): Json<NewUser>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let repo = UserRepository::new().await?;
    let user = repo.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": user })),
    ))
}

/// GET /users/:username - self or admin; includes applied job ids
pub async fn get(
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Value>, ApiError> {
    gates::require_self_or_admin(identity(&user), &username)?;

    let repo = UserRepository::new().await?;
    let target = repo.get(&username).await?;
    let applications = ApplicationRepository::new().await?.job_ids_for(&username).await?;

    let mut data = to_value(&target)?;
    data["applications"] = json!(applications);
    Ok(Json(json!({ "success": true, "data": data })))
}

/// PATCH /users/:username - self or admin
pub async fn update(
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    gates::require_self_or_admin(identity(&user), &username)?;
    check_patch_fields(&fields, PATCH_FIELDS)?;

    let repo = UserRepository::new().await?;
    let updated = repo.update(&username, &fields).await?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /users/:username - self or admin
pub async fn delete(
    Path(username): Path<String>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Value>, ApiError> {
    gates::require_self_or_admin(identity(&user), &username)?;

    let repo = UserRepository::new().await?;
    repo.delete(&username).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": username } })))
}

/// POST /users/:username/jobs/:id - self or admin; apply to a job
pub async fn apply(
    Path((username, job_id)): Path<(String, i32)>,
    user: Option<Extension<AuthUser>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    gates::require_self_or_admin(identity(&user), &username)?;

    let repo = ApplicationRepository::new().await?;
    let application = repo.apply(&username, job_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "applied": application.job_id } })),
    ))
}
