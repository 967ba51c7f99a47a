use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Map, Value};

use crate::database::models::NewJob;
use crate::database::repositories::JobRepository;
use crate::error::ApiError;
use crate::handlers::check_patch_fields;

// id and companyHandle are recognized but immutable; the assembler drops them
const PATCH_FIELDS: &[&str] = &["id", "companyHandle", "title", "salary", "equity"];

/// GET /jobs - filtered listing; no criteria returns every job
pub async fn list(Query(criteria): Query<HashMap<String, String>>) -> Result<Json<Value>, ApiError> {
    let repo = JobRepository::new().await?;
    let jobs = repo.search(&criteria).await?;
    Ok(Json(json!({ "success": true, "data": jobs })))
}

/// POST /jobs - admin only (enforced by route middleware)
pub async fn create(Json(input): Json<NewJob>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let repo = JobRepository::new().await?;
    let job = repo.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": job })),
    ))
}

/// GET /jobs/:id
pub async fn get(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    let repo = JobRepository::new().await?;
    let job = repo.get(id).await?;
    Ok(Json(json!({ "success": true, "data": job })))
}

/// PATCH /jobs/:id - partial update, admin only
pub async fn update(
    Path(id): Path<i32>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    check_patch_fields(&fields, PATCH_FIELDS)?;

    let repo = JobRepository::new().await?;
    let job = repo.update(id, &fields).await?;
    Ok(Json(json!({ "success": true, "data": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn delete(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    let repo = JobRepository::new().await?;
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
