use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Map, Value};

use crate::database::models::NewCompany;
use crate::database::repositories::CompanyRepository;
use crate::error::ApiError;
use crate::handlers::{check_patch_fields, to_value};

// handle is recognized but immutable; the assembler drops it
const PATCH_FIELDS: &[&str] = &["handle", "name", "description", "numEmployees", "logoUrl"];

/// GET /companies - filtered listing; no criteria returns every company
pub async fn list(Query(criteria): Query<HashMap<String, String>>) -> Result<Json<Value>, ApiError> {
    let repo = CompanyRepository::new().await?;
    let companies = repo.search(&criteria).await?;
    Ok(Json(json!({ "success": true, "data": companies })))
}

/// POST /companies - admin only (enforced by route middleware)
pub async fn create(Json(input): Json<NewCompany>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let repo = CompanyRepository::new().await?;
    let company = repo.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": company })),
    ))
}

/// GET /companies/:handle - company detail with its jobs
pub async fn get(Path(handle): Path<String>) -> Result<Json<Value>, ApiError> {
    let repo = CompanyRepository::new().await?;
    let company = repo.get(&handle).await?;
    let jobs = repo.jobs_for(&handle).await?;

    let mut data = to_value(&company)?;
    data["jobs"] = to_value(&jobs)?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// PATCH /companies/:handle - partial update, admin only
pub async fn update(
    Path(handle): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    check_patch_fields(&fields, PATCH_FIELDS)?;

    let repo = CompanyRepository::new().await?;
    let company = repo.update(&handle, &fields).await?;
    Ok(Json(json!({ "success": true, "data": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn delete(Path(handle): Path<String>) -> Result<Json<Value>, ApiError> {
    let repo = CompanyRepository::new().await?;
    repo.delete(&handle).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": handle } })))
}
