use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for POST /user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub secret: String,
}

/// Request body for DELETE /user.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub name: String,
}

/// POST /user — register a user in the key/value store.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if req.secret.is_empty() {
        return Err(ApiError::BadRequest("secret must not be empty".to_string()));
    }
    state.users.create_user(&req.name, &req.secret).await?;
    Ok((StatusCode::CREATED, Json(json!({ "name": req.name }))))
}

/// DELETE /user — remove a user from the key/value store.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteUserRequest>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(&req.name).await?;
    Ok(StatusCode::NO_CONTENT)
}
