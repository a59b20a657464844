use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chronod_scheduler::SchedulerError;
use chronod_users::UserError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the scheduler and user-store errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain-level error from the scheduling core.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// A domain-level error from the user store.
    #[error(transparent)]
    User(#[from] UserError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Scheduler(err) => match err {
                SchedulerError::InvalidSchedule(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_SCHEDULE", msg.clone())
                }
                SchedulerError::ScheduleNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("schedule {id} not found"),
                ),
                SchedulerError::JobNotFound { id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("job {id} not found"),
                ),
            },

            ApiError::User(err) => match err {
                UserError::NotFound(name) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("user {name} not found"),
                ),
                UserError::AlreadyExists(name) => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("user {name} already exists"),
                ),
                UserError::Backend(e) => {
                    tracing::error!(error = %e, "key/value store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
