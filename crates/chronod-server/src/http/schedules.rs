use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use chronod_scheduler::{Schedule, ScheduleInfo, Task};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for POST /schedule/{user_id}.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateScheduleRequest {
    /// Fire once at an absolute UTC instant.
    Once { at: DateTime<Utc> },

    /// Fire every `every_secs` seconds starting at `from`, while `until`
    /// has not passed.
    Interval {
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        every_secs: u64,
    },
}

impl CreateScheduleRequest {
    fn into_schedule(self) -> ApiResult<Schedule> {
        match self {
            CreateScheduleRequest::Once { at } => Ok(Schedule::once(at)),
            CreateScheduleRequest::Interval {
                from,
                until,
                every_secs,
            } => {
                let every = i64::try_from(every_secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .ok_or_else(|| {
                        ApiError::BadRequest("every_secs is too large".to_string())
                    })?;
                Ok(Schedule::interval(from, until, every)?)
            }
        }
    }
}

/// POST /schedule/{user_id} — register a schedule and queue its first run.
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ScheduleInfo>)> {
    let schedule = req.into_schedule()?;
    let created = state
        .scheduler
        .create(Utc::now(), &user_id, schedule, fire_logger(&user_id))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /schedule/{user_id} — all schedules belonging to the user.
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    let schedules = state.scheduler.list(Utc::now(), &user_id);
    Json(json!({ "schedules": schedules }))
}

/// DELETE /schedule/{user_id}/{schedule_id} — drop a schedule and its
/// queued job.
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path((user_id, schedule_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.scheduler.delete(&user_id, &schedule_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Task queued for HTTP-created schedules. A dispatch driver popping the
/// job runs this; until one exists it documents what firing means here.
fn fire_logger(user_id: &str) -> Task {
    let user_id = user_id.to_string();
    Box::new(move |at| info!(user_id = %user_id, due_at = %at, "schedule fired"))
}
