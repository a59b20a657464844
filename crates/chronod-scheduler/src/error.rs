use thiserror::Error;

use crate::queue::JobId;

/// Errors that can occur within the scheduling core.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The provided schedule definition is invalid or could never run.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// No queued job with the given handle exists.
    #[error("Job not found: {id}")]
    JobNotFound { id: JobId },

    /// No schedule with the given ID exists for the requesting user.
    #[error("Schedule not found: {id}")]
    ScheduleNotFound { id: String },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
