//! `chronod-scheduler` — in-memory scheduling core: recurrence model, job
//! queue, and the manager that ties them together.
//!
//! # Overview
//!
//! A [`Schedule`] answers one question: given the current instant, when is
//! the next occurrence, and will there ever be another? A [`Job`] pairs an
//! occurrence instant with the callback to run then; the [`JobQueue`] keeps
//! pending jobs in a binary min-heap so the earliest one is always a `peek`
//! away. [`ScheduleManager`] owns both and maps user-visible schedule ids to
//! queued jobs. Actually driving due jobs (popping and running them on a
//! timer) is left to callers.
//!
//! # Schedule variants
//!
//! | Variant    | Behaviour                                             |
//! |------------|-------------------------------------------------------|
//! | `Once`     | Single fire at an absolute UTC instant                |
//! | `Interval` | Fixed-step grid anchored at a start, bounded by an end|

pub mod error;
pub mod manager;
pub mod queue;
pub mod schedule;
pub mod types;

pub use error::{Result, SchedulerError};
pub use manager::ScheduleManager;
pub use queue::{Job, JobId, JobQueue, Task};
pub use schedule::{IntervalSchedule, OnceSchedule, Schedule};
pub use types::{NextRun, ScheduleInfo};
