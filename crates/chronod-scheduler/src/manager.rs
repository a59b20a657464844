use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, SchedulerError};
use crate::queue::{Job, JobId, JobQueue, Task};
use crate::schedule::Schedule;
use crate::types::ScheduleInfo;

/// Registry entry tying a user-visible schedule to its queued job.
struct ScheduleRecord {
    user_id: String,
    schedule: Schedule,
    job: JobId,
    created_at: DateTime<Utc>,
}

struct ManagerState {
    queue: JobQueue,
    records: HashMap<String, ScheduleRecord>,
}

/// Owns the job queue and the schedule registry behind a single lock.
///
/// Every mutation takes the same `Mutex`, which keeps the registry and the
/// heap consistent with each other and serialises concurrent callers. The
/// current instant is always passed in explicitly, so independent managers
/// behave reproducibly under test.
pub struct ScheduleManager {
    state: Mutex<ManagerState>,
}

impl ScheduleManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManagerState {
                queue: JobQueue::new(),
                records: HashMap::new(),
            }),
        }
    }

    /// Register a schedule for `user_id` and queue its first occurrence.
    ///
    /// A schedule with nothing left to fire as of `now` is rejected rather
    /// than stored as a permanently dead record.
    pub fn create(
        &self,
        now: DateTime<Utc>,
        user_id: &str,
        schedule: Schedule,
        task: Task,
    ) -> Result<ScheduleInfo> {
        let Some(first_at) = schedule.next_run(now).upcoming() else {
            return Err(SchedulerError::InvalidSchedule(
                "no upcoming occurrence".to_string(),
            ));
        };

        let mut state = self.state.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let job = state.queue.insert(Job::new(first_at, task));
        let created = ScheduleInfo {
            id: id.clone(),
            user_id: user_id.to_string(),
            kind: schedule.kind().to_string(),
            next_run: Some(first_at),
            created_at: now,
        };
        state.records.insert(
            id.clone(),
            ScheduleRecord {
                user_id: user_id.to_string(),
                schedule,
                job,
                created_at: now,
            },
        );
        info!(schedule_id = %id, user_id = %user_id, next_run = %first_at, "schedule created");
        Ok(created)
    }

    /// All schedules belonging to `user_id`, oldest first, with their next
    /// occurrence recomputed as of `now`.
    pub fn list(&self, now: DateTime<Utc>, user_id: &str) -> Vec<ScheduleInfo> {
        let state = self.state.lock().unwrap();
        let mut out: Vec<ScheduleInfo> = state
            .records
            .iter()
            .filter(|(_, r)| r.user_id == user_id)
            .map(|(id, r)| ScheduleInfo {
                id: id.clone(),
                user_id: r.user_id.clone(),
                kind: r.schedule.kind().to_string(),
                next_run: r.schedule.next_run(now).upcoming(),
                created_at: r.created_at,
            })
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// Drop a schedule and withdraw its queued job.
    ///
    /// Unknown ids, ids owned by another user, and records whose queue entry
    /// has already been handed out all answer not-found.
    pub fn delete(&self, user_id: &str, schedule_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let owned = matches!(
            state.records.get(schedule_id),
            Some(r) if r.user_id == user_id
        );
        if !owned {
            return Err(not_found(schedule_id));
        }
        let Some(record) = state.records.remove(schedule_id) else {
            return Err(not_found(schedule_id));
        };
        if state.queue.remove(record.job).is_err() {
            return Err(not_found(schedule_id));
        }
        info!(schedule_id = %schedule_id, user_id = %user_id, "schedule deleted");
        Ok(())
    }

    /// Hand out the earliest job once its due instant has arrived.
    ///
    /// This is the extraction point a dispatch loop drives; running the job
    /// is the caller's business. The schedule record stays behind, so a
    /// later delete of it answers not-found instead of pretending the queue
    /// entry was still withdrawable.
    pub fn pop_due(&self, now: DateTime<Utc>) -> Option<Job> {
        let mut state = self.state.lock().unwrap();
        if state.queue.peek().is_some_and(|j| j.due_at() <= now) {
            return state.queue.pop();
        }
        None
    }

    /// Due instant of the earliest queued job, if any.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().queue.peek().map(Job::due_at)
    }

    pub fn pending_jobs(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }
}

impl Default for ScheduleManager {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &str) -> SchedulerError {
    SchedulerError::ScheduleNotFound { id: id.to_string() }
}
