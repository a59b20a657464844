use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single next-occurrence computation.
///
/// `at` and `has_more` travel together on purpose: an interval schedule can
/// report an occurrence instant past its window end while `has_more` is
/// still true, and a one-shot schedule keeps reporting its target instant
/// after it has passed. Callers must branch on `has_more`, never on `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextRun {
    /// The computed occurrence instant. Meaningless (Unix epoch) when an
    /// interval window is exhausted.
    pub at: DateTime<Utc>,
    /// Whether any occurrence remains strictly after the queried instant.
    pub has_more: bool,
}

impl NextRun {
    /// Terminal state for a recurrence with nothing left to do.
    pub fn exhausted() -> Self {
        Self {
            at: DateTime::<Utc>::UNIX_EPOCH,
            has_more: false,
        }
    }

    /// The occurrence instant, or `None` once the recurrence is exhausted.
    pub fn upcoming(&self) -> Option<DateTime<Utc>> {
        self.has_more.then_some(self.at)
    }
}

/// Wire-facing snapshot of a managed schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInfo {
    /// UUID v4 string.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Schedule variant name (`once` or `interval`).
    pub kind: String,
    /// Next occurrence as of the listing instant, if any remains.
    pub next_run: Option<DateTime<Utc>>,
    /// Instant the schedule was registered.
    pub created_at: DateTime<Utc>,
}
