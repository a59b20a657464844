use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{Result, SchedulerError};
use crate::types::NextRun;

/// Defines when a schedule fires.
///
/// `next_run` is pure: same `now` in, same answer out, no state mutated, so
/// it is safe to call repeatedly and from concurrent readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Fire exactly once at an absolute UTC instant.
    Once(OnceSchedule),

    /// Fire on a fixed grid of instants between a start and an end.
    Interval(IntervalSchedule),
}

impl Schedule {
    pub fn once(at: DateTime<Utc>) -> Self {
        Schedule::Once(OnceSchedule::new(at))
    }

    pub fn interval(from: DateTime<Utc>, until: DateTime<Utc>, every: TimeDelta) -> Result<Self> {
        Ok(Schedule::Interval(IntervalSchedule::new(from, until, every)?))
    }

    /// Compute the next occurrence strictly after `now`.
    pub fn next_run(&self, now: DateTime<Utc>) -> NextRun {
        match self {
            Schedule::Once(s) => s.next_run(now),
            Schedule::Interval(s) => s.next_run(now),
        }
    }

    /// Variant name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Schedule::Once(_) => "once",
            Schedule::Interval(_) => "interval",
        }
    }
}

/// A single absolute target instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnceSchedule {
    at: DateTime<Utc>,
}

impl OnceSchedule {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// The target instant is always reported, even after it has passed;
    /// only `has_more` says whether a fire is still ahead.
    pub fn next_run(&self, now: DateTime<Utc>) -> NextRun {
        NextRun {
            at: self.at,
            has_more: now < self.at,
        }
    }
}

/// A fixed-step occurrence grid: `from`, `from + every`, `from + 2*every`, …
/// active while `now` has not passed `until`.
///
/// Construction validates the window and the step so that `next_run` never
/// has to fail: the step must be strictly positive and the whole window must
/// fit signed 64-bit nanosecond arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSchedule {
    from: DateTime<Utc>,
    until: DateTime<Utc>,
    every_ns: i64,
}

impl IntervalSchedule {
    pub fn new(from: DateTime<Utc>, until: DateTime<Utc>, every: TimeDelta) -> Result<Self> {
        if every <= TimeDelta::zero() {
            return Err(SchedulerError::InvalidSchedule(
                "interval must be positive".to_string(),
            ));
        }
        let Some(every_ns) = every.num_nanoseconds() else {
            return Err(SchedulerError::InvalidSchedule(
                "interval too large".to_string(),
            ));
        };
        if until < from {
            return Err(SchedulerError::InvalidSchedule(
                "window ends before it starts".to_string(),
            ));
        }
        // One step past the window end is the largest instant next_run can
        // produce; require it to be representable up front.
        let span = until.signed_duration_since(from);
        if span
            .checked_add(&every)
            .and_then(|d| d.num_nanoseconds())
            .is_none()
        {
            return Err(SchedulerError::InvalidSchedule(
                "window too large".to_string(),
            ));
        }
        Ok(Self {
            from,
            until,
            every_ns,
        })
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn until(&self) -> DateTime<Utc> {
        self.until
    }

    pub fn every(&self) -> TimeDelta {
        TimeDelta::nanoseconds(self.every_ns)
    }

    /// Next grid instant strictly after `now`.
    ///
    /// `has_more` compares `now` against `until` only; the returned instant
    /// may itself land past `until`. Exhaustion is reported once `now` has
    /// passed `until`, with the epoch as placeholder instant.
    pub fn next_run(&self, now: DateTime<Utc>) -> NextRun {
        if now > self.until {
            return NextRun::exhausted();
        }
        if now < self.from {
            return NextRun {
                at: self.from,
                has_more: true,
            };
        }
        let has_more = now < self.until;
        // From here on `from <= now <= until`, so the offsets below stay
        // within the bounds checked at construction.
        let Some(elapsed_ns) = now.signed_duration_since(self.from).num_nanoseconds() else {
            return NextRun::exhausted();
        };
        let steps = elapsed_ns / self.every_ns + 1;
        let Some(offset_ns) = steps.checked_mul(self.every_ns) else {
            return NextRun::exhausted();
        };
        let Some(at) = self
            .from
            .checked_add_signed(TimeDelta::nanoseconds(offset_ns))
        else {
            return NextRun::exhausted();
        };
        NextRun { at, has_more }
    }
}
