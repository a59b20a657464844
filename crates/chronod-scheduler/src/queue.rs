use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{Result, SchedulerError};

/// Stable handle to a queued [`Job`].
///
/// Handles come from a monotonically increasing sequence, so a handle also
/// fixes the pop order between jobs sharing a due instant: first inserted,
/// first out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback a job carries; receives the instant the job was due.
pub type Task = Box<dyn FnOnce(DateTime<Utc>) + Send>;

/// One pending unit of work: a due instant plus the action to run then.
///
/// Jobs are transient. Each one leaves the queue exactly once, by `pop` or
/// by `remove`, and a recurring schedule queues a fresh job per occurrence.
pub struct Job {
    due_at: DateTime<Utc>,
    task: Task,
}

impl Job {
    pub fn new(due_at: DateTime<Utc>, task: impl FnOnce(DateTime<Utc>) + Send + 'static) -> Self {
        Self {
            due_at,
            task: Box::new(task),
        }
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Consume the job, invoking its task with the due instant.
    pub fn run(self) {
        (self.task)(self.due_at);
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("due_at", &self.due_at)
            .finish_non_exhaustive()
    }
}

struct Entry {
    id: JobId,
    job: Job,
}

impl Entry {
    /// Min-heap ordering key: due instant first, insertion order second.
    fn key(&self) -> (DateTime<Utc>, JobId) {
        (self.job.due_at, self.id)
    }
}

/// Binary min-heap of pending jobs keyed by due instant.
///
/// The earliest job is readable in O(1) and removable in O(log n); any job
/// can also be withdrawn from the middle of the heap through the [`JobId`]
/// its insertion returned. A side map from handle to heap slot is updated on
/// every swap, so handles stay valid no matter how entries move around.
#[derive(Default)]
pub struct JobQueue {
    heap: Vec<Entry>,
    slots: HashMap<JobId, usize>,
    next_id: u64,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queue a job. Accepts any due instant, past ones included.
    pub fn insert(&mut self, job: Job) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        let slot = self.heap.len();
        self.heap.push(Entry { id, job });
        self.slots.insert(id, slot);
        self.sift_up(slot);
        id
    }

    /// The earliest queued job, without removing it.
    pub fn peek(&self) -> Option<&Job> {
        self.heap.first().map(|e| &e.job)
    }

    /// Remove and return the earliest queued job.
    pub fn pop(&mut self) -> Option<Job> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    /// Withdraw the job behind `id`, wherever it currently sits.
    pub fn remove(&mut self, id: JobId) -> Result<Job> {
        let slot = *self
            .slots
            .get(&id)
            .ok_or(SchedulerError::JobNotFound { id })?;
        Ok(self.remove_at(slot))
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.slots.get(&id).map(|&slot| &self.heap[slot].job)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.slots.contains_key(&id)
    }

    /// All queued jobs in heap order, which is not sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (JobId, &Job)> {
        self.heap.iter().map(|e| (e.id, &e.job))
    }

    // Caller guarantees `slot` is occupied.
    fn remove_at(&mut self, slot: usize) -> Job {
        let entry = self.heap.swap_remove(slot);
        self.slots.remove(&entry.id);
        if slot < self.heap.len() {
            self.slots.insert(self.heap[slot].id, slot);
            // The filler came from the bottom; it may be too large for this
            // subtree or too small for its new ancestors.
            self.sift_down(slot);
            self.sift_up(slot);
        }
        entry.job
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].id, a);
        self.slots.insert(self.heap[b].id, b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[parent].key() <= self.heap[slot].key() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < self.heap.len() && self.heap[right].key() < self.heap[left].key() {
                child = right;
            }
            if self.heap[slot].key() <= self.heap[child].key() {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }
}
