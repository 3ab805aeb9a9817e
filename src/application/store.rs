use crate::domain::jobs::{Job, JobId, JobStatus};
use chrono::Local;
use parking_lot::Mutex;
use std::collections::BTreeMap;

const TIMESTAMP_FORMAT: &str = "%H:%M %d.%m.%Y";

struct Inner {
    jobs: BTreeMap<JobId, Job>,
    next_id: JobId,
}

/// Job records keyed by id, guarded by a single lock.
///
/// Every operation takes the lock once and hands out copies; the map itself
/// never leaves the store.
pub struct JobStore {
    inner: Mutex<Inner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                jobs: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Inserts a queued job and returns its id. Ids are never reused.
    pub fn create(&self, link: &str, name: &str) -> JobId {
        let created_at = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.jobs.insert(id, Job::new(id, link, name, created_at));
        id
    }

    pub fn get(&self, id: JobId) -> Option<Job> {
        self.inner.lock().jobs.get(&id).cloned()
    }

    pub fn list(&self) -> BTreeMap<JobId, Job> {
        self.inner.lock().jobs.clone()
    }

    pub fn delete(&self, id: JobId) -> Option<Job> {
        self.inner.lock().jobs.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves a queued job to `Progress` and returns the worker's private copy.
    ///
    /// `None` when the job was deleted or is not waiting to be processed.
    pub fn begin(&self, id: JobId) -> Option<Job> {
        let mut inner = self.inner.lock();
        let job = inner.jobs.get_mut(&id)?;
        if !job.status.can_advance_to(JobStatus::Progress) {
            return None;
        }
        job.status = JobStatus::Progress;
        Some(job.clone())
    }

    /// Writes a worker's result back.
    ///
    /// The record is only replaced if it still exists and the status change is
    /// a valid lifecycle step, so deleted jobs stay deleted and finished jobs
    /// never move backwards. Returns whether the write happened.
    pub fn finish(&self, job: Job) -> bool {
        let mut inner = self.inner.lock();
        match inner.jobs.get_mut(&job.id) {
            Some(current) if current.status.can_advance_to(job.status) => {
                *current = job;
                true
            }
            _ => false,
        }
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
