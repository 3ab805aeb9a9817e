use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub type JobId = u64;

/// Lifecycle of a job: `Queued -> Progress -> {Done, Error}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Progress,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Progress)
                | (JobStatus::Progress, JobStatus::Done)
                | (JobStatus::Progress, JobStatus::Error)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Creation time, `HH:MM DD.MM.YYYY`
    #[serde(rename = "timestamp")]
    pub created_at: String,
    pub link: String,
    pub name: String,
    /// Human readable duration, e.g. `3Min`
    pub length: String,
    /// `WxH` of the selected video variant
    pub resolution: String,
    /// Absolute path of the produced file
    pub file: Option<PathBuf>,
    /// Human readable size, e.g. `12.4MiB`
    #[serde(rename = "filesize")]
    pub file_size: String,
}

impl Job {
    pub fn new(id: JobId, link: &str, name: &str, created_at: String) -> Self {
        Self {
            id,
            link: link.to_string(),
            name: name.to_string(),
            created_at,
            ..Default::default()
        }
    }
}
