use crate::domain::jobs::JobId;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("job queue is closed")]
    Closed,
}

#[async_trait]
pub trait JobQueuePort: Send + Sync {
    /// Enqueue a job id. Waits while the queue is full.
    async fn enqueue_job(&self, id: JobId) -> Result<(), QueueError>;

    /// Dequeue the oldest job id, waiting until one is available.
    /// Returns `None` once the queue is closed and drained.
    async fn dequeue_job(&self) -> Option<JobId>;
}
