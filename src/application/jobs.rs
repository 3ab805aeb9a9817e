use crate::application::store::JobStore;
use crate::domain::jobs::{Job, JobId};
use crate::ports::queue::JobQueuePort;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("link must not be empty")]
    EmptyLink,

    #[error("job queue is closed")]
    QueueClosed,
}

/// Entry point for clients: records jobs and hands them to the workers.
pub struct JobService<Q> {
    store: Arc<JobStore>,
    queue: Q,
}

impl<Q> JobService<Q>
where
    Q: JobQueuePort,
{
    pub fn new(store: Arc<JobStore>, queue: Q) -> Self {
        Self { store, queue }
    }

    /// Records a queued job and pushes its id, waiting while the queue is full.
    pub async fn submit(&self, link: &str, name: &str) -> Result<JobId, SubmitError> {
        if link.trim().is_empty() {
            return Err(SubmitError::EmptyLink);
        }

        let id = self.store.create(link, name);
        if self.queue.enqueue_job(id).await.is_err() {
            warn!("queue closed, dropping job {id}");
            self.store.delete(id);
            return Err(SubmitError::QueueClosed);
        }

        info!("queued job {id} for {link}");
        Ok(id)
    }

    pub fn get(&self, id: JobId) -> Option<Job> {
        self.store.get(id)
    }

    pub fn list(&self) -> BTreeMap<JobId, Job> {
        self.store.list()
    }

    /// Removes the record whatever its status. A running worker is not stopped.
    pub fn delete(&self, id: JobId) -> Option<Job> {
        let removed = self.store.delete(id);
        if removed.is_some() {
            info!("deleted job {id}");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::ChannelQueue;
    use crate::domain::jobs::JobStatus;
    use crate::ports::queue::QueueError;
    use async_trait::async_trait;
    use std::time::Duration;

    fn service(capacity: usize) -> (JobService<ChannelQueue>, ChannelQueue) {
        let queue = ChannelQueue::new(capacity);
        (
            JobService::new(Arc::new(JobStore::new()), queue.clone()),
            queue,
        )
    }

    #[tokio::test]
    async fn test_submit_records_and_enqueues() {
        let (service, queue) = service(4);

        let id = service
            .submit("https://host/clip.mp4", "clip")
            .await
            .unwrap();

        let job = service.get(id).unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.link, "https://host/clip.mp4");
        assert_eq!(job.name, "clip");
        assert_eq!(queue.dequeue_job().await, Some(id));
    }

    #[tokio::test]
    async fn test_empty_link_is_rejected_without_side_effects() {
        let (service, queue) = service(4);

        assert_eq!(service.submit("", "x").await, Err(SubmitError::EmptyLink));
        assert_eq!(service.submit("  \t", "x").await, Err(SubmitError::EmptyLink));

        assert!(service.list().is_empty());
        let next = service.submit("https://host/a.mp4", "a").await.unwrap();
        assert_eq!(next, 1);
        assert_eq!(queue.dequeue_job().await, Some(1));
    }

    #[tokio::test]
    async fn test_full_queue_blocks_submission_until_dequeue() {
        let (service, queue) = service(1);
        let service = Arc::new(service);

        service.submit("https://host/a.mp4", "a").await.unwrap();

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.submit("https://host/b.mp4", "b").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        assert_eq!(queue.dequeue_job().await, Some(1));
        let second = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(second, 2);
        assert_eq!(queue.dequeue_job().await, Some(2));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let (service, _queue) = service(4);
        let a = service.submit("https://host/a.mp4", "a").await.unwrap();
        let b = service.submit("https://host/b.mp4", "b").await.unwrap();

        assert_eq!(service.delete(a).map(|job| job.id), Some(a));
        assert!(service.delete(a).is_none());
        assert!(service.get(a).is_none());
        assert_eq!(service.list().keys().copied().collect::<Vec<_>>(), vec![b]);
    }

    struct ClosedQueue;

    #[async_trait]
    impl JobQueuePort for ClosedQueue {
        async fn enqueue_job(&self, _id: JobId) -> Result<(), QueueError> {
            Err(QueueError::Closed)
        }

        async fn dequeue_job(&self) -> Option<JobId> {
            None
        }
    }

    #[tokio::test]
    async fn test_closed_queue_rolls_back_the_record() {
        let service = JobService::new(Arc::new(JobStore::new()), ClosedQueue);

        let result = service.submit("https://host/a.mp4", "a").await;

        assert_eq!(result, Err(SubmitError::QueueClosed));
        assert!(service.list().is_empty());
    }
}
