//! In-process bounded FIFO of job ids.

use crate::domain::jobs::JobId;
use crate::ports::queue::{JobQueuePort, QueueError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Default number of job ids the queue holds before submitters start waiting.
pub const MAX_QUEUE_SIZE: usize = 50;

/// Bounded channel shared by every submitter and every worker.
#[derive(Clone, Debug)]
pub struct ChannelQueue {
    sender: mpsc::Sender<JobId>,
    // mpsc has a single consumer; workers take turns on the receiver
    receiver: Arc<Mutex<mpsc::Receiver<JobId>>>,
}

impl ChannelQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }
}

impl Default for ChannelQueue {
    fn default() -> Self {
        Self::new(MAX_QUEUE_SIZE)
    }
}

#[async_trait]
impl JobQueuePort for ChannelQueue {
    async fn enqueue_job(&self, id: JobId) -> Result<(), QueueError> {
        self.sender.send(id).await.map_err(|_| QueueError::Closed)
    }

    async fn dequeue_job(&self) -> Option<JobId> {
        self.receiver.lock().await.recv().await
    }
}
