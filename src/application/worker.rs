use crate::application::grabber::{GrabError, MediaGrabber};
use crate::application::store::JobStore;
use crate::domain::jobs::{Job, JobId, JobStatus};
use crate::ports::muxer::Muxer;
use crate::ports::queue::JobQueuePort;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct WorkerService<Q, M> {
    queue: Q,
    store: Arc<JobStore>,
    grabber: MediaGrabber<M>,
}

impl<Q, M> WorkerService<Q, M>
where
    Q: JobQueuePort + 'static,
    M: Muxer + 'static,
{
    pub fn new(queue: Q, store: Arc<JobStore>, grabber: MediaGrabber<M>) -> Self {
        Self {
            queue,
            store,
            grabber,
        }
    }

    /// Pulls job ids until the queue is closed and drained.
    pub async fn run_worker_loop(&self, worker_id: usize) {
        info!("[worker {worker_id}] started");
        while let Some(id) = self.queue.dequeue_job().await {
            self.process_job(id, worker_id).await;
        }
        info!("[worker {worker_id}] queue closed, stopping");
    }

    /// Runs one job to completion. Failures end up on the record, never here.
    pub async fn process_job(&self, id: JobId, worker_id: usize) {
        let Some(mut job) = self.store.begin(id) else {
            debug!("[worker {worker_id}] job {id} is gone or already taken, skipping");
            return;
        };
        info!("[worker {worker_id}] processing job {id}: {}", job.link);

        job.status = match self.grab(&mut job).await {
            Ok(()) => JobStatus::Done,
            Err(e) => {
                warn!("[worker {worker_id}] job {id} for {} failed: {e}", job.link);
                JobStatus::Error
            }
        };
        let status = job.status;

        if self.store.finish(job) {
            info!("[worker {worker_id}] job {id} finished: {status:?}");
        } else {
            debug!("[worker {worker_id}] job {id} was deleted while running");
        }
    }

    async fn grab(&self, job: &mut Job) -> Result<(), GrabError> {
        let info = self.grabber.fetch_info(&job.link).await?;
        job.length = info.duration.clone().unwrap_or_default();
        job.resolution = info.resolution.clone().unwrap_or_default();
        job.file_size = info.file_size.clone().unwrap_or_default();

        let acquired = self.grabber.fetch_data(&info, &job.name).await?;
        job.file = Some(acquired.file);
        if let Some(size) = acquired.file_size {
            job.file_size = size;
        }
        Ok(())
    }
}

/// A fixed number of workers sharing one service.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start<Q, M>(service: Arc<WorkerService<Q, M>>, workers: usize) -> Self
    where
        Q: JobQueuePort + 'static,
        M: Muxer + 'static,
    {
        let handles = (0..workers)
            .map(|worker_id| {
                let service = service.clone();
                tokio::spawn(async move { service.run_worker_loop(worker_id).await })
            })
            .collect();
        info!("started {workers} workers");
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker to stop.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!("worker task ended abnormally: {e}");
            }
        }
    }
}
