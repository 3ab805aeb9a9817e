use clipgrab::adapters::{fetch::HttpFetcher, ffmpeg::FfmpegMuxer, http, local::ChannelQueue};
use clipgrab::application::{
    grabber::MediaGrabber,
    jobs::JobService,
    store::JobStore,
    worker::{WorkerPool, WorkerService},
};
use clipgrab::config::Config;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Adapters
    let muxer = FfmpegMuxer::new(&config.ffmpeg);
    if let Err(e) = muxer.check_available().await {
        error!("ffmpeg is not available ({}): {e}", config.ffmpeg);
        std::process::exit(1);
    }
    let queue = ChannelQueue::new(config.queue_capacity);
    let store = Arc::new(JobStore::new());

    // 2. Application services
    let grabber = MediaGrabber::new(HttpFetcher::new(), muxer, config.grabber_options());
    let worker_service = Arc::new(WorkerService::new(queue.clone(), store.clone(), grabber));
    let jobs = Arc::new(JobService::new(store, queue));

    // 3. Start workers
    let _pool = WorkerPool::start(worker_service, config.workers);

    // 4. HTTP layer
    let app = http::router(jobs);

    let listener = match tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
    {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}:{}: {e}", config.addr, config.port);
            std::process::exit(1);
        }
    };
    info!(
        "listening at {}:{}, saving to {:?}",
        config.addr, config.port, config.working_dir
    );
    if let Err(e) = axum::serve(listener, app).await {
        error!("server failed: {e}");
        std::process::exit(1);
    }
}
