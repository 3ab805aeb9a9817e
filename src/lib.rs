//! Clipgrab - media download job server
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (jobs, manifest, variant selection, formatting)
//! - ports/: Trait definitions (job queue, muxer)
//! - adapters/: Concrete implementations (HTTP fetcher, ffmpeg, in-process queue, routes)
//! - application/: Generic services (grabber pipeline, job store, workers)
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use application::grabber::{MediaGrabber, MediaInfo};
pub use application::jobs::JobService;
pub use config::Config;
