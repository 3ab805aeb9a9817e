//! Configuration read from the environment.

use crate::adapters::local::MAX_QUEUE_SIZE;
use crate::application::grabber::{GrabberOptions, Preferences};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Directory finished downloads are written to
    pub working_dir: PathBuf,
    /// Number of concurrent download workers
    pub workers: usize,
    /// Job ids held before submissions start waiting
    pub queue_capacity: usize,
    pub preferences: Preferences,
    /// ffmpeg executable, looked up on `PATH` unless absolute
    pub ffmpeg: String,
}

impl Config {
    /// Load configuration from environment variables, honouring a `.env` file.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = Preferences::default();

        Self {
            addr: text("ADDR", "127.0.0.1"),
            port: text("PORT", "8080"),
            working_dir: PathBuf::from(text("WORKING_DIR", "data")),
            workers: parsed(&lookup, "WORKERS", 3).max(1),
            queue_capacity: parsed(&lookup, "QUEUE_CAPACITY", MAX_QUEUE_SIZE).max(1),
            preferences: Preferences {
                video_width: parsed(&lookup, "PREFERRED_VIDEO_WIDTH", defaults.video_width),
                audio_rate: parsed(&lookup, "PREFERRED_AUDIO_RATE", defaults.audio_rate),
            },
            ffmpeg: text("FFMPEG", "ffmpeg"),
        }
    }

    pub fn grabber_options(&self) -> GrabberOptions {
        GrabberOptions {
            working_dir: self.working_dir.clone(),
            preferences: self.preferences,
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }),
        None => default,
    }
}
