use async_trait::async_trait;
use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("failed to launch muxer: {0}")]
    Launch(#[from] io::Error),

    /// Non-zero exit; `output` holds the combined stdout and stderr.
    #[error("muxer failed ({status}): {output}")]
    Exit { status: String, output: String },
}

/// Combines one video-only and one audio-only file into a single container
/// without re-encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError>;
}
