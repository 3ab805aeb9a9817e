use crate::ports::muxer::{MuxError, Muxer};
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// `Muxer` backed by the `ffmpeg` command line tool.
#[derive(Clone, Debug)]
pub struct FfmpegMuxer {
    binary: String,
}

impl FfmpegMuxer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs `ffmpeg -version` to make sure the tool can be launched at all.
    pub async fn check_available(&self) -> io::Result<()> {
        let status = Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "{} -version exited with {status}",
                self.binary
            )))
        }
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError> {
        debug!("muxing {:?} + {:?} into {:?}", video, audio, output);

        let result = Command::new(&self.binary)
            .arg("-hide_banner")
            .arg("-i")
            .arg(video)
            .arg("-i")
            .arg(audio)
            .arg("-c")
            .arg("copy")
            .arg(output)
            .output()
            .await?;

        if !result.status.success() {
            return Err(MuxError::Exit {
                status: result.status.to_string(),
                output: combined_output(&result),
            });
        }
        Ok(())
    }
}
