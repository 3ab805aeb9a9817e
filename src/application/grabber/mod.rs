//! Media acquisition pipeline.
//!
//! A grab runs in two stages:
//! - [`MediaGrabber::fetch_info`] probes the link and resolves what to download
//!   (a segmented playlist, a direct file or something unknown) into a [`MediaInfo`].
//! - [`MediaGrabber::fetch_data`] takes that `MediaInfo` and produces the file in
//!   the working directory.

mod error;
mod paths;

pub use error::GrabError;

use crate::adapters::fetch::{FetchError, HttpFetcher};
use crate::domain::humanize::{format_duration, format_size, seconds_to_millis};
use crate::domain::manifest::{Clip, Rendition};
use crate::domain::selection::{select_audio, select_video};
use crate::ports::muxer::Muxer;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use paths::{direct_extension, file_stem, link_directory, normalize_url, segment_extension};
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Total attempts made to reach the link before giving up.
pub const RETRY_COUNT: usize = 2;

/// Container produced by muxing a playlist.
pub const CONTAINER_EXTENSION: &str = ".mkv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub video_width: u32,
    pub audio_rate: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            video_width: 1280,
            audio_rate: 48000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GrabberOptions {
    /// Where finished and interim files are written
    pub working_dir: PathBuf,
    pub preferences: Preferences,
}

#[derive(Debug, Clone)]
pub enum Source {
    /// A JSON manifest, with the chosen video and audio variant indices.
    Playlist { clip: Clip, video: usize, audio: usize },
    /// The link itself is the media file.
    Direct,
    /// Neither a manifest nor media; fetching data will fail.
    Undetermined { content_type: String },
}

/// What `fetch_info` learned about a link.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub link: String,
    pub source: Source,
    /// Extension of the output file, with the dot
    pub extension: String,
    pub duration: Option<String>,
    pub resolution: Option<String>,
    /// Approximate size announced by the server
    pub file_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Acquired {
    pub file: PathBuf,
    pub file_size: Option<String>,
}

pub struct MediaGrabber<M> {
    fetcher: HttpFetcher,
    muxer: M,
    options: GrabberOptions,
}

impl<M: Muxer> MediaGrabber<M> {
    pub fn new(fetcher: HttpFetcher, muxer: M, options: GrabberOptions) -> Self {
        Self {
            fetcher,
            muxer,
            options,
        }
    }

    pub async fn fetch_info(&self, link: &str) -> Result<MediaInfo, GrabError> {
        info!("process url: {link}");
        let response = self.open(link).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| GrabError::MissingContentType {
                link: link.to_string(),
            })?;

        if content_type.contains("json") {
            let body = response
                .bytes()
                .await
                .map_err(|e| GrabError::UnreachableSource {
                    link: link.to_string(),
                    source: FetchError::Transport(e),
                })?;
            let clip = Clip::from_slice(&body).map_err(|e| GrabError::malformed(link, e))?;
            return self.resolve_playlist(link, clip);
        }

        if content_type.contains("video") || content_type.contains("audio") {
            return Ok(MediaInfo {
                link: link.to_string(),
                source: Source::Direct,
                extension: direct_extension(link),
                duration: None,
                resolution: None,
                file_size: response.content_length().map(format_size),
            });
        }

        debug!("content type `{content_type}` of {link} is neither manifest nor media");
        Ok(MediaInfo {
            link: link.to_string(),
            source: Source::Undetermined { content_type },
            extension: String::new(),
            duration: None,
            resolution: None,
            file_size: None,
        })
    }

    pub async fn fetch_data(&self, info: &MediaInfo, name: &str) -> Result<Acquired, GrabError> {
        let dir = &self.options.working_dir;
        fs::create_dir_all(dir)
            .await
            .map_err(|e| GrabError::io(dir, e))?;

        let stem = file_stem(name);
        let destination = std::path::absolute(dir.join(format!("{stem}{}", info.extension)))
            .map_err(|e| GrabError::io(dir, e))?;

        match &info.source {
            Source::Playlist { clip, video, audio } => {
                self.fetch_playlist(&info.link, clip, *video, *audio, &destination)
                    .await?
            }
            Source::Direct => {
                if let Err(e) = self.fetch_direct(&info.link, &destination).await {
                    discard(&[&destination]).await;
                    return Err(e);
                }
            }
            Source::Undetermined { content_type } => {
                return Err(GrabError::UnsupportedContent {
                    link: info.link.clone(),
                    content_type: content_type.clone(),
                })
            }
        }

        let file_size = fs::metadata(&destination)
            .await
            .ok()
            .map(|meta| format_size(meta.len()));
        info!("saved {:?} ({})", destination, file_size.as_deref().unwrap_or("?"));

        Ok(Acquired {
            file: destination,
            file_size,
        })
    }

    /// GETs the link, retrying transport failures. A bad status is final.
    async fn open(&self, link: &str) -> Result<Response, GrabError> {
        let mut attempt = 1;
        loop {
            match self.fetcher.get(link).await {
                Ok(response) => return Ok(response),
                Err(FetchError::Status { status, .. }) => {
                    return Err(GrabError::BadStatus {
                        link: link.to_string(),
                        status,
                    })
                }
                Err(e) if attempt < RETRY_COUNT => {
                    warn!("attempt {attempt} for {link} failed: {e}");
                    attempt += 1;
                }
                Err(e) => {
                    return Err(GrabError::UnreachableSource {
                        link: link.to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    fn resolve_playlist(&self, link: &str, clip: Clip) -> Result<MediaInfo, GrabError> {
        let preferences = self.options.preferences;

        let video = select_video(&clip.video, preferences.video_width).ok_or_else(|| {
            GrabError::NoVariant {
                link: link.to_string(),
                kind: "video",
            }
        })?;
        let audio = select_audio(&clip.audio, preferences.audio_rate).ok_or_else(|| {
            GrabError::NoVariant {
                link: link.to_string(),
                kind: "audio",
            }
        })?;

        let chosen = &clip.video[video];
        if chosen.rendition.segments.is_empty() || clip.audio[audio].rendition.segments.is_empty() {
            return Err(GrabError::malformed(link, "selected variant has no segments"));
        }

        let duration = format_duration(seconds_to_millis(chosen.rendition.duration));
        let resolution = format!("{}x{}", chosen.width, chosen.height);

        info!("clip: {}", clip.id);
        info!("audio index: {audio}");
        info!("video index: {video}");

        Ok(MediaInfo {
            link: link.to_string(),
            source: Source::Playlist { clip, video, audio },
            extension: CONTAINER_EXTENSION.to_string(),
            duration: Some(duration),
            resolution: Some(resolution),
            file_size: None,
        })
    }

    async fn fetch_playlist(
        &self,
        link: &str,
        clip: &Clip,
        video: usize,
        audio: usize,
        destination: &Path,
    ) -> Result<(), GrabError> {
        let video = &clip
            .video
            .get(video)
            .ok_or_else(|| GrabError::NoVariant {
                link: link.to_string(),
                kind: "video",
            })?
            .rendition;
        let audio = &clip
            .audio
            .get(audio)
            .ok_or_else(|| GrabError::NoVariant {
                link: link.to_string(),
                kind: "audio",
            })?
            .rendition;

        // removed when dropped, whatever the outcome
        let video_file = self.interim_file(&clip.id, "video", video)?;
        let audio_file = self.interim_file(&clip.id, "audio", audio)?;

        let result = async {
            self.download_variant(link, &clip.base_url, video, &video_file)
                .await?;
            self.download_variant(link, &clip.base_url, audio, &audio_file)
                .await?;

            remove_if_exists(destination).await?;
            self.muxer
                .mux(&video_file, &audio_file, destination)
                .await
                .map_err(|source| GrabError::MuxFailed {
                    output: destination.to_path_buf(),
                    source,
                })
        }
        .await;

        close_interim(video_file);
        close_interim(audio_file);
        if result.is_err() {
            discard(&[destination]).await;
        }
        result
    }

    /// Reserves a fresh file in the working directory for one variant of one run.
    fn interim_file(
        &self,
        clip_id: &str,
        kind: &str,
        rendition: &Rendition,
    ) -> Result<TempPath, GrabError> {
        let dir = &self.options.working_dir;
        tempfile::Builder::new()
            .prefix(&format!("{}.{kind}.", file_stem(clip_id)))
            .suffix(&first_segment_extension(rendition))
            .tempfile_in(dir)
            .map(NamedTempFile::into_temp_path)
            .map_err(|e| GrabError::io(dir, e))
    }

    /// Writes the init segment followed by every segment, in manifest order, into `path`.
    async fn download_variant(
        &self,
        link: &str,
        clip_base: &str,
        rendition: &Rendition,
        path: &Path,
    ) -> Result<(), GrabError> {
        let raw = format!("{}/{}{}", link_directory(link), clip_base, rendition.base_url);
        let base_url = normalize_url(&raw)
            .map_err(|e| GrabError::malformed(link, format!("bad variant url {raw}: {e}")))?;

        let header = STANDARD
            .decode(rendition.init_segment.as_bytes())
            .map_err(|e| GrabError::malformed(link, format!("bad init segment: {e}")))?;

        let file = File::create(path).await.map_err(|e| GrabError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&header)
            .await
            .map_err(|e| GrabError::io(path, e))?;

        for segment in &rendition.segments {
            let url = format!("{base_url}{}", segment.url);
            self.fetcher
                .fetch_into(&url, &mut writer)
                .await
                .map_err(|e| GrabError::SegmentFetchFailed {
                    reason: e.to_string(),
                    url,
                })?;
        }

        writer.flush().await.map_err(|e| GrabError::io(path, e))?;
        debug!(
            "wrote {} segments of {} to {:?}",
            rendition.segments.len(),
            base_url,
            path
        );
        Ok(())
    }

    async fn fetch_direct(&self, link: &str, destination: &Path) -> Result<(), GrabError> {
        let file = File::create(destination)
            .await
            .map_err(|e| GrabError::io(destination, e))?;
        let mut writer = BufWriter::new(file);

        self.fetcher
            .fetch_into(link, &mut writer)
            .await
            .map_err(|e| GrabError::DirectDownloadFailed {
                link: link.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

fn first_segment_extension(rendition: &Rendition) -> String {
    rendition
        .segments
        .first()
        .map(|segment| segment_extension(&segment.url))
        .unwrap_or_default()
}

fn close_interim(path: TempPath) {
    let interim_path = path.to_path_buf();
    if let Err(e) = path.close() {
        warn!("could not remove {:?}: {e}", interim_path);
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), GrabError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GrabError::io(path, e)),
    }
}

/// Best effort removal of leftovers.
async fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("could not remove {:?}: {e}", path);
            }
        }
    }
}
