use crate::adapters::fetch::FetchError;
use crate::ports::muxer::MuxError;
use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    #[error("source unreachable: {link}: {source}")]
    UnreachableSource { link: String, source: FetchError },

    #[error("http response not ok ({status}) for {link}")]
    BadStatus { link: String, status: StatusCode },

    #[error("no content type field found for {link}")]
    MissingContentType { link: String },

    #[error("malformed manifest at {link}: {reason}")]
    MalformedManifest { link: String, reason: String },

    #[error("manifest at {link} has no {kind} variant")]
    NoVariant { link: String, kind: &'static str },

    #[error("segment fetch failed for {url}: {reason}")]
    SegmentFetchFailed { url: String, reason: String },

    #[error("mux failed for {output:?}: {source}")]
    MuxFailed { output: PathBuf, source: MuxError },

    #[error("direct download failed for {link}: {reason}")]
    DirectDownloadFailed { link: String, reason: String },

    #[error("unsupported content type `{content_type}` for {link}")]
    UnsupportedContent { link: String, content_type: String },

    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl GrabError {
    pub(crate) fn malformed(link: &str, reason: impl ToString) -> Self {
        Self::MalformedManifest {
            link: link.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
