//! Plain HTTP GET helpers used for manifests, segments and direct files.

use futures::TryStreamExt;
use reqwest::{Client, Response, StatusCode};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("http response not ok ({status}) for {url}")]
    Status { status: StatusCode, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issues a GET and returns the response only if its status is 2xx.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!("getting {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// Streams the body of `url` into `writer`, returning the number of bytes copied.
    pub async fn fetch_into<W>(&self, url: &str, writer: &mut W) -> Result<u64, FetchError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let response = self.get(url).await?;

        let body = response.bytes_stream().map_err(io::Error::other);
        let reader = StreamReader::new(body);
        futures::pin_mut!(reader);

        let copied = tokio::io::copy(&mut reader, writer).await?;
        writer.flush().await?;
        Ok(copied)
    }
}
