//! Streaming download of binary resources (process logs)

use reqwest::Method;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::dispatch::{DOWNLOAD_TIMEOUT, Dispatcher};
use super::fetch::check_status;
use crate::error::Result;

impl Dispatcher {
    /// Authenticated GET of `url`, streaming a 200 body into `destination`
    ///
    /// The file is created (or truncated) before anything is sent. A failure
    /// partway through the stream leaves whatever was already written; a
    /// broken response body surfaces as an `Io` error of kind
    /// `ConnectionAborted`, local write failures keep their own kind.
    /// Returns the number of bytes written.
    pub async fn download(
        &self,
        url: &str,
        not_found_message: &str,
        failure_message: &str,
        destination: &Path,
    ) -> Result<u64> {
        let mut file = File::create(destination).await?;

        let response = self
            .dispatch(Method::GET, url, None, true, Some(DOWNLOAD_TIMEOUT))
            .await?;
        let mut response = check_status(response, not_found_message, failure_message)?;

        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            debug!("Download of {} interrupted: {}", url, e);
            io::Error::new(io::ErrorKind::ConnectionAborted, e)
        })? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Wrote {} bytes to {}", written, destination.display());
        Ok(written)
    }
}
