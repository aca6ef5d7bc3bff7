//! Transfer of a single result file

use std::path::{Path, PathBuf};

use reqwest::Response;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use super::OrdersClient;
use crate::config::DownloadOptions;
use crate::error::{Error, Result};
use crate::progress::{ProgressUpdate, emit};
use crate::retry::retry_transient;
use crate::types::ResultDescriptor;
use crate::utils::{filename_from_headers, filename_from_url, sanitize_filename};

/// Used when neither the manifest, the response, nor the URL yields a name
const FALLBACK_FILENAME: &str = "download";

/// An artifact being written: where it goes and how far along it is
#[derive(Debug)]
struct DownloadTask {
    name: String,
    path: PathBuf,
    downloaded: u64,
    total: Option<u64>,
}

impl DownloadTask {
    fn new(name: String, directory: &Path, total: Option<u64>) -> Self {
        let path = directory.join(&name);
        Self {
            name,
            path,
            downloaded: 0,
            total,
        }
    }

    fn advance(&mut self, bytes: usize) -> ProgressUpdate {
        self.downloaded = self.downloaded.saturating_add(bytes as u64);
        ProgressUpdate::FileBytes {
            name: self.name.clone(),
            downloaded: self.downloaded,
            total: self.total,
        }
    }
}

impl OrdersClient {
    /// Download one result into `options.directory`, retrying transient failures
    ///
    /// Returns the final path, which may be a pre-existing file that was left alone.
    pub(super) async fn fetch_artifact(
        &self,
        descriptor: &ResultDescriptor,
        options: &DownloadOptions,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        // Dropping the transfer on cancel drops its temp file with it
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = retry_transient(&options.retry, || self.transfer(descriptor, options)) => result,
        };

        if let Err(e) = &result
            && !matches!(e, Error::Cancelled)
        {
            tracing::warn!(location = %descriptor.location, error = %e, "artifact download failed");
            emit(
                self.progress.as_ref(),
                ProgressUpdate::FileFailed {
                    location: descriptor.location.clone(),
                    name: descriptor.name.as_deref().and_then(sanitize_filename),
                    error: e.to_string(),
                },
            );
        }

        result
    }

    async fn transfer(
        &self,
        descriptor: &ResultDescriptor,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        let directory = options.directory.as_path();
        let declared = descriptor.name.as_deref().and_then(sanitize_filename);

        if let Some(name) = &declared {
            let path = directory.join(name);
            if !options.overwrite && exists(&path).await {
                return Ok(self.skip(name, path));
            }
        }

        let response = self.transport.get_stream(&descriptor.location).await?;

        let name = match declared {
            Some(name) => name,
            None => {
                let name = filename_from_headers(response.headers())
                    .or_else(|| filename_from_url(&descriptor.location))
                    .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
                let path = directory.join(&name);
                if !options.overwrite && exists(&path).await {
                    // Body is never read
                    drop(response);
                    return Ok(self.skip(&name, path));
                }
                name
            }
        };

        let task = DownloadTask::new(name, directory, response.content_length());
        self.write_atomically(response, task, directory).await
    }

    /// Stream the body into a temp file beside the destination, then rename it into place
    async fn write_atomically(
        &self,
        mut response: Response,
        mut task: DownloadTask,
        directory: &Path,
    ) -> Result<PathBuf> {
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", task.name))
            .suffix(".part")
            .tempfile_in(directory)
            .map_err(|source| Error::Filesystem {
                path: directory.to_path_buf(),
                source,
            })?;
        let (file, temp_path) = temp.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let local_err = |source: std::io::Error| Error::Filesystem {
            path: temp_path.to_path_buf(),
            source,
        };

        tracing::debug!(file = %task.name, total = ?task.total, "downloading artifact");

        while let Some(chunk) = self.transport.within_stall(response.chunk()).await? {
            file.write_all(&chunk).await.map_err(local_err)?;
            emit(self.progress.as_ref(), task.advance(chunk.len()));
        }
        file.flush().await.map_err(local_err)?;
        file.sync_all().await.map_err(local_err)?;
        drop(file);

        temp_path
            .persist(&task.path)
            .map_err(|e| Error::Filesystem {
                path: task.path.clone(),
                source: e.error,
            })?;

        tracing::info!(file = %task.name, path = ?task.path, bytes = task.downloaded, "artifact downloaded");
        Ok(task.path)
    }

    fn skip(&self, name: &str, path: PathBuf) -> PathBuf {
        tracing::info!(file = %name, path = ?path, "file exists, skipping");
        emit(
            self.progress.as_ref(),
            ProgressUpdate::FileSkipped {
                name: name.to_string(),
                path: path.clone(),
            },
        );
        path
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
