//! Fetch every result of a finished order

use std::path::PathBuf;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use super::OrdersClient;
use crate::config::DownloadOptions;
use crate::error::{ArtifactFailure, Error, Result};
use crate::progress::{ProgressUpdate, emit};
use crate::types::{Order, OrderId};

impl OrdersClient {
    /// Fetch the order, then download all of its results
    ///
    /// See [`download_results_with_cancel`](Self::download_results_with_cancel).
    pub async fn download_order(
        &self,
        id: &OrderId,
        options: &DownloadOptions,
    ) -> Result<Vec<PathBuf>> {
        self.download_order_with_cancel(id, options, &CancellationToken::new())
            .await
    }

    /// Cancellable [`download_order`](Self::download_order)
    pub async fn download_order_with_cancel(
        &self,
        id: &OrderId,
        options: &DownloadOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        let order = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = self.get(id) => result?,
        };
        self.download_results_with_cancel(&order, options, cancel)
            .await
    }

    /// Download all results of an order record already in hand
    ///
    /// See [`download_results_with_cancel`](Self::download_results_with_cancel).
    pub async fn download_results(
        &self,
        order: &Order,
        options: &DownloadOptions,
    ) -> Result<Vec<PathBuf>> {
        self.download_results_with_cancel(order, options, &CancellationToken::new())
            .await
    }

    /// Download all results of `order` into `options.directory`
    ///
    /// Returns one path per result, in manifest order. Existing files are kept
    /// unless `options.overwrite` is set; their paths are still returned.
    ///
    /// # Errors
    ///
    /// - [`Error::OrderNotReady`] if the order has no downloadable results yet (nothing is fetched)
    /// - [`Error::Filesystem`] if the destination directory cannot be created
    /// - [`Error::PartialDownload`] if any artifact failed; the others are still on disk
    /// - [`Error::Cancelled`] if `cancel` fired; no partial files are left behind
    pub async fn download_results_with_cancel(
        &self,
        order: &Order,
        options: &DownloadOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        if !order.state.is_downloadable() {
            return Err(Error::OrderNotReady {
                state: order.state.clone(),
            });
        }

        tokio::fs::create_dir_all(&options.directory)
            .await
            .map_err(|source| Error::Filesystem {
                path: options.directory.clone(),
                source,
            })?;

        let results = order.results();
        let total = results.len();
        let concurrency = options.max_concurrent_downloads.max(1);

        tracing::info!(
            order_id = %order.id,
            total,
            concurrency,
            directory = ?options.directory,
            "downloading order results"
        );

        let mut outcomes: Vec<(usize, Result<PathBuf>)> = Vec::with_capacity(total);
        let mut transfers = futures::stream::iter(results.iter().enumerate())
            .map(move |(index, descriptor)| async move {
                (index, self.fetch_artifact(descriptor, options, cancel).await)
            })
            .buffer_unordered(concurrency);

        while let Some((index, outcome)) = transfers.next().await {
            outcomes.push((index, outcome));
            emit(
                self.progress.as_ref(),
                ProgressUpdate::FilesCompleted {
                    order_id: order.id.clone(),
                    completed: outcomes.len(),
                    total,
                },
            );
        }

        if cancel.is_cancelled() {
            tracing::info!(order_id = %order.id, "download cancelled");
            return Err(Error::Cancelled);
        }

        outcomes.sort_by_key(|(index, _)| *index);

        let mut written = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(path) => written.push(path),
                Err(e) => {
                    let descriptor = &results[index];
                    failed.push(ArtifactFailure {
                        index,
                        location: descriptor.location.clone(),
                        name: descriptor.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if failed.is_empty() {
            tracing::info!(order_id = %order.id, files = written.len(), "order downloaded");
            Ok(written)
        } else {
            tracing::warn!(
                order_id = %order.id,
                failed = failed.len(),
                written = written.len(),
                "order downloaded with failures"
            );
            Err(Error::PartialDownload { failed, written })
        }
    }
}
