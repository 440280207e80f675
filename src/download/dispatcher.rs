use super::extractor::Extractor;
use super::types::{DownloadRequest, DownloadResult, DownloadedMedia, ExtractionOptions};
use crate::error::ExtractionFailure;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A held worker permit from [`DownloadDispatcher::acquire`].
#[derive(Debug)]
pub struct WorkerSlot {
    permit: OwnedSemaphorePermit,
}

/// Runs blocking extractions on a bounded set of worker threads.
///
/// `acquire` and `run` suspend only the calling task; the scheduler keeps serving
/// other events while the worker runs. Requests beyond `workers` wait for
/// a free permit. There is no retry and no timeout here.
pub struct DownloadDispatcher {
    extractor: Arc<dyn Extractor>,
    options: Arc<ExtractionOptions>,
    permits: Arc<Semaphore>,
}

impl DownloadDispatcher {
    pub fn new(extractor: Arc<dyn Extractor>, options: ExtractionOptions, workers: usize) -> Self {
        Self {
            extractor,
            options: Arc::new(options),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    #[must_use]
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a free worker. The slot is released when dropped or after
    /// [`run`](Self::run) finishes.
    pub async fn acquire(&self) -> Result<WorkerSlot, ExtractionFailure> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map(|permit| WorkerSlot { permit })
            .map_err(|error| ExtractionFailure::WorkerCrashed(error.to_string()))
    }

    /// Acquire a worker, then run exactly one extraction for `request`.
    pub async fn submit(&self, request: &DownloadRequest) -> DownloadResult {
        match self.acquire().await {
            Ok(slot) => self.run(slot, request).await,
            Err(failure) => DownloadResult::Failed(failure),
        }
    }

    /// Run exactly one extraction on an acquired worker and always produce a result.
    pub async fn run(&self, slot: WorkerSlot, request: &DownloadRequest) -> DownloadResult {
        let permit = slot.permit;
        let extractor = Arc::clone(&self.extractor);
        let options = Arc::clone(&self.options);
        let url = request.url().to_string();
        let request_id = request.id();

        tracing::info!(%request_id, url = %url, extractor = extractor.name(), "dispatching download");

        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            run_extraction(extractor.as_ref(), &url, &options)
        })
        .await;

        let result = match joined {
            Ok(Ok(media)) => DownloadResult::Completed(media),
            Ok(Err(failure)) => DownloadResult::Failed(failure),
            Err(join_error) => {
                DownloadResult::Failed(ExtractionFailure::WorkerCrashed(join_error.to_string()))
            }
        };

        match &result {
            DownloadResult::Completed(media) => tracing::info!(
                %request_id,
                path = %media.path.display(),
                size_bytes = media.size_bytes,
                "download completed"
            ),
            DownloadResult::Failed(failure) => {
                tracing::warn!(%request_id, %failure, "download failed");
            }
        }
        result
    }
}

fn run_extraction(
    extractor: &dyn Extractor,
    url: &str,
    options: &ExtractionOptions,
) -> Result<DownloadedMedia, ExtractionFailure> {
    std::fs::create_dir_all(options.output_dir()).map_err(|e| {
        ExtractionFailure::Other(format!(
            "cannot create download directory {}: {e}",
            options.output_dir().display()
        ))
    })?;

    let extracted = extractor.extract(url, options)?;
    let metadata = std::fs::metadata(&extracted.path)
        .map_err(|_| ExtractionFailure::MissingOutput(extracted.path.display().to_string()))?;

    Ok(DownloadedMedia {
        path: extracted.path,
        title: extracted.title,
        size_bytes: metadata.len(),
    })
}
