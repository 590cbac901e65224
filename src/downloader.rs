use std::sync::Arc;

use tracing::{info, warn};

use crate::error::DownloadError;
use crate::extractor::{DownloadOptions, Extractor, ProgressHook};
use crate::model::{DownloadRequest, ProgressEvent};

/// Receives completion fractions while a download runs. Called from whichever
/// task drives the extractor, so it must be `Send`.
pub type ProgressCallback = Box<dyn FnMut(ProgressEvent) + Send>;

/// Runs one download per request through an extractor
#[derive(Clone)]
pub struct Downloader {
    extractor: Arc<dyn Extractor>,
}

impl Downloader {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }

    /// Downloads `request`, reporting progress to `on_progress` when given.
    ///
    /// Ticks without usable progress data are dropped silently. Partial files
    /// left by a failed transfer are the extractor's business.
    pub async fn download(
        &self,
        request: DownloadRequest,
        on_progress: Option<ProgressCallback>,
    ) -> Result<(), DownloadError> {
        let progress_hooks: Vec<ProgressHook> = on_progress
            .map(|mut callback| {
                Box::new(move |tick: &crate::progress::ProgressTick| {
                    if let Some(event) = tick.event() {
                        callback(event);
                    }
                }) as ProgressHook
            })
            .into_iter()
            .collect();

        let options = DownloadOptions {
            format: request.format_id.clone(),
            output_template: request.output_name_template.clone(),
            output_dir: request.output_dir.clone(),
            progress_hooks,
        };

        info!(url = %request.url, format = %request.format_id, "download started");
        match self.extractor.download(options, &request.url).await {
            Ok(()) => {
                info!(url = %request.url, "download finished");
                Ok(())
            }
            Err(err) => {
                warn!(url = %request.url, %err, "download failed");
                Err(err)
            }
        }
    }
}
