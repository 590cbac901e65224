//! Runs lookups and downloads off the interface thread.
//!
//! Workers are tokio tasks. Each one reports back through an unbounded
//! channel that the interface drains once per frame via [`Controller::poll`],
//! so [`Session`] is only ever touched from the interface thread.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::downloader::{Downloader, ProgressCallback};
use crate::extractor::Extractor;
use crate::formats;
use crate::model::ProgressEvent;
use crate::session::{DownloadOutcome, SearchOutcome, Session};

type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct Controller {
    session: Session,
    extractor: Arc<dyn Extractor>,
    runtime: Handle,
    search_tx: UnboundedSender<SearchOutcome>,
    search_rx: UnboundedReceiver<SearchOutcome>,
    download_tx: UnboundedSender<DownloadOutcome>,
    download_rx: UnboundedReceiver<DownloadOutcome>,
    /// Wakes the interface after a worker posted a message
    notify: Notify,
}

impl Controller {
    pub fn new(extractor: Arc<dyn Extractor>, runtime: Handle, output_dir: Option<PathBuf>) -> Self {
        let (search_tx, search_rx) = unbounded_channel();
        let (download_tx, download_rx) = unbounded_channel();
        Self {
            session: Session::new(output_dir),
            extractor,
            runtime,
            search_tx,
            search_rx,
            download_tx,
            download_rx,
            notify: Arc::new(|| {}),
        }
    }

    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Arc::new(notify);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// "Search formats" clicked. Returns whether a worker was started.
    pub fn search(&mut self, url: &str) -> bool {
        let Some(url) = self.session.begin_search(url) else {
            return false;
        };

        // Launch the lookup on the runtime; the result comes back via `poll`
        let extractor = Arc::clone(&self.extractor);
        let tx = self.search_tx.clone();
        let notify = Arc::clone(&self.notify);
        self.runtime.spawn(async move {
            let outcome = match formats::lookup(extractor.as_ref(), &url).await {
                Ok(info) => SearchOutcome::Found(info),
                Err(err) => {
                    warn!(%url, %err, "lookup failed");
                    SearchOutcome::Failed(err.to_string())
                }
            };
            let _ = tx.send(outcome);
            notify();
        });
        true
    }

    /// "Download" clicked. Returns whether a worker was started.
    pub fn download(&mut self) -> bool {
        let Some(request) = self.session.begin_download() else {
            return false;
        };

        // Launch the download on the runtime
        let downloader = Downloader::new(Arc::clone(&self.extractor));
        let tx = self.download_tx.clone();
        let notify = Arc::clone(&self.notify);
        self.runtime.spawn(async move {
            // Progress travels over the same channel as the final result
            let progress_tx = tx.clone();
            let progress_notify = Arc::clone(&notify);
            let on_progress: ProgressCallback = Box::new(move |event: ProgressEvent| {
                let _ = progress_tx.send(DownloadOutcome::Progress(event.fraction));
                progress_notify();
            });

            let outcome = match downloader.download(request, Some(on_progress)).await {
                Ok(()) => DownloadOutcome::Finished,
                Err(err) => DownloadOutcome::Failed(err.to_string()),
            };
            let _ = tx.send(outcome);
            notify();
        });
        true
    }

    /// Applies every message the workers posted since the last call.
    /// Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        // Search results first, then download progress and results
        while let Ok(outcome) = self.search_rx.try_recv() {
            debug!(?outcome, "search result");
            self.session.finish_search(outcome);
            changed = true;
        }
        while let Ok(outcome) = self.download_rx.try_recv() {
            self.session.apply_download(outcome);
            changed = true;
        }
        changed
    }
}
