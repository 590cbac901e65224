//! UI-independent state of the graphical shell.
//!
//! The egui layer only draws what is here and forwards clicks; every rule
//! about what may happen when lives in [`Session`].

use std::path::PathBuf;

use tracing::debug;

use crate::model::{DownloadRequest, FormatDescriptor, VideoInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Searching,
    ResultsShown,
    Downloading,
}

/// Modal message; the window accepts no other input until it is dismissed
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Warning(String),
    Error(String),
    Info(String),
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Warning(_) => "Warning",
            Dialog::Error(_) => "Error",
            Dialog::Info(_) => "Done",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Dialog::Warning(m) | Dialog::Error(m) | Dialog::Info(m) => m,
        }
    }
}

/// Message a search worker sends back to the interface thread
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found(VideoInfo),
    Failed(String),
}

/// Message a download worker sends back to the interface thread
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Progress(f32),
    Finished,
    Failed(String),
}

#[derive(Debug)]
pub struct Session {
    state: ShellState,
    /// Set while a search worker is running; at most one at a time
    search_in_flight: bool,
    info: Option<VideoInfo>,
    selected: Option<usize>,
    progress: f32,
    dialog: Option<Dialog>,
    /// URL of the lookup in flight
    pending_url: Option<String>,
    /// URL of the lookup that produced the current table
    searched_url: String,
    output_dir: Option<PathBuf>,
}

impl Session {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            state: ShellState::Idle,
            search_in_flight: false,
            info: None,
            selected: None,
            progress: 0.0,
            dialog: None,
            pending_url: None,
            searched_url: String::new(),
            output_dir,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn info(&self) -> Option<&VideoInfo> {
        self.info.as_ref()
    }

    pub fn formats(&self) -> &[FormatDescriptor] {
        self.info.as_ref().map(|i| i.formats.as_slice()).unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) {
        self.output_dir = Some(dir);
    }

    pub fn can_search(&self) -> bool {
        !self.search_in_flight && self.state != ShellState::Downloading
    }

    pub fn can_download(&self) -> bool {
        self.info.is_some() && self.state == ShellState::ResultsShown
    }

    pub fn select(&mut self, row: usize) {
        if row < self.formats().len() {
            self.selected = Some(row);
        }
    }

    /// Validates a search request. Returns the trimmed URL when a worker
    /// should be started; otherwise nothing is dispatched.
    pub fn begin_search(&mut self, url: &str) -> Option<String> {
        if !self.can_search() {
            return None;
        }
        let url = url.trim();
        if url.is_empty() {
            self.dialog = Some(Dialog::Warning("Please enter a URL".into()));
            return None;
        }
        debug!(url, "search started");
        self.search_in_flight = true;
        self.pending_url = Some(url.to_string());
        self.state = ShellState::Searching;
        Some(url.to_string())
    }

    pub fn finish_search(&mut self, outcome: SearchOutcome) {
        if !self.search_in_flight {
            return;
        }
        self.search_in_flight = false;
        let url = self.pending_url.take().unwrap_or_default();
        // Both branches replace the table wholesale; an old selection would
        // point into the old list.
        self.selected = None;
        match outcome {
            SearchOutcome::Found(info) => {
                self.info = Some(info);
                self.searched_url = url;
                self.state = ShellState::ResultsShown;
            }
            SearchOutcome::Failed(message) => {
                self.info = None;
                self.dialog = Some(Dialog::Error(format!("Error fetching formats: {message}")));
                self.state = ShellState::Idle;
            }
        }
    }

    /// Validates a download request against the current table. The URL is
    /// the one the table was looked up for, not whatever the field holds now.
    pub fn begin_download(&mut self) -> Option<DownloadRequest> {
        if !self.can_download() {
            return None;
        }
        let Some(row) = self.selected else {
            self.dialog = Some(Dialog::Warning("Please select a format".into()));
            return None;
        };
        let format = &self.formats()[row];
        let request = DownloadRequest::new(self.searched_url.clone(), format.id.clone())
            .with_output_dir(self.output_dir.clone());
        debug!(format = %request.format_id, "download started");
        self.progress = 0.0;
        self.state = ShellState::Downloading;
        Some(request)
    }

    pub fn apply_download(&mut self, outcome: DownloadOutcome) {
        if self.state != ShellState::Downloading {
            return;
        }
        match outcome {
            DownloadOutcome::Progress(fraction) => {
                self.progress = fraction.clamp(0.0, 1.0);
            }
            DownloadOutcome::Finished => {
                self.dialog = Some(Dialog::Info("Download complete!".into()));
                self.progress = 0.0;
                self.state = ShellState::ResultsShown;
            }
            DownloadOutcome::Failed(message) => {
                self.dialog = Some(Dialog::Error(format!("Download failed: {message}")));
                self.progress = 0.0;
                self.state = ShellState::ResultsShown;
            }
        }
    }
}
