//! In-memory extractor standing in for yt-dlp.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use downtube::progress::ProgressTick;
use downtube::{DownloadError, DownloadOptions, ExtractionError, Extractor, RawFormat, RawInfo};

/// What a download call received
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadCall {
    pub url: String,
    pub format: String,
    pub output_template: String,
}

#[derive(Default)]
pub struct FakeExtractor {
    info: Option<RawInfo>,
    lookup_error: Option<String>,
    ticks: Vec<ProgressTick>,
    download_error: Option<String>,
    lookups: AtomicUsize,
    downloads: Mutex<Vec<DownloadCall>>,
}

pub fn raw_format(id: &str, ext: &str, resolution: Option<&str>, filesize: Option<u64>) -> RawFormat {
    RawFormat {
        format_id: Some(id.to_string()),
        ext: Some(ext.to_string()),
        resolution: resolution.map(str::to_string),
        filesize,
        format_note: Some(format!("note-{id}")),
    }
}

impl FakeExtractor {
    pub fn with_formats(formats: Vec<RawFormat>) -> Self {
        Self {
            info: Some(RawInfo {
                title: Some("Test clip".into()),
                thumbnail: None,
                formats: Some(formats),
            }),
            ..Default::default()
        }
    }

    pub fn failing_lookup(message: &str) -> Self {
        Self {
            lookup_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<ProgressTick>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn failing_download(mut self, message: &str) -> Self {
        self.download_error = Some(message.to_string());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> Vec<DownloadCall> {
        self.downloads.lock().unwrap().clone()
    }
}

pub fn downloading(percent: Option<&str>, done: Option<f64>, total: Option<f64>) -> ProgressTick {
    ProgressTick {
        status: "downloading".into(),
        percent_str: percent.map(str::to_string),
        downloaded_bytes: done,
        total_bytes: total,
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn extract_info(&self, _url: &str) -> Result<RawInfo, ExtractionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.lookup_error {
            return Err(ExtractionError::Failed {
                message: message.clone(),
            });
        }
        Ok(self.info.clone().unwrap_or_default())
    }

    async fn download(&self, mut options: DownloadOptions, url: &str) -> Result<(), DownloadError> {
        self.downloads.lock().unwrap().push(DownloadCall {
            url: url.to_string(),
            format: options.format.clone(),
            output_template: options.output_template.clone(),
        });
        for tick in &self.ticks {
            for hook in options.progress_hooks.iter_mut() {
                hook(tick);
            }
        }
        match &self.download_error {
            Some(message) => Err(DownloadError::Failed {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}
