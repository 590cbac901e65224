//! The seam between the shells and the program that does the real work.
//!
//! Everything protocol- or site-specific lives behind [`Extractor`]; the
//! production implementation is [`crate::ytdlp::YtDlp`].

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::{DownloadError, ExtractionError};
use crate::progress::ProgressTick;

/// Callable invoked with every raw progress tick of a download
pub type ProgressHook = Box<dyn FnMut(&ProgressTick) + Send>;

/// Metadata returned by a metadata-only extraction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
}

/// One entry of the extractor's `formats` list; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    /// yt-dlp may report this as a float; anything unusable becomes `None`
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_u64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        })
    }))
}

/// Everything the extractor needs to perform one download
pub struct DownloadOptions {
    /// Format selector, usually a single format id
    pub format: String,
    /// Output naming template, e.g. `%(title)s.%(ext)s`
    pub output_template: String,
    pub output_dir: Option<PathBuf>,
    pub progress_hooks: Vec<ProgressHook>,
}

impl std::fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("format", &self.format)
            .field("output_template", &self.output_template)
            .field("output_dir", &self.output_dir)
            .field("progress_hooks", &self.progress_hooks.len())
            .finish()
    }
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Resolve `url` into metadata without downloading any media.
    async fn extract_info(&self, url: &str) -> Result<RawInfo, ExtractionError>;

    /// Download `url` according to `options`, calling every progress hook per tick.
    async fn download(&self, options: DownloadOptions, url: &str) -> Result<(), DownloadError>;
}
