use std::path::PathBuf;

/// Marker shown for any field the extractor did not report
pub const UNAVAILABLE: &str = "N/A";

/// Output naming used for every download: video title plus container extension
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One downloadable stream variant offered for a URL
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    /// Extractor-assigned format identifier (e.g. "137", "hls-720p")
    pub id: String,
    /// Container extension such as "mp4" or "webm"
    pub container_extension: String,
    /// Resolution label ("1920x1080", "audio only"), when reported
    pub resolution: Option<String>,
    /// Exact size in bytes, when reported
    pub size_bytes: Option<u64>,
    /// Free-form note (e.g. "1080p", "medium")
    pub note: String,
}

impl FormatDescriptor {
    /// Size column text: megabytes with one decimal, or the unavailable marker
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Resolution column text
    pub fn resolution_label(&self) -> &str {
        self.resolution.as_deref().unwrap_or(UNAVAILABLE)
    }
}

/// Renders a byte count as "<value>MB" rounded to one decimal place
pub fn format_size(size_bytes: Option<u64>) -> String {
    match size_bytes {
        Some(bytes) => format!("{:.1}MB", bytes as f64 / BYTES_PER_MB),
        None => UNAVAILABLE.to_string(),
    }
}

/// Result of a metadata lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail: Option<String>,
    /// Formats in the order the extractor returned them
    pub formats: Vec<FormatDescriptor>,
}

/// A confirmed choice, consumed once by the downloader
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    pub output_name_template: String,
    /// Target folder; `None` writes to the working directory
    pub output_dir: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, format_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format_id: format_id.into(),
            output_name_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            output_dir: None,
        }
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }
}

/// Completion update delivered to progress callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Fraction complete, always within 0.0 to 1.0
    pub fraction: f32,
}
