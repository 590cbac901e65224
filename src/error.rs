//! Error types for metadata lookups and downloads.

use thiserror::Error;

/// Failure resolving a URL into a list of formats.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extractor program could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The extractor ran but rejected the URL (unsupported site, network failure, ...).
    #[error("{message}")]
    Failed { message: String },

    /// The extractor's metadata output was not understood.
    #[error("unreadable metadata: {0}")]
    Parse(#[from] serde_json::Error),

    /// Metadata came back without any downloadable format.
    #[error("no formats found for {url}")]
    NoFormats { url: String },
}

/// Failure during the media transfer itself.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The extractor program could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the extractor's output failed mid-transfer.
    #[error("lost contact with the download process: {0}")]
    Io(#[from] std::io::Error),

    /// The extractor exited unsuccessfully (format unavailable, disk full, ...).
    #[error("{message}")]
    Failed { message: String },
}

/// Picks the most useful line out of an extractor's stderr.
///
/// yt-dlp prefixes fatal problems with `ERROR:`; the last such line wins, and
/// without one the last non-empty line is used.
pub(crate) fn failure_message(stderr: &str, fallback: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find_map(|l| l.strip_prefix("ERROR:"))
        .map(|l| l.trim().to_string())
        .or_else(|| lines.last().map(|l| l.to_string()))
        .unwrap_or_else(|| fallback.to_string())
}
