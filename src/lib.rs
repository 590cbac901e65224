//! DownTube: list the stream formats of a video URL and download one of them.
//!
//! All extraction work is done by yt-dlp behind the [`Extractor`] trait;
//! this crate owns the format table, the download call with its progress
//! reporting, and two shells around them:
//! - [`console`] - prompt-driven command-line session
//! - [`gui`] - egui window whose lookups and downloads run on worker tasks

pub mod config;
pub mod console;
pub mod controller;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod gui;
pub mod model;
pub mod progress;
pub mod session;
pub mod thumbnail;
pub mod ytdlp;

pub use controller::Controller;
pub use downloader::{Downloader, ProgressCallback};
pub use error::{DownloadError, ExtractionError};
pub use extractor::{DownloadOptions, Extractor, ProgressHook, RawFormat, RawInfo};
pub use formats::{list_formats, lookup};
pub use model::{DownloadRequest, FormatDescriptor, ProgressEvent, VideoInfo};
pub use session::{Dialog, DownloadOutcome, SearchOutcome, Session, ShellState};
pub use ytdlp::YtDlp;
