//! Command-line shell: prompt, list, choose, download.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::downloader::Downloader;
use crate::extractor::Extractor;
use crate::formats::list_formats;
use crate::model::{DownloadRequest, FormatDescriptor};

/// How a console session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    LookupFailed,
    DownloadFailed,
    /// The user gave no URL or no format id
    NothingChosen,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Downloaded)
    }
}

/// Header, 60-dash rule, then one fixed-width row per format.
pub fn render_table(formats: &[FormatDescriptor]) -> String {
    let mut table = format!(
        "{:4} | {:10} | {:11} | {:8} | {}\n",
        "ID", "Extension", "Resolution", "Size", "Note"
    );
    table.push_str(&"-".repeat(60));
    table.push('\n');
    for f in formats {
        table.push_str(&format!(
            "{:4} | {:10} | {:11} | {:8} | {}\n",
            f.id,
            f.container_extension,
            f.resolution_label(),
            f.size_label(),
            f.note
        ));
    }
    table
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<String> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Runs one lookup-and-download session.
///
/// `url` skips the URL prompt when it was given on the command line. Lookup
/// and download failures are reported on `out`, not returned as errors; only
/// terminal I/O failures are.
pub async fn run<R: BufRead, W: Write>(
    extractor: Arc<dyn Extractor>,
    url: Option<String>,
    output_dir: Option<PathBuf>,
    input: &mut R,
    out: &mut W,
) -> io::Result<Outcome> {
    let url = match url {
        Some(url) => url.trim().to_string(),
        None => prompt(input, out, "URL: ")?,
    };
    if url.is_empty() {
        writeln!(out, "No URL given.")?;
        return Ok(Outcome::NothingChosen);
    }

    let formats = match list_formats(extractor.as_ref(), &url).await {
        Ok(formats) => formats,
        Err(err) => {
            writeln!(out, "Error fetching formats: {err}")?;
            return Ok(Outcome::LookupFailed);
        }
    };

    writeln!(out, "\nAvailable formats:")?;
    write!(out, "{}", render_table(&formats))?;

    let format_id = prompt(input, out, "\nEnter the ID of the format to download: ")?;
    if format_id.is_empty() {
        writeln!(out, "No format selected.")?;
        return Ok(Outcome::NothingChosen);
    }
    debug!(%format_id, "format chosen");

    let request = DownloadRequest::new(url, format_id).with_output_dir(output_dir);
    match Downloader::new(extractor).download(request, None).await {
        Ok(()) => {
            writeln!(out, "Download complete.")?;
            Ok(Outcome::Downloaded)
        }
        Err(err) => {
            writeln!(out, "Download failed: {err}")?;
            Ok(Outcome::DownloadFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_fixed_width_columns() {
        let formats = vec![FormatDescriptor {
            id: "18".into(),
            container_extension: "mp4".into(),
            resolution: Some("640x360".into()),
            size_bytes: Some(2 * 1024 * 1024),
            note: "360p".into(),
        }];
        let table = render_table(&formats);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID   | Extension  | Resolution  | Size     | Note");
        assert_eq!(lines[1], "-".repeat(60));
        assert_eq!(lines[2], "18   | mp4        | 640x360     | 2.0MB    | 360p");
        assert_eq!(lines.len(), 3);
    }
}
