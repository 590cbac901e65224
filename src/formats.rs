//! Format lister: URL in, normalized format descriptors out.

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::extractor::{Extractor, RawFormat};
use crate::model::{FormatDescriptor, VideoInfo, UNAVAILABLE};

/// Looks up title, thumbnail and formats for `url`.
///
/// A single attempt: failures go straight back to the caller.
pub async fn lookup(extractor: &dyn Extractor, url: &str) -> Result<VideoInfo, ExtractionError> {
    let raw = extractor.extract_info(url).await?;
    let formats: Vec<FormatDescriptor> = raw
        .formats
        .unwrap_or_default()
        .into_iter()
        .map(describe)
        .collect();

    if formats.is_empty() {
        return Err(ExtractionError::NoFormats { url: url.to_string() });
    }

    info!(url, count = formats.len(), "formats found");
    Ok(VideoInfo {
        title: raw.title.unwrap_or_else(|| UNAVAILABLE.to_string()),
        thumbnail: raw.thumbnail.filter(|t| !t.is_empty()),
        formats,
    })
}

/// Formats for `url`, in the order the extractor returned them.
pub async fn list_formats(
    extractor: &dyn Extractor,
    url: &str,
) -> Result<Vec<FormatDescriptor>, ExtractionError> {
    lookup(extractor, url).await.map(|info| info.formats)
}

fn describe(raw: RawFormat) -> FormatDescriptor {
    let descriptor = FormatDescriptor {
        id: raw.format_id.unwrap_or_else(|| UNAVAILABLE.to_string()),
        container_extension: raw.ext.unwrap_or_else(|| UNAVAILABLE.to_string()),
        resolution: raw.resolution,
        size_bytes: raw.filesize,
        note: raw.format_note.unwrap_or_else(|| UNAVAILABLE.to_string()),
    };
    debug!(id = %descriptor.id, ext = %descriptor.container_extension, "format");
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_become_marker() {
        let d = describe(RawFormat::default());
        assert_eq!(d.id, "N/A");
        assert_eq!(d.container_extension, "N/A");
        assert_eq!(d.resolution_label(), "N/A");
        assert_eq!(d.size_label(), "N/A");
        assert_eq!(d.note, "N/A");
    }

    #[test]
    fn present_fields_are_kept() {
        let d = describe(RawFormat {
            format_id: Some("22".into()),
            ext: Some("mp4".into()),
            resolution: Some("1280x720".into()),
            filesize: Some(3 * 1024 * 1024),
            format_note: Some("720p".into()),
        });
        assert_eq!(d.id, "22");
        assert_eq!(d.resolution_label(), "1280x720");
        assert_eq!(d.size_label(), "3.0MB");
        assert_eq!(d.note, "720p");
    }
}
