use eframe::egui::ColorImage;
use tracing::debug;

/// Downloads and decodes the preview image the extractor advertised for a video.
///
/// Best effort: any network or decode failure just means no thumbnail.
pub fn fetch_thumbnail(url: &str) -> Option<ColorImage> {
    let resp = match reqwest::blocking::get(url).and_then(|r| r.error_for_status()) {
        Ok(resp) => resp.bytes().ok()?,
        Err(err) => {
            debug!(%err, url, "thumbnail fetch failed");
            return None;
        }
    };
    // Load image data into an image::DynamicImage and convert to RGBA8
    let img = image::load_from_memory(&resp).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, &img))
}
