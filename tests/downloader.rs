mod common;

use std::sync::{Arc, Mutex};

use common::{downloading, raw_format, FakeExtractor};
use downtube::progress::ProgressTick;
use downtube::{list_formats, DownloadRequest, Downloader, ProgressCallback};

fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<f32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().unwrap().push(event.fraction));
    (callback, seen)
}

#[tokio::test]
async fn progress_uses_one_scale_for_both_sources() {
    let fake = Arc::new(FakeExtractor::default().with_ticks(vec![
        downloading(Some("25.0%"), None, None),
        downloading(None, Some(50.0), Some(100.0)),
        downloading(None, Some(50.0), Some(0.0)),
        downloading(Some("garbage"), None, None),
        ProgressTick {
            status: "finished".into(),
            ..Default::default()
        },
        downloading(Some("100%"), None, None),
    ]));
    let (callback, seen) = recorder();

    Downloader::new(fake.clone())
        .download(DownloadRequest::new("https://example.com/v", "22"), Some(callback))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.5, 1.0]);
    assert_eq!(fake.downloads()[0].format, "22");
}

#[tokio::test]
async fn download_without_callback_still_runs() {
    let fake = Arc::new(FakeExtractor::default().with_ticks(vec![downloading(Some("10%"), None, None)]));

    Downloader::new(fake.clone())
        .download(DownloadRequest::new("https://example.com/v", "18"), None)
        .await
        .unwrap();

    assert_eq!(fake.downloads().len(), 1);
}

#[tokio::test]
async fn download_error_is_returned() {
    let fake = Arc::new(FakeExtractor::default().failing_download("No space left on device"));

    let err = Downloader::new(fake)
        .download(DownloadRequest::new("https://example.com/v", "18"), None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No space left on device");
}

#[tokio::test]
async fn formats_keep_extractor_order() {
    let fake = FakeExtractor::with_formats(vec![
        raw_format("313", "webm", Some("3840x2160"), None),
        raw_format("18", "mp4", Some("640x360"), Some(5_452_595)),
        raw_format("140", "m4a", Some("audio only"), Some(3_145_728)),
    ]);

    let formats = list_formats(&fake, "https://example.com/v").await.unwrap();

    let ids: Vec<&str> = formats.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["313", "18", "140"]);
    assert_eq!(formats[0].size_label(), "N/A");
    assert_eq!(formats[1].size_label(), "5.2MB");
    assert_eq!(formats[2].size_label(), "3.0MB");
    assert_eq!(fake.lookups(), 1);
}

#[tokio::test]
async fn lookup_failure_is_not_retried() {
    let fake = FakeExtractor::failing_lookup("HTTP Error 404");

    let err = list_formats(&fake, "https://example.com/gone").await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP Error 404");
    assert_eq!(fake.lookups(), 1);
}
