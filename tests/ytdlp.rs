//! Runs the real `YtDlp` extractor against small shell scripts posing as yt-dlp.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use downtube::{
    list_formats, DownloadError, DownloadRequest, Downloader, ProgressCallback, YtDlp,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

struct Scripts {
    dir: TempDir,
}

impl Scripts {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

// Written once, before any test spawns a child, so no script is still open
// for writing while another thread execs.
static SCRIPTS: Lazy<Scripts> = Lazy::new(|| {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");

    write_script(
        dir.path(),
        "progress",
        r#"echo '[download] Destination: clip.mp4'
echo 'downtube-progress:{"status":"downloading","_percent_str":" 25.0%"}'
echo 'downtube-progress:{"status":"downloading","downloaded_bytes":50,"total_bytes":100}'
echo 'downtube-progress:{"status":"downloading","downloaded_bytes":50,"total_bytes":0}'
echo 'downtube-progress:{"status":"finished","downloaded_bytes":100,"total_bytes":100}'"#,
    );
    write_script(
        dir.path(),
        "failing",
        r#"echo 'WARNING: falling back to generic extractor' >&2
echo 'ERROR: Requested format is not available' >&2
exit 1"#,
    );
    write_script(
        dir.path(),
        "metadata",
        r#"cat <<'JSON'
{"title":"Clip","thumbnail":"https://i.example/x.jpg","formats":[
 {"format_id":"18","ext":"mp4","resolution":"640x360","filesize":1048576,"format_note":"360p"},
 {"format_id":"22","ext":"mp4","resolution":"1280x720","filesize":5242880.0,"format_note":"720p"},
 {"format_id":"140","ext":"m4a","resolution":"audio only","filesize":null}
]}
JSON"#,
    );
    write_script(
        dir.path(),
        "latin1",
        &format!(
            r#"printf 'caf\351.mp4\n'
printf 'downtube-progress:{{"status":"downloading","_percent_str":"50%%"}}\n'
sleep 0.2
touch '{}'"#,
            marker.display()
        ),
    );

    Scripts { dir }
});

fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<f32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().unwrap().push(event.fraction));
    (callback, seen)
}

#[tokio::test]
async fn progress_lines_reach_callback_as_fractions() {
    let downloader = Downloader::new(Arc::new(YtDlp::new(SCRIPTS.path("progress"))));
    let (callback, seen) = recorder();

    downloader
        .download(DownloadRequest::new("https://example.com/v", "18"), Some(callback))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.5]);
}

#[tokio::test]
async fn stderr_error_line_becomes_failure_message() {
    let downloader = Downloader::new(Arc::new(YtDlp::new(SCRIPTS.path("failing"))));

    let err = downloader
        .download(DownloadRequest::new("https://example.com/v", "999"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Failed { .. }));
    assert_eq!(err.to_string(), "Requested format is not available");
}

#[tokio::test]
async fn failed_lookup_reports_stderr() {
    let extractor = YtDlp::new(SCRIPTS.path("failing"));

    let err = list_formats(&extractor, "https://example.com/v").await.unwrap_err();

    assert_eq!(err.to_string(), "Requested format is not available");
}

#[tokio::test]
async fn metadata_dump_flows_through_lister() {
    let extractor = YtDlp::new(SCRIPTS.path("metadata"));

    let formats = list_formats(&extractor, "https://example.com/v").await.unwrap();

    let ids: Vec<&str> = formats.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["18", "22", "140"]);
    assert_eq!(formats[0].size_label(), "1.0MB");
    assert_eq!(formats[1].size_label(), "5.0MB");
    assert_eq!(formats[2].size_label(), "N/A");
}

#[tokio::test]
async fn non_utf8_output_does_not_abort_download() {
    let downloader = Downloader::new(Arc::new(YtDlp::new(SCRIPTS.path("latin1"))));
    let (callback, seen) = recorder();

    downloader
        .download(DownloadRequest::new("https://example.com/v", "18"), Some(callback))
        .await
        .unwrap();

    // The call only returns once the child has run to completion
    assert!(SCRIPTS.path("finished").exists());
    assert_eq!(*seen.lock().unwrap(), vec![0.5]);
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let downloader = Downloader::new(Arc::new(YtDlp::new(SCRIPTS.path("does-not-exist"))));

    let err = downloader
        .download(DownloadRequest::new("https://example.com/v", "18"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Spawn { .. }));
}
