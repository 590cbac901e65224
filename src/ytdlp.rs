use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use rust_embed::RustEmbed;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::Command,
};
use tracing::{debug, info, warn};

use crate::error::{failure_message, DownloadError, ExtractionError};
use crate::extractor::{DownloadOptions, Extractor, RawInfo};
use crate::progress::{parse_progress_from_line, PROGRESS_PREFIX};

/// Optional yt-dlp build shipped inside the executable
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Asset;

const BIN: &str = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };

/// Picks the yt-dlp executable: an explicit path wins, then a bundled copy,
/// then whatever `yt-dlp` resolves to on PATH.
pub fn resolve_binary(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match unpack_bundled() {
        Ok(Some(path)) => return path,
        Ok(None) => {}
        Err(err) => warn!(%err, "could not unpack bundled yt-dlp, using PATH"),
    }
    PathBuf::from(BIN)
}

fn unpack_bundled() -> std::io::Result<Option<PathBuf>> {
    let Some(data) = Asset::get(BIN) else {
        return Ok(None);
    };
    // Write the embedded binary to the temp dir once and make it executable
    let tmp = std::env::temp_dir().join(BIN);
    if !tmp.exists() {
        let mut f = File::create(&tmp)?;
        f.write_all(&data.data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o755))?;
        }
        info!(path = %tmp.display(), "unpacked bundled yt-dlp");
    }
    Ok(Some(tmp))
}

/// Extractor backed by the yt-dlp command line program
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Metadata-only invocation: dump the info JSON, never fetch media.
pub fn info_args(url: &str) -> Vec<String> {
    ["-J", "--no-playlist", "--no-warnings", "--", url]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn download_args(options: &DownloadOptions, url: &str) -> Vec<String> {
    let mut args = vec![
        "--newline".to_owned(),
        "--no-colors".to_owned(),
        "--no-playlist".to_owned(),
        "-f".to_owned(),
        options.format.clone(),
        "-o".to_owned(),
        options.output_template.clone(),
    ];

    // Output folder, when one was chosen
    if let Some(dir) = &options.output_dir {
        args.push("-P".to_owned());
        args.push(dir.display().to_string());
    }

    // One JSON progress record per line, only when someone listens
    if !options.progress_hooks.is_empty() {
        args.push("--progress-template".to_owned());
        args.push(format!("download:{PROGRESS_PREFIX}%(progress)j"));
    }

    args.push("--".to_owned());
    args.push(url.to_owned());
    args
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract_info(&self, url: &str) -> Result<RawInfo, ExtractionError> {
        debug!(program = %self.program.display(), url, "fetching metadata");
        // Metadata only: yt-dlp prints one JSON document and exits
        let output = Command::new(&self.program)
            .args(info_args(url))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExtractionError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let fallback = format!("yt-dlp exited with {}", output.status);
            return Err(ExtractionError::Failed {
                message: failure_message(&stderr, &fallback),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(&self, mut options: DownloadOptions, url: &str) -> Result<(), DownloadError> {
        let args = download_args(&options, url);
        debug!(program = %self.program.display(), ?args, "starting download");

        // Spawn yt-dlp with both output streams piped back to us
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DownloadError::Spawn {
                program: self.program_name(),
                source,
            })?;

        // Take ownership of both pipes
        let out = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("yt-dlp stdout was not captured"))?;
        let err = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("yt-dlp stderr was not captured"))?;

        // Drained concurrently so a chatty stderr cannot stall the child.
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = BufReader::new(err).read_to_end(&mut buf).await;
            String::from_utf8_lossy(&buf).into_owned()
        });

        // Filenames in the output need not be UTF-8, so lines are read as bytes
        let mut reader = BufReader::new(out);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(read_err) => {
                    warn!(%read_err, "lost yt-dlp output, stopping the download");
                    let _ = child.kill().await;
                    stderr_task.abort();
                    return Err(DownloadError::Io(read_err));
                }
            }
            let line = String::from_utf8_lossy(&raw);
            // Forward progress records to every hook, log everything else
            match parse_progress_from_line(&line) {
                Some(tick) => {
                    for hook in options.progress_hooks.iter_mut() {
                        hook(&tick);
                    }
                }
                None => debug!("yt-dlp> {}", line.trim_end()),
            }
        }

        // Exit status decides success; stderr explains a failure
        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            let fallback = format!("yt-dlp exited with {status}");
            return Err(DownloadError::Failed {
                message: failure_message(&stderr, &fallback),
            });
        }
        Ok(())
    }
}
