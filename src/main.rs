//! Entry point: parses arguments, sets up logging and the runtime, then hands
//! over to the window or the console session.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use downtube::config::{Args, Mode};
use downtube::{console, gui, ytdlp, Extractor, YtDlp};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Runtime> = OnceCell::new();

fn runtime() -> Result<&'static Runtime> {
    RUNTIME.get_or_try_init(|| Runtime::new().context("failed to start the async runtime"))
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    debug!(?args, "arguments parsed");

    let program = ytdlp::resolve_binary(args.yt_dlp.as_deref());
    info!(program = %program.display(), "using yt-dlp");
    let extractor: Arc<dyn Extractor> = Arc::new(YtDlp::new(program));

    match args.mode() {
        Mode::Gui => {
            let rt = runtime()?;
            gui::run(extractor, rt.handle().clone(), args.output_dir.clone())
                .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))?;
            Ok(ExitCode::SUCCESS)
        }
        Mode::Cli { url } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            let outcome = runtime()?.block_on(console::run(
                extractor,
                url,
                args.output_dir.clone(),
                &mut input,
                &mut out,
            ))?;
            debug!(?outcome, "console session finished");
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
