//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fetch the stream formats of a video URL and download the one you pick.
#[derive(Parser, Debug)]
#[command(name = "downtube")]
#[command(author, version, about)]
pub struct Args {
    /// yt-dlp executable to run (defaults to a bundled copy, then PATH)
    #[arg(long = "yt-dlp", env = "DOWNTUBE_YT_DLP", global = true)]
    pub yt_dlp: Option<PathBuf>,

    /// Folder downloads are written to (defaults to the working directory)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Open the graphical window (default)
    Gui,
    /// Interactive console session
    Cli {
        /// Video URL; prompted for when omitted
        url: Option<String>,
    },
}

impl Args {
    pub fn mode(&self) -> Mode {
        self.command.clone().unwrap_or(Mode::Gui)
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
