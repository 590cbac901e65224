use serde::Deserialize;

use crate::model::ProgressEvent;

/// Prefix yt-dlp writes in front of each progress record (see `--progress-template`)
pub const PROGRESS_PREFIX: &str = "downtube-progress:";

/// Raw progress record as the extractor reports it
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProgressTick {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "_percent_str", default)]
    pub percent_str: Option<String>,
    #[serde(default)]
    pub downloaded_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes: Option<f64>,
}

impl ProgressTick {
    /// Completion fraction (0.0 to 1.0) for a tick, or `None` when the tick
    /// carries nothing usable. Never panics on malformed data.
    pub fn fraction(&self) -> Option<f32> {
        if self.status != "downloading" {
            return None;
        }
        let fraction = match &self.percent_str {
            Some(percent) => parse_percent(percent)?,
            None => {
                let done = self.downloaded_bytes?;
                let total = self.total_bytes?;
                if total <= 0.0 {
                    return None;
                }
                done / total
            }
        };
        if !fraction.is_finite() {
            return None;
        }
        Some(fraction.clamp(0.0, 1.0) as f32)
    }

    pub fn event(&self) -> Option<ProgressEvent> {
        self.fraction().map(|fraction| ProgressEvent { fraction })
    }
}

/// "45.2%" -> 0.452
fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned = strip_ansi(raw);
    let number = cleaned.trim().trim_end_matches('%').trim();
    number.parse::<f64>().ok().map(|v| v / 100.0)
}

fn strip_ansi(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // skip "[...m"
            for esc in chars.by_ref() {
                if esc.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes one stdout line of a running download into a tick.
pub fn parse_progress_from_line(line: &str) -> Option<ProgressTick> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    match serde_json::from_str(rest.trim()) {
        Ok(tick) => Some(tick),
        Err(err) => {
            tracing::trace!(%err, "ignoring malformed progress line");
            None
        }
    }
}
