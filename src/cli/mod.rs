//! Command-line interface

use crate::types::{OutputFormat, TieMode};
use clap::Parser;
use std::time::Duration;

/// http-mwu - compare the latency of two HTTP endpoints with a Mann-Whitney U test
///
/// Requests to X and Y are interleaved (X, Y, X, Y, ...) over one shared
/// connection pool after discarding warm-up pairs. The report ends with the
/// significance of the difference between the two latency samples.
#[derive(Parser, Debug, Clone)]
#[command(name = "http-mwu")]
#[command(version, long_version = crate::LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// HTTP method for X [default: GET]
    #[arg(long, value_name = "METHOD")]
    pub x_method: Option<String>,

    /// Target URL for X
    #[arg(long, value_name = "URL")]
    pub x_url: Option<String>,

    /// Request body for X
    #[arg(long, value_name = "BODY")]
    pub x_body: Option<String>,

    /// Content type of the X body [default: application/x-www-form-urlencoded]
    #[arg(long, value_name = "TYPE")]
    pub x_body_type: Option<String>,

    /// HTTP method for Y [default: GET]
    #[arg(long, value_name = "METHOD")]
    pub y_method: Option<String>,

    /// Target URL for Y
    #[arg(long, value_name = "URL")]
    pub y_url: Option<String>,

    /// Request body for Y
    #[arg(long, value_name = "BODY")]
    pub y_body: Option<String>,

    /// Content type of the Y body [default: application/x-www-form-urlencoded]
    #[arg(long, value_name = "TYPE")]
    pub y_body_type: Option<String>,

    /// Per-request timeout, e.g. "20s" or "1500ms" [default: 20s]
    #[arg(long, value_parser = parse_timeout, value_name = "DURATION")]
    pub request_timeout: Option<Duration>,

    /// Number of recorded paired trials [default: 20]
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Number of discarded warm-up pairs [default: 1]
    #[arg(long, value_name = "N")]
    pub throwaways: Option<usize>,

    /// How tied latencies are ranked [default: insertion-order]
    #[arg(long, value_enum)]
    pub tie_mode: Option<TieMode>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err("Request timeout must be greater than 0".to_string());
            }
        }

        Ok(())
    }

    /// Explicit color choice, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

/// Parse a human-readable request timeout
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(s.trim())
        .map_err(|e| format!("Invalid duration '{}': {}", s, e))?;

    if duration.is_zero() {
        return Err("Duration must be greater than 0".to_string());
    }

    Ok(duration)
}

/// Check if the terminal supports color output
pub(crate) fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
