//! Structured logging for the latency comparison
//!
//! This module provides:
//! - Leveled, structured log entries with correlation IDs
//! - Console and JSON output formats
//! - A sampling logger that records run progress and per-trial latencies
//!
//! All log output goes to stderr so the report on stdout stays parseable.

use crate::error::{AppError, Result};
use crate::models::{Config, SampleConfig};
use crate::models::sample::as_millis_f64;
use crate::types::{Side, TrialPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - per-trial detail
    Debug = 1,
    /// Info level - run progress
    Info = 2,
    /// Warning level - suspicious configuration
    Warn = 3,
    /// Error level - failed requests
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m", // White
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Correlation ID of the sampling run
    session_id: Option<String>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: false,
            format: LogFormat::Console,
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with level and format derived from the configuration
    pub fn with_config(name: &str, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Current session correlation ID
    pub async fn session_id(&self) -> Option<String> {
        self.context.read().await.session_id.clone()
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Attach the session ID and render an entry, or `None` if filtered out
    async fn render(&self, mut entry: LogEntry) -> Option<String> {
        if !self.would_log(entry.level) {
            return None;
        }

        if entry.correlation_id.is_none() {
            entry.correlation_id = self.context.read().await.session_id.clone();
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        })
    }

    async fn write_entry(&self, entry: LogEntry) {
        if let Some(output) = self.render(entry).await {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add a latency in fractional milliseconds
    pub fn latency(self, latency: Duration) -> Self {
        self.field("latency_ms", as_millis_f64(latency))
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for sampling runs: run boundaries, trials and failures
#[derive(Clone)]
pub struct SamplingLogger {
    logger: Logger,
}

impl SamplingLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("SAMPLER", config),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Start a run, returning its correlation ID
    pub async fn log_run_start(&self, config: &SampleConfig) -> String {
        let run_id = Uuid::new_v4().to_string();
        self.logger.set_session_id(run_id.clone()).await;

        self.logger.info(&format!(
            "Starting sampling run: {} warm-up pairs, {} measured pairs",
            config.throwaways, config.sample_size
        ))
            .field("sample_size", config.sample_size)
            .field("throwaways", config.throwaways)
            .field("request_timeout_ms", config.request_timeout.as_millis() as u64)
            .field("total_requests", config.total_requests())
            .log()
            .await;

        run_id
    }

    /// Record one round trip
    pub async fn log_trial(&self, phase: TrialPhase, side: Side, trial: usize, latency: Duration) {
        if !self.logger.would_log(LogLevel::Debug) {
            return;
        }

        self.logger.debug(&format!("{} trial {} {}", phase.as_str(), trial, side))
            .field("phase", phase.as_str())
            .field("side", side)
            .field("trial", trial)
            .latency(latency)
            .log()
            .await;
    }

    /// Record a completed run
    pub async fn log_run_complete(&self, recorded: usize, elapsed: Duration) {
        self.logger.info(&format!(
            "Sampling run complete: {} paired trials in {:.3}s",
            recorded,
            elapsed.as_secs_f64()
        ))
            .field("recorded", recorded)
            .field("elapsed_ms", as_millis_f64(elapsed))
            .log()
            .await;
    }

    /// Record the request error that aborted a run
    pub async fn log_failure(&self, phase: TrialPhase, side: Side, trial: usize, error: &AppError) {
        self.logger.error(&format!("{} request failed during {} trial {}: {}", side, phase.as_str(), trial, error))
            .field("phase", phase.as_str())
            .field("side", side)
            .field("trial", trial)
            .error_info(error)
            .log()
            .await;
    }
}
