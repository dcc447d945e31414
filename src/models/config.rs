//! Configuration data model and validation

use crate::models::{RequestSpec, SampleConfig};
use crate::types::{AppError, OutputFormat, Result, Side, TieMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Request template for side X
    #[serde(default)]
    pub x_request: RequestSpec,

    /// Request template for side Y
    #[serde(default)]
    pub y_request: RequestSpec,

    /// Number of recorded paired trials
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Per-request timeout, serialized in milliseconds
    #[serde(default = "default_request_timeout", with = "crate::models::sample::duration_ms")]
    pub request_timeout: Duration,

    /// Number of discarded warm-up pairs
    #[serde(default = "default_throwaways")]
    pub throwaways: usize,

    /// Rank tie handling
    #[serde(default)]
    pub tie_mode: TieMode,

    /// Report format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            x_request: RequestSpec::default(),
            y_request: RequestSpec::default(),
            sample_size: default_sample_size(),
            request_timeout: default_request_timeout(),
            throwaways: default_throwaways(),
            tie_mode: TieMode::default(),
            output_format: OutputFormat::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the per-request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Sampling parameters for the run
    pub fn sample_config(&self) -> SampleConfig {
        SampleConfig::new(self.sample_size, self.request_timeout(), self.throwaways)
    }

    /// Request template for one side
    pub fn request(&self, side: Side) -> &RequestSpec {
        match side {
            Side::X => &self.x_request,
            Side::Y => &self.y_request,
        }
    }

    /// Validate the configuration and return the first fatal problem
    pub fn validate(&self) -> Result<()> {
        if self.x_request.url.trim().is_empty() || self.y_request.url.trim().is_empty() {
            return Err(AppError::config("URL(s) not supplied"));
        }

        self.x_request.validate(Side::X)?;
        self.y_request.validate(Side::Y)?;
        self.sample_config().validate()?;

        Ok(())
    }

    /// Merge `MWU_*` environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        merge_request_from_env(&mut self.x_request, "MWU_X")?;
        merge_request_from_env(&mut self.y_request, "MWU_Y")?;

        if let Ok(sample_size) = std::env::var("MWU_SAMPLE_SIZE") {
            self.sample_size = sample_size.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid MWU_SAMPLE_SIZE value '{}': {}", sample_size, e)))?;
        }

        if let Ok(throwaways) = std::env::var("MWU_THROWAWAYS") {
            self.throwaways = throwaways.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid MWU_THROWAWAYS value '{}': {}", throwaways, e)))?;
        }

        if let Ok(timeout) = std::env::var("MWU_REQUEST_TIMEOUT") {
            let parsed = humantime::parse_duration(timeout.trim())
                .map_err(|e| AppError::config(format!("Invalid MWU_REQUEST_TIMEOUT value '{}': {}", timeout, e)))?;
            self.request_timeout = parsed;
        }

        if let Ok(tie_mode) = std::env::var("MWU_TIE_MODE") {
            self.tie_mode = tie_mode.parse()
                .map_err(|e| AppError::config(format!("Invalid MWU_TIE_MODE value '{}': {}", tie_mode, e)))?;
        }

        if let Ok(enable_color) = std::env::var("MWU_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid MWU_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

fn merge_request_from_env(spec: &mut RequestSpec, prefix: &str) -> Result<()> {
    if let Ok(method) = std::env::var(format!("{}_METHOD", prefix)) {
        spec.method = method.trim().to_string();
    }

    if let Ok(url) = std::env::var(format!("{}_URL", prefix)) {
        spec.url = url.trim().to_string();
    }

    if let Ok(body) = std::env::var(format!("{}_BODY", prefix)) {
        spec.body = Some(body);
    }

    if let Ok(body_type) = std::env::var(format!("{}_BODY_TYPE", prefix)) {
        spec.body_type = Some(body_type.trim().to_string());
    }

    Ok(())
}

// Default value functions for serde
fn default_sample_size() -> usize {
    crate::defaults::DEFAULT_SAMPLE_SIZE
}

fn default_request_timeout() -> Duration {
    crate::defaults::DEFAULT_REQUEST_TIMEOUT
}

fn default_throwaways() -> usize {
    crate::defaults::DEFAULT_THROWAWAYS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
