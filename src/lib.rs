//! http-mwu
//!
//! Compares the response latency of two HTTP requests. Requests are sent
//! strictly alternately over one shared connection pool, a few warm-up
//! pairs are discarded, and the recorded samples are compared with a
//! Mann-Whitney U test using the normal approximation.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod sampler;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use client::{ReqwestTransport, Transport};
pub use error::{AppError, Result};
pub use models::{ComparisonReport, Config, LatencySample, RequestSpec, SampleConfig, SamplePair};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use sampler::{collect_samples, Sampler};
pub use stats::{mann_whitney_u, LatencySummary, MannWhitneyResult, MannWhitneyTest};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_METHOD: &str = "GET";
    pub const DEFAULT_BODY_TYPE: &str = "application/x-www-form-urlencoded";
    pub const DEFAULT_SAMPLE_SIZE: usize = 20;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
    pub const DEFAULT_THROWAWAYS: usize = 1;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
