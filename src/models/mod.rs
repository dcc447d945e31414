//! Data models and structures for the latency comparison

pub mod config;
pub mod report;
pub mod request;
pub mod sample;

// Re-export main model types
pub use config::Config;
pub use report::ComparisonReport;
pub use request::RequestSpec;
pub use sample::{LatencySample, SampleConfig, SamplePair};
