//! Type definitions and aliases

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// One side of the A/B comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    X,
    Y,
}

impl Side {
    /// Lowercase label used in reports and log fields
    pub fn label(&self) -> &'static str {
        match self {
            Side::X => "x",
            Side::Y => "y",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase of a sampling run a trial belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialPhase {
    /// Discarded warm-up pair
    Warmup,
    /// Recorded pair
    Measure,
}

impl TrialPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialPhase::Warmup => "warmup",
            TrialPhase::Measure => "measure",
        }
    }
}

/// How equal latency values are ranked by the rank-sum test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieMode {
    /// Ties keep insertion order: X before Y, then by index. Every value gets a
    /// distinct integer rank.
    #[default]
    InsertionOrder,
    /// Tied values share the mean of the ranks they span, and the variance of
    /// U is tie-corrected.
    Average,
}

impl TieMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieMode::InsertionOrder => "insertion-order",
            TieMode::Average => "average",
        }
    }
}

impl std::str::FromStr for TieMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "insertion-order" | "insertion" | "compat" => Ok(TieMode::InsertionOrder),
            "average" | "averaged" => Ok(TieMode::Average),
            other => Err(AppError::parse(format!("Invalid tie mode: {}", other))),
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Serialized comparison report
    Json,
}
