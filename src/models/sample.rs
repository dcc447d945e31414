//! Sampling parameters and recorded latency sequences

use crate::types::{AppError, Result, Side};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run parameters for one sampling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Number of paired trials to record
    pub sample_size: usize,

    /// Deadline for a single round trip
    #[serde(with = "duration_ms")]
    pub request_timeout: Duration,

    /// Number of warm-up pairs discarded before recording
    pub throwaways: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            sample_size: crate::defaults::DEFAULT_SAMPLE_SIZE,
            request_timeout: crate::defaults::DEFAULT_REQUEST_TIMEOUT,
            throwaways: crate::defaults::DEFAULT_THROWAWAYS,
        }
    }
}

impl SampleConfig {
    pub fn new(sample_size: usize, request_timeout: Duration, throwaways: usize) -> Self {
        Self {
            sample_size,
            request_timeout,
            throwaways,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(AppError::config("invalid sample size: must be greater than 0"));
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::config("Request timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Total number of round trips a successful run performs
    pub fn total_requests(&self) -> usize {
        2 * (self.sample_size + self.throwaways)
    }
}

/// Elapsed round-trip times for one side, in trial order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySample {
    pub side: Side,
    #[serde(rename = "latencies_ms", with = "durations_ms")]
    latencies: Vec<Duration>,
}

impl LatencySample {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            latencies: Vec::new(),
        }
    }

    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            latencies: Vec::with_capacity(capacity),
        }
    }

    pub fn from_durations(side: Side, latencies: Vec<Duration>) -> Self {
        Self { side, latencies }
    }

    pub fn push(&mut self, latency: Duration) {
        self.latencies.push(latency);
    }

    pub fn len(&self) -> usize {
        self.latencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies.is_empty()
    }

    pub fn get(&self, trial: usize) -> Option<Duration> {
        self.latencies.get(trial).copied()
    }

    pub fn as_slice(&self) -> &[Duration] {
        &self.latencies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Duration> {
        self.latencies.iter()
    }
}

/// The two latency sequences of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePair {
    pub x: LatencySample,
    pub y: LatencySample,
}

impl SamplePair {
    pub fn new(x: LatencySample, y: LatencySample) -> Result<Self> {
        if x.len() != y.len() {
            return Err(AppError::internal(format!(
                "sample length mismatch: x has {}, y has {}",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }

    /// Number of recorded trials
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Trial rows: (index, x latency, y latency)
    pub fn rows(&self) -> impl Iterator<Item = (usize, Duration, Duration)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .enumerate()
            .map(|(i, (x, y))| (i, *x, *y))
    }
}

/// Fractional milliseconds of a duration, exact for whole-nanosecond inputs
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

mod durations_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(durations.iter().map(|d| super::as_millis_f64(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Duration>, D::Error> {
        let millis = Vec::<f64>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|ms| Duration::from_nanos((ms.max(0.0) * 1_000_000.0).round() as u64))
            .collect())
    }
}
