//! Everything one comparison run produced

use crate::{
    models::{Config, RequestSpec, SampleConfig, SamplePair},
    stats::{LatencySummary, MannWhitneyResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Significance level used to call a difference significant
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Result of one comparison run, as rendered by the output layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Correlation ID of the run
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub x_request: RequestSpec,
    pub y_request: RequestSpec,
    pub sample_config: SampleConfig,
    pub samples: SamplePair,
    pub x_summary: Option<LatencySummary>,
    pub y_summary: Option<LatencySummary>,
    pub result: MannWhitneyResult,
    /// Significance level the verdict uses
    pub alpha: f64,
}

impl ComparisonReport {
    pub fn new(
        run_id: String,
        started_at: DateTime<Utc>,
        config: &Config,
        samples: SamplePair,
        result: MannWhitneyResult,
    ) -> Self {
        let x_summary = LatencySummary::from_sample(&samples.x);
        let y_summary = LatencySummary::from_sample(&samples.y);

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            x_request: config.x_request.clone(),
            y_request: config.y_request.clone(),
            sample_config: config.sample_config(),
            samples,
            x_summary,
            y_summary,
            result,
            alpha: DEFAULT_ALPHA,
        }
    }

    pub fn is_significant(&self) -> bool {
        self.result.is_significant(self.alpha)
    }

    /// One-line verdict
    pub fn verdict(&self) -> String {
        match (self.is_significant(), self.result.faster_side()) {
            (true, Some(side)) => format!(
                "{} is faster (p < {})",
                side, self.alpha
            ),
            _ => format!("No significant difference at p < {}", self.alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatencySample;
    use crate::stats::MannWhitneyTest;
    use crate::types::Side;
    use std::time::Duration;

    fn report(xs: &[u64], ys: &[u64]) -> ComparisonReport {
        let to_sample = |side, values: &[u64]| {
            LatencySample::from_durations(side, values.iter().map(|&v| Duration::from_millis(v)).collect())
        };
        let pair = SamplePair::new(to_sample(Side::X, xs), to_sample(Side::Y, ys)).unwrap();
        let result = MannWhitneyTest::default().run(pair.x.as_slice(), pair.y.as_slice()).unwrap();

        let mut config = Config::default();
        config.x_request = RequestSpec::get("http://x.test/");
        config.y_request = RequestSpec::get("http://y.test/");

        ComparisonReport::new("run-1".to_string(), Utc::now(), &config, pair, result)
    }

    #[test]
    fn test_summaries_filled_in() {
        let report = report(&[10, 20, 30], &[40, 50, 60]);
        assert_eq!(report.x_summary.as_ref().unwrap().median_ms, 20.0);
        assert_eq!(report.y_summary.as_ref().unwrap().max_ms, 60.0);
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn test_verdict() {
        let separated = report(
            &[10, 11, 12, 13, 14, 15, 16, 17],
            &[30, 31, 32, 33, 34, 35, 36, 37],
        );
        assert!(separated.is_significant());
        assert_eq!(separated.verdict(), "x is faster (p < 0.05)");

        // p = 0.0495 for three against three, just under the level
        let reversed = report(&[50, 50, 50], &[10, 10, 10]);
        assert_eq!(reversed.verdict(), "y is faster (p < 0.05)");

        let mixed = report(&[10, 40, 20, 50], &[30, 15, 45, 25]);
        assert_eq!(mixed.verdict(), "No significant difference at p < 0.05");
    }

    #[test]
    fn test_report_serializes() {
        let report = report(&[10, 10, 10], &[50, 50, 50]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["run_id"], "run-1");
        assert_eq!(json["samples"]["x"]["latencies_ms"][0], 10.0);
        assert_eq!(json["result"]["u_min"], 0.0);
        assert_eq!(json["result"]["tie_mode"], "insertion-order");
        assert_eq!(json["sample_config"]["request_timeout"], 20_000);
    }
}
