//! Paired, interleaved latency sampling
//!
//! A run performs `throwaways` warm-up pairs whose timings are discarded,
//! then `sample_size` recorded pairs. Every pair is X then Y, and every
//! request is awaited before the next one starts. The first failed request
//! aborts the run.

use crate::{
    client::{ReqwestTransport, Transport},
    error::Result,
    logging::SamplingLogger,
    models::{LatencySample, RequestSpec, SampleConfig, SamplePair},
    types::{Side, TrialPhase},
};
use std::time::{Duration, Instant};

/// Collects paired latency samples over a single transport
pub struct Sampler<T: Transport> {
    transport: T,
    config: SampleConfig,
    logger: Option<SamplingLogger>,
}

impl<T: Transport> Sampler<T> {
    pub fn new(transport: T, config: SampleConfig) -> Self {
        Self {
            transport,
            config,
            logger: None,
        }
    }

    /// Attach a logger for run progress and per-trial detail
    pub fn with_logger(mut self, logger: SamplingLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run warm-up and measurement phases, returning the recorded pair.
    ///
    /// Configuration and both request templates are validated before the
    /// first request is sent.
    pub async fn collect(&self, x: &RequestSpec, y: &RequestSpec) -> Result<SamplePair> {
        self.config.validate()?;
        x.validate(Side::X)?;
        y.validate(Side::Y)?;

        let started = Instant::now();
        if let Some(logger) = &self.logger {
            logger.log_run_start(&self.config).await;
        }

        for trial in 0..self.config.throwaways {
            self.timed(TrialPhase::Warmup, Side::X, trial, x).await?;
            self.timed(TrialPhase::Warmup, Side::Y, trial, y).await?;
        }

        let mut xs = LatencySample::with_capacity(Side::X, self.config.sample_size);
        let mut ys = LatencySample::with_capacity(Side::Y, self.config.sample_size);

        for trial in 0..self.config.sample_size {
            xs.push(self.timed(TrialPhase::Measure, Side::X, trial, x).await?);
            ys.push(self.timed(TrialPhase::Measure, Side::Y, trial, y).await?);
        }

        if let Some(logger) = &self.logger {
            logger.log_run_complete(xs.len(), started.elapsed()).await;
        }

        SamplePair::new(xs, ys)
    }

    async fn timed(&self, phase: TrialPhase, side: Side, trial: usize, spec: &RequestSpec) -> Result<Duration> {
        match self.transport.round_trip(spec).await {
            Ok(latency) => {
                if let Some(logger) = &self.logger {
                    logger.log_trial(phase, side, trial, latency).await;
                }
                Ok(latency)
            }
            Err(error) => {
                if let Some(logger) = &self.logger {
                    logger.log_failure(phase, side, trial, &error).await;
                }
                Err(error)
            }
        }
    }
}

impl Sampler<ReqwestTransport> {
    /// Sampler over one fresh HTTP client shared by every request of the run
    pub fn from_config(config: SampleConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(transport, config))
    }
}

/// Collect paired samples for `x` and `y` over one shared HTTP client
pub async fn collect_samples(x: &RequestSpec, y: &RequestSpec, config: &SampleConfig) -> Result<SamplePair> {
    Sampler::from_config(config.clone())?.collect(x, y).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Deterministic transport: scripted latencies, optional failure on the Nth call
    struct MockTransport {
        calls: Mutex<Vec<String>>,
        latencies: Vec<Duration>,
        fail_at: Option<usize>,
    }

    impl MockTransport {
        fn new(latencies_ms: &[u64]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                latencies: latencies_ms.iter().map(|&ms| Duration::from_millis(ms)).collect(),
                fail_at: None,
            }
        }

        fn failing_at(mut self, call: usize) -> Self {
            self.fail_at = Some(call);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn round_trip(&self, request: &RequestSpec) -> Result<Duration> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(request.url.clone());

            if self.fail_at == Some(index) {
                return Err(AppError::network("connection reset"));
            }

            Ok(self.latencies.get(index).copied().unwrap_or(Duration::from_millis(1)))
        }
    }

    fn specs() -> (RequestSpec, RequestSpec) {
        (
            RequestSpec::get("http://x.test/"),
            RequestSpec::get("http://y.test/"),
        )
    }

    fn config(sample_size: usize, throwaways: usize) -> SampleConfig {
        SampleConfig::new(sample_size, Duration::from_secs(1), throwaways)
    }

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[tokio::test]
    async fn test_throwaways_discarded() {
        let (x, y) = specs();
        // Two warm-up pairs (100..103) then three recorded pairs.
        let transport = MockTransport::new(&[100, 101, 102, 103, 1, 2, 3, 4, 5, 6]);
        let sampler = Sampler::new(transport, config(3, 2));

        let pair = sampler.collect(&x, &y).await.unwrap();
        assert_eq!(pair.x.as_slice(), ms(&[1, 3, 5]).as_slice());
        assert_eq!(pair.y.as_slice(), ms(&[2, 4, 6]).as_slice());
        assert_eq!(sampler.transport().calls().len(), 10);
    }

    #[tokio::test]
    async fn test_exact_sample_size() {
        let (x, y) = specs();
        let sampler = Sampler::new(MockTransport::new(&[]), config(20, 1));

        let pair = sampler.collect(&x, &y).await.unwrap();
        assert_eq!(pair.len(), 20);
        assert_eq!(pair.x.side, Side::X);
        assert_eq!(pair.y.side, Side::Y);
        assert_eq!(sampler.transport().calls().len(), sampler.config().total_requests());
    }

    #[tokio::test]
    async fn test_requests_interleave_x_then_y() {
        let (x, y) = specs();
        let sampler = Sampler::new(MockTransport::new(&[]), config(3, 1));
        sampler.collect(&x, &y).await.unwrap();

        let calls = sampler.transport().calls();
        for (i, url) in calls.iter().enumerate() {
            let expected = if i % 2 == 0 { "http://x.test/" } else { "http://y.test/" };
            assert_eq!(url, expected, "call {} went to the wrong side", i);
        }
    }

    #[tokio::test]
    async fn test_zero_throwaways() {
        let (x, y) = specs();
        let sampler = Sampler::new(MockTransport::new(&[7, 8]), config(1, 0));

        let pair = sampler.collect(&x, &y).await.unwrap();
        assert_eq!(pair.x.as_slice(), ms(&[7]).as_slice());
        assert_eq!(pair.y.as_slice(), ms(&[8]).as_slice());
    }

    #[tokio::test]
    async fn test_failure_during_warmup_stops_run() {
        let (x, y) = specs();
        let sampler = Sampler::new(MockTransport::new(&[]).failing_at(1), config(5, 2));

        let err = sampler.collect(&x, &y).await.unwrap_err();
        assert_eq!(err.category(), "NETWORK");
        assert_eq!(sampler.transport().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_during_measurement_stops_run() {
        let (x, y) = specs();
        // Warm-up is calls 0..2, measurement starts at call 2.
        let sampler = Sampler::new(MockTransport::new(&[]).failing_at(6), config(5, 1));

        let err = sampler.collect(&x, &y).await.unwrap_err();
        assert!(err.is_request_error());
        assert_eq!(sampler.transport().calls().len(), 7);
    }

    #[tokio::test]
    async fn test_invalid_config_sends_nothing() {
        let (x, y) = specs();
        let sampler = Sampler::new(MockTransport::new(&[]), config(0, 1));

        let err = sampler.collect(&x, &y).await.unwrap_err();
        assert!(err.to_string().contains("invalid sample size"));
        assert!(sampler.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_url_sends_nothing() {
        let (x, _) = specs();
        let y = RequestSpec::get("");
        let sampler = Sampler::new(MockTransport::new(&[]), config(2, 1));

        let err = sampler.collect(&x, &y).await.unwrap_err();
        assert_eq!(err.category(), "CONFIG");
        assert!(sampler.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_logger_attached() {
        let (x, y) = specs();
        let logger = SamplingLogger::new(&crate::models::Config::default());
        let sampler = Sampler::new(MockTransport::new(&[]), config(2, 1)).with_logger(logger.clone());

        sampler.collect(&x, &y).await.unwrap();
        assert!(logger.logger().session_id().await.is_some());
    }

    #[tokio::test]
    async fn test_collect_samples_over_http() {
        use wiremock::matchers::path;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        for route in ["/x", "/y"] {
            Mock::given(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .mount(&server)
                .await;
        }

        let x = RequestSpec::get(format!("{}/x", server.uri()));
        let y = RequestSpec::get(format!("{}/y", server.uri()));
        let sample_config = config(4, 2);

        let pair = collect_samples(&x, &y, &sample_config).await.unwrap();
        assert_eq!(pair.len(), 4);

        let paths: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths.len(), 2 * (4 + 2));
        for (i, p) in paths.iter().enumerate() {
            assert_eq!(p, if i % 2 == 0 { "/x" } else { "/y" }, "request {}", i);
        }
    }

    #[tokio::test]
    async fn test_collect_samples_rejects_config_before_sending() {
        let (x, y) = specs();
        let err = collect_samples(&x, &y, &config(0, 1)).await.unwrap_err();
        assert!(err.to_string().contains("invalid sample size"));
    }
}
