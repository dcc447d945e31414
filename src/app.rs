//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, Result},
    logging::SamplingLogger,
    models::{ComparisonReport, Config},
    output::OutputCoordinator,
    sampler::Sampler,
    stats::MannWhitneyTest,
};
use chrono::Utc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        Ok(Self { cli })
    }

    /// Run the application: sample both requests, test, print the report
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli)?;
        let report = Self::compare(&config).await?;

        let coordinator = OutputCoordinator::from_config(&config);
        print!("{}", coordinator.render(&report)?);
        Ok(())
    }

    /// Collect samples for the configured pair and run the rank-sum test
    pub async fn compare(config: &Config) -> Result<ComparisonReport> {
        let warnings = validate_config(config)?;

        if config.debug {
            eprintln!("Configuration Summary:");
            eprintln!("{}", display_config_summary(config));
        }

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        let logger = SamplingLogger::new(config);
        let sampler = Sampler::from_config(config.sample_config())?.with_logger(logger.clone());

        let started_at = Utc::now();
        let samples = sampler.collect(&config.x_request, &config.y_request).await?;

        let result = MannWhitneyTest::new(config.tie_mode).run(samples.x.as_slice(), samples.y.as_slice())?;

        let run_id = logger
            .logger()
            .session_id()
            .await
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(ComparisonReport::new(run_id, started_at, config, samples, result))
    }
}
