//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{self, Cli},
    config::env::EnvManager,
    error::Result,
    models::{Config, RequestSpec},
    types::Side,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration.
    ///
    /// Precedence, highest first: command line, environment (including
    /// `.env`), built-in defaults.
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        apply_request_overrides(
            &mut config.x_request,
            [&cli.x_method, &cli.x_url, &cli.x_body, &cli.x_body_type],
        );
        apply_request_overrides(
            &mut config.y_request,
            [&cli.y_method, &cli.y_url, &cli.y_body, &cli.y_body_type],
        );

        if let Some(timeout) = cli.request_timeout {
            config.request_timeout = timeout;
        }
        if let Some(sample_size) = cli.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(throwaways) = cli.throwaways {
            config.throwaways = throwaways;
        }
        if let Some(tie_mode) = cli.tie_mode {
            config.tie_mode = tie_mode;
        }

        config.output_format = cli.format;

        config.enable_color = match cli.color_override() {
            Some(forced) => forced,
            None => config.enable_color && cli::supports_color(),
        };

        // CLI-only flags
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Overrides in method, url, body, body type order
fn apply_request_overrides(spec: &mut RequestSpec, overrides: [&Option<String>; 4]) {
    let [method, url, body, body_type] = overrides;

    if let Some(method) = method {
        spec.method = method.trim().to_string();
    }
    if let Some(url) = url {
        spec.url = url.trim().to_string();
    }
    if let Some(body) = body {
        spec.body = Some(body.clone());
    }
    if let Some(body_type) = body_type {
        spec.body_type = Some(body_type.trim().to_string());
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    for side in [Side::X, Side::Y] {
        let request = config.request(side);
        summary.push(format!("{} request: {} {}", side.label().to_uppercase(), request.method, request.url));
        if let Some((body, body_type)) = request.payload() {
            summary.push(format!("{} body: {} byte(s) as {}", side.label().to_uppercase(), body.len(), body_type));
        }
    }
    summary.push(format!("Sample Size: {}", config.sample_size));
    summary.push(format!("Throwaways: {}", config.throwaways));
    summary.push(format!("Request Timeout: {}", humantime::format_duration(config.request_timeout())));
    summary.push(format!("Tie Mode: {}", config.tie_mode.as_str()));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
