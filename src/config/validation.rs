//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
    types::Side,
};
use colored::Colorize;
use std::time::Duration;

/// Below this many trials the normal approximation of U gets rough
const RECOMMENDED_SAMPLE_SIZE: usize = 20;
const LARGE_SAMPLE_SIZE: usize = 1_000;
const SHORT_TIMEOUT: Duration = Duration::from_secs(1);
const LONG_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration validator with advisory checks on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning non-fatal warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_sampling(config));
        warnings.extend(Self::validate_requests(config));
        warnings.extend(Self::validate_timeout(config.request_timeout()));

        Ok(warnings)
    }

    /// Sample size and warm-up checks
    fn validate_sampling(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.sample_size < RECOMMENDED_SAMPLE_SIZE {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Sample size of {} makes the normal approximation unreliable (recommended: >= {})",
                    config.sample_size, RECOMMENDED_SAMPLE_SIZE
                ),
            ));
        } else if config.sample_size > LARGE_SAMPLE_SIZE {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Sample size of {} will send {} requests",
                    config.sample_size,
                    config.sample_config().total_requests()
                ),
            ));
        }

        if config.throwaways == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "No warm-up pairs: the first X request also pays for connection setup".to_string(),
            ));
        }

        warnings
    }

    /// Request template checks
    fn validate_requests(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for side in [Side::X, Side::Y] {
            let request = config.request(side);
            if request.has_stray_body() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} body is set without a content type and will not be sent", side),
                ));
            }
        }

        let x_scheme = url::Url::parse(&config.x_request.url).ok().map(|u| u.scheme().to_string());
        let y_scheme = url::Url::parse(&config.y_request.url).ok().map(|u| u.scheme().to_string());
        if let (Some(x), Some(y)) = (x_scheme, y_scheme) {
            if x != y {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("X uses {} but Y uses {}, so TLS cost differs between sides", x, y),
                ));
            }
        }

        if config.x_request == config.y_request {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "X and Y are identical requests".to_string(),
            ));
        }

        warnings
    }

    /// Timeout checks
    fn validate_timeout(timeout: Duration) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if timeout < SHORT_TIMEOUT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Request timeout of {} may abort the run on a single slow response",
                    humantime::format_duration(timeout)
                ),
            ));
        } else if timeout > LONG_TIMEOUT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Long request timeout of {} will slow down failure detection",
                    humantime::format_duration(timeout)
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        let tag = if use_color {
            match self.level {
                ValidationLevel::Info => tag.blue().to_string(),
                ValidationLevel::Warning => tag.yellow().to_string(),
            }
        } else {
            tag
        };
        format!("{} {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestSpec;

    fn configured() -> Config {
        let mut config = Config::default();
        config.x_request = RequestSpec::get("https://old.example/search");
        config.y_request = RequestSpec::get("https://new.example/search");
        config
    }

    fn messages(config: &Config) -> Vec<String> {
        validate_config(config)
            .unwrap()
            .into_iter()
            .map(|w| w.message)
            .collect()
    }

    #[test]
    fn test_default_run_has_no_warnings() {
        assert!(validate_config(&configured()).unwrap().is_empty());
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let mut config = configured();
        config.y_request.url.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_small_sample_warning() {
        let mut config = configured();
        config.sample_size = 5;

        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Warning);
        assert!(warnings[0].message.contains("normal approximation"));
    }

    #[test]
    fn test_large_sample_info() {
        let mut config = configured();
        config.sample_size = 5_000;

        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings[0].level, ValidationLevel::Info);
        assert!(warnings[0].message.contains("10002 requests"));
    }

    #[test]
    fn test_zero_throwaways_warning() {
        let mut config = configured();
        config.throwaways = 0;
        assert!(messages(&config).iter().any(|m| m.contains("No warm-up pairs")));
    }

    #[test]
    fn test_stray_body_warning() {
        let mut config = configured();
        config.y_request.body = Some("q=1".to_string());
        config.y_request.body_type = None;
        assert!(messages(&config).iter().any(|m| m.starts_with("y body is set")));
    }

    #[test]
    fn test_mixed_scheme_warning() {
        let mut config = configured();
        config.x_request.url = "http://old.example/search".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("X uses http but Y uses https")));
    }

    #[test]
    fn test_identical_requests_info() {
        let mut config = configured();
        config.y_request = config.x_request.clone();
        assert!(messages(&config).iter().any(|m| m.contains("identical")));
    }

    #[test]
    fn test_timeout_warnings() {
        let mut config = configured();
        config.request_timeout = Duration::from_millis(200);
        assert!(messages(&config).iter().any(|m| m.contains("200ms")));

        config.request_timeout = Duration::from_secs(300);
        assert!(messages(&config).iter().any(|m| m.contains("5m")));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
        assert!(warning.format(true).contains("careful"));
    }
}
