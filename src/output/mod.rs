//! Output formatting and display system
//!
//! Renders a comparison report either as a human-readable text report
//! (colored or plain) or as pretty-printed JSON.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};

use crate::{
    error::{AppError, Result},
    models::ComparisonReport,
    types::OutputFormat,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    format: OutputFormat,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>, format: OutputFormat) -> Self {
        Self { formatter, format }
    }

    /// Coordinator matching the run configuration
    pub fn from_config(config: &crate::models::Config) -> Self {
        Self::new(
            OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            config.output_format,
        )
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a complete report in the configured format
    pub fn render(&self, report: &ComparisonReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| AppError::internal(format!("Failed to serialize report: {}", e))),
            OutputFormat::Text => self.render_text(report),
        }
    }

    fn render_text(&self, report: &ComparisonReport) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header("HTTP Latency Comparison")?,
            self.formatter.format_run_info(report)?,
            self.formatter.format_trial_table(&report.samples)?,
        ];

        let summaries: Vec<_> = [&report.x_summary, &report.y_summary]
            .into_iter()
            .flatten()
            .collect();
        if !summaries.is_empty() {
            sections.push(self.formatter.format_summaries(&summaries)?);
        }

        sections.push(report.verdict());
        // p line stays last
        sections.push(self.formatter.format_test_result(&report.result, report.alpha)?);

        let mut output = sections.join("\n\n");
        output.push('\n');
        Ok(output)
    }
}
