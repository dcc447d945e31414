//! Colored formatter implementation with terminal color support
//!
//! Wraps the plain formatter and adds ANSI colors to headers, table
//! borders and the significance line.

use super::formatter::{format_p, fmt_error, FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    error::Result,
    models::{ComparisonReport, SamplePair},
    stats::{LatencySummary, MannWhitneyResult},
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub info: Color,
    pub highlight: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            info: Color::Cyan,
            highlight: Color::Magenta,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply bold color if colors are enabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Color a rendered plain table line by line; widths are computed before
    /// any escape codes are added.
    fn paint_table(&self, table: &str) -> String {
        let mut header_seen = false;
        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    self.colorize(line, self.color_scheme.border).to_string()
                } else if !header_seen {
                    header_seen = true;
                    self.bold(line).to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}\n{}",
            self.colorize(&border, self.color_scheme.header),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_run_info(&self, report: &ComparisonReport) -> Result<String> {
        let plain = self.plain_formatter.format_run_info(report)?;
        let mut output = String::new();

        for (idx, line) in plain.lines().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            match line.split_once(": ") {
                Some((label, rest)) if idx < 2 => {
                    write!(
                        output,
                        "{}: {}",
                        self.emphasize(label, self.color_scheme.highlight),
                        rest
                    )
                    .map_err(fmt_error)?;
                }
                _ => output.push_str(&self.dimmed(line).to_string()),
            }
        }

        Ok(output)
    }

    fn format_trial_table(&self, samples: &SamplePair) -> Result<String> {
        let table = self.plain_formatter.format_trial_table(samples)?;
        if table.is_empty() {
            return Ok(self.colorize("No trials recorded.", self.color_scheme.muted).to_string());
        }
        Ok(self.paint_table(&table))
    }

    fn format_summaries(&self, summaries: &[&LatencySummary]) -> Result<String> {
        let table = self.plain_formatter.format_summaries(summaries)?;
        Ok(self.paint_table(&table))
    }

    fn format_test_result(&self, result: &MannWhitneyResult, alpha: f64) -> Result<String> {
        let mut output = String::new();

        if self.options.verbose_mode {
            writeln!(
                output,
                "{}",
                self.dimmed(&format!(
                    "x rank sum: {}  U1: {}  U2: {}  expected U: {}  std dev U: {:.4}",
                    result.x_rank_sum, result.u1, result.u2, result.expected_u, result.std_dev_u
                ))
            )
            .map_err(fmt_error)?;
        }

        writeln!(output, "{} {}", self.bold("U:"), result.u_min).map_err(fmt_error)?;
        writeln!(output, "{} {:.4}", self.bold("z:"), result.z_score).map_err(fmt_error)?;

        let p_text = format_p(result.p_value);
        if result.is_significant(alpha) {
            write!(
                output,
                "{} {}  {}",
                self.bold("p:"),
                self.emphasize(&p_text, self.color_scheme.success),
                self.colorize(&format!("(significant at {})", alpha), self.color_scheme.success)
            )
            .map_err(fmt_error)?;
        } else {
            write!(
                output,
                "{} {}",
                self.bold("p:"),
                self.colorize(&p_text, self.color_scheme.info)
            )
            .map_err(fmt_error)?;
        }

        Ok(output)
    }
}
