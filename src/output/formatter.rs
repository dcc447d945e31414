//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{ComparisonReport, SamplePair},
    stats::{LatencySummary, MannWhitneyResult},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the two request templates and run parameters
    fn format_run_info(&self, report: &ComparisonReport) -> Result<String>;

    /// Format the per-trial latency table
    fn format_trial_table(&self, samples: &SamplePair) -> Result<String>;

    /// Format descriptive statistics for both sides
    fn format_summaries(&self, summaries: &[&LatencySummary]) -> Result<String>;

    /// Format the rank-sum test result; always ends with a `p: <value>` line
    fn format_test_result(&self, result: &MannWhitneyResult, alpha: f64) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show intermediate test quantities
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

pub(crate) fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Fractional milliseconds with fixed precision
pub(crate) fn format_ms(ms: f64) -> String {
    format!("{:.3}", ms)
}

/// Significance with enough digits to compare against small levels
pub(crate) fn format_p(p: f64) -> String {
    if p != 0.0 && p < 1e-4 {
        format!("{:.3e}", p)
    } else {
        format!("{:.6}", p)
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output.trim_end().to_string()
    }

    /// Calculate column widths from headers and content
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format.columns.len().max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let base = format
                    .columns
                    .get(col_idx)
                    .map(|c| c.min_width.max(c.header.len()))
                    .unwrap_or(0);
                rows.iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| cell.len())
                    .fold(base, usize::max)
            })
            .collect()
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&self.align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Align text within specified width
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        match alignment {
            Alignment::Left => format!("{:<width$}", text, width = width),
            Alignment::Right => format!("{:>width$}", text, width = width),
        }
    }

    pub(crate) fn trial_table_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("#", Alignment::Right, 2),
                Column::new("x (ms)", Alignment::Right, 8),
                Column::new("y (ms)", Alignment::Right, 8),
            ],
            show_borders: self.options.table_borders,
            show_header: true,
        }
    }

    pub(crate) fn trial_rows(samples: &SamplePair) -> Vec<RowData> {
        samples
            .rows()
            .map(|(i, x, y)| {
                vec![
                    (i + 1).to_string(),
                    format_ms(crate::models::sample::as_millis_f64(x)),
                    format_ms(crate::models::sample::as_millis_f64(y)),
                ]
            })
            .collect()
    }

    pub(crate) fn summary_table_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("side", Alignment::Left, 4),
                Column::new("n", Alignment::Right, 3),
                Column::new("min", Alignment::Right, 8),
                Column::new("median", Alignment::Right, 8),
                Column::new("mean", Alignment::Right, 8),
                Column::new("max", Alignment::Right, 8),
                Column::new("std dev", Alignment::Right, 8),
            ],
            show_borders: self.options.table_borders,
            show_header: true,
        }
    }

    pub(crate) fn summary_rows(summaries: &[&LatencySummary]) -> Vec<RowData> {
        summaries
            .iter()
            .map(|s| {
                vec![
                    s.side.to_string(),
                    s.count.to_string(),
                    format_ms(s.min_ms),
                    format_ms(s.median_ms),
                    format_ms(s.mean_ms),
                    format_ms(s.max_ms),
                    format_ms(s.std_dev_ms),
                ]
            })
            .collect()
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_error)?;
        writeln!(output, "  {}", title).map_err(fmt_error)?;
        write!(output, "{}", border).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_run_info(&self, report: &ComparisonReport) -> Result<String> {
        let mut output = String::new();
        let config = &report.sample_config;

        writeln!(output, "x: {} {}", report.x_request.method, report.x_request.url).map_err(fmt_error)?;
        writeln!(output, "y: {} {}", report.y_request.method, report.y_request.url).map_err(fmt_error)?;
        write!(
            output,
            "{} paired trials after {} warm-up pair(s), timeout {}, ties: {}",
            config.sample_size,
            config.throwaways,
            humantime::format_duration(config.request_timeout),
            report.result.tie_mode.as_str()
        )
        .map_err(fmt_error)?;

        if self.options.verbose_mode {
            write!(
                output,
                "\nrun {} ({} to {})",
                report.run_id,
                report.started_at.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                report.finished_at.format("%H:%M:%S%.3f")
            )
            .map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn format_trial_table(&self, samples: &SamplePair) -> Result<String> {
        Ok(self.create_table(&self.trial_table_format(), &Self::trial_rows(samples)))
    }

    fn format_summaries(&self, summaries: &[&LatencySummary]) -> Result<String> {
        Ok(self.create_table(&self.summary_table_format(), &Self::summary_rows(summaries)))
    }

    fn format_test_result(&self, result: &MannWhitneyResult, alpha: f64) -> Result<String> {
        let mut output = String::new();

        if self.options.verbose_mode {
            writeln!(output, "x rank sum: {}", result.x_rank_sum).map_err(fmt_error)?;
            writeln!(output, "U1: {}  U2: {}", result.u1, result.u2).map_err(fmt_error)?;
            writeln!(
                output,
                "expected U: {}  std dev U: {:.4}",
                result.expected_u, result.std_dev_u
            )
            .map_err(fmt_error)?;
        }

        writeln!(output, "U: {}", result.u_min).map_err(fmt_error)?;
        writeln!(output, "z: {:.4}", result.z_score).map_err(fmt_error)?;
        write!(output, "p: {}", format_p(result.p_value)).map_err(fmt_error)?;
        if result.is_significant(alpha) {
            write!(output, "  (significant at {})", alpha).map_err(fmt_error)?;
        }

        Ok(output)
    }
}
