//! http-mwu - Main CLI Application
//!
//! Compares the latency of two HTTP requests by paired, interleaved
//! sampling followed by a Mann-Whitney U test.

use clap::Parser;
use http_mwu::{app::App, cli::Cli, error::ErrorReporter};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
