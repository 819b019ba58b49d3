//! FILENAME: app/src/lib.rs
// PURPOSE: Library entry point for the sales report.
// CONTEXT: `main.rs` parses arguments and calls `run_cli`; integration
// tests drive `pipeline::run` directly.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod summary;

pub use config::{Cli, ReportConfig};
pub use error::ReportError;
pub use logging::{flush_log, get_log_path, init_logging, next_seq, write_log};
pub use pipeline::{run, ReportCharts, ReportViews, RunOutcome, SHEET_ORDER};

/// Runs with logging set up from `config`. Returns the outcome or the
/// first error, which is also logged.
pub fn run_cli(config: &ReportConfig) -> Result<RunOutcome, ReportError> {
    init_logging(config.log_file.as_deref(), config.log_level, config.verbose)?;
    log_info!("SYS", "sales-report {}", env!("CARGO_PKG_VERSION"));

    let result = run(config);
    if let Err(e) = &result {
        log_error!(e.category(), "{}", e);
    }
    flush_log();
    result
}
