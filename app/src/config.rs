//! FILENAME: app/src/config.rs
// PURPOSE: Command-line arguments and the validated run configuration.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::error::ReportError;

pub const DEFAULT_INPUT: &str = "Superstore.csv";
pub const DEFAULT_OUTPUT: &str = "output/dashboard.xlsx";
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "sales-report")]
#[command(about = "Analyze a retail sales CSV and export an XLSX dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Sales extract to analyze
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Report workbook to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of products on the Top Products sheet
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Also write the chart images as PNG files into this directory
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,

    /// Write the run log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Minimum log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Echo log lines to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<ReportConfig, ReportError> {
        let log_level: LevelFilter = self
            .log_level
            .parse()
            .map_err(|_| ReportError::Config(format!("unknown log level '{}'", self.log_level)))?;

        let config = ReportConfig {
            input: self.input,
            output: self.output,
            top_n: self.top_n,
            chart_dir: self.chart_dir,
            log_file: self.log_file,
            log_level,
            verbose: self.verbose,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything one run needs. Built from CLI arguments only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub top_n: usize,
    pub chart_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub verbose: bool,
}

impl ReportConfig {
    /// Defaults for everything except the two paths.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        ReportConfig {
            input: input.into(),
            output: output.into(),
            top_n: DEFAULT_TOP_N,
            chart_dir: None,
            log_file: None,
            log_level: LevelFilter::Info,
            verbose: false,
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.top_n == 0 {
            return Err(ReportError::Config("--top-n must be at least 1".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ReportError::Config("output path is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ReportConfig, ReportError> {
        let mut argv = vec!["sales-report"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, ReportConfig::new(DEFAULT_INPUT, DEFAULT_OUTPUT));
    }

    #[test]
    fn test_all_flags() {
        let config = parse(&[
            "sales.csv",
            "-o",
            "out/report.xlsx",
            "--top-n",
            "5",
            "--chart-dir",
            "charts",
            "--log-file",
            "run.log",
            "--log-level",
            "debug",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.input, PathBuf::from("sales.csv"));
        assert_eq!(config.output, PathBuf::from("out/report.xlsx"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.chart_dir, Some(PathBuf::from("charts")));
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(config.verbose);
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        assert!(matches!(parse(&["--top-n", "0"]), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(matches!(parse(&["--log-level", "loud"]), Err(ReportError::Config(_))));
    }
}
