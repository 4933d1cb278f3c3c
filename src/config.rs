//! Module for the runtime configuration, read from the command line with environment fallbacks

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Watches a directory for sales files and writes one JSON report per file.
#[derive(Debug, Clone, Parser)]
#[command(name = "sales-analyzer", version)]
pub struct Config {
    /// Directory watched for new input files
    #[arg(long, env = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory the reports are written to
    #[arg(long, env = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Number of files processed concurrently
    #[arg(long, env = "WORKERS", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: u16,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            workers: 1,
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}
