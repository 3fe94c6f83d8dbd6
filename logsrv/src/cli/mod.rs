//! CLI module for logsrv
//!
//! Every option can also be supplied through its `LOGSRV_*` environment variable.

pub mod serve;

use clap::Parser;

/// Log Server - exposes the monitor snapshot over HTTP
#[derive(Parser, Debug)]
#[command(name = "logsrv")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    LOGSRV_LOG_LEVEL        Log level (default: info)
    LOGSRV_LOG_DIR          Write a daily rolling log file into this directory
"#)]
pub struct Cli {
    /// Server options
    #[command(flatten)]
    pub serve: serve::ServeArgs,
}
