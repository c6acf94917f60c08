//! Command-line interface and orchestration for issue-slicer
//!
//! This module implements the CLI commands and wires the issue download, the triage
//! aggregation and the report renderers together. It handles argument parsing,
//! configuration management, credentials, and the high-level workflows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **download**: Page through the issues of the configured repositories with the GitHub
//!   GraphQL API and write them to a single CSV file
//! - **analyze**: Read such a CSV file, aggregate it into weekly and per-area tables,
//!   write the tables as CSV (and optionally Excel) files and print a console summary
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. Every handler initializes logging, loads the configuration,
//! does its work, and reports failures to the host's error stream together with an exit code.
//!
//! Configuration is a TOML file with `[download]`, `[labels]` and `[triage]` tables; every
//! key has a default, so an absent file is valid.

mod analyze;
mod common;
mod config;
mod credentials;
mod download;
mod host;
mod init;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use analyze::{AnalyzeArgs, analyze_issues};
pub use download::{DownloadArgs, download_issues};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
