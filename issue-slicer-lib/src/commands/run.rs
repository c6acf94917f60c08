//! Command dispatch logic for issue-slicer

use super::{AnalyzeArgs, DownloadArgs, InitArgs, analyze_issues, download_issues, init_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::io::Write;

/// Exit code reported for an unusable command line.
const USAGE_EXIT_CODE: i32 = 1;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "issue-slicer", version, author, long_about = None)]
#[command(about = "Download GitHub issues to CSV and slice them into triage reports")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: SlicerSubcommand,
}

#[derive(Subcommand, Debug)]
enum SlicerSubcommand {
    /// Download the issues of GitHub repositories into a CSV file
    Download(Box<DownloadArgs>),
    /// Aggregate a downloaded CSV file into weekly and per-area reports
    Analyze(Box<AnalyzeArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = write!(host.output(), "{}", e.render());
            return Ok(());
        }
        Err(e) => {
            let _ = write!(host.error(), "{}", e.render());
            host.exit(USAGE_EXIT_CODE);
            return Err(e.into());
        }
    };

    match &cli.command {
        SlicerSubcommand::Download(download_args) => download_issues(host, download_args).await,
        SlicerSubcommand::Analyze(analyze_args) => analyze_issues(host, analyze_args),
        SlicerSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
