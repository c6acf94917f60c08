use super::Host;
use super::ProgressReporter;
use super::common::CommonArgs;
use super::config::Config;
use super::credentials::{default_secrets_path, resolve_token};
use crate::Result;
use crate::issues::github::{FetchSummary, Fetcher, GraphQlClient};
use crate::issues::{Progress, RepoSpec, issues_csv};
use camino::Utf8PathBuf;
use clap::Parser;
use core::time::Duration;
use ohno::bail;
use std::io::Write;
use std::path::PathBuf;

const LOG_TARGET: &str = "  download";

/// How long a download runs before the progress bar shows up.
const PROGRESS_DELAY: Duration = Duration::from_millis(300);

/// Exit code reported when a download fails.
pub const DOWNLOAD_FAILURE_EXIT_CODE: i32 = -1;

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Output CSV file (default is `output` from the configuration)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Repository to download, replacing the configured list (repeatable)
    #[arg(long = "repo", value_name = "OWNER/NAME")]
    pub repos: Vec<RepoSpec>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// File holding `github_token` when no token is given otherwise
    /// (default is `issue-slicer/secrets.toml` in the user's config directory)
    #[arg(long, value_name = "PATH")]
    pub secrets_file: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

struct DownloadOutcome {
    output: Utf8PathBuf,
    rows: usize,
    summaries: Vec<FetchSummary>,
}

pub async fn download_issues<H: Host>(host: &mut H, args: &DownloadArgs) -> Result<()> {
    args.common.init_logging();

    match download(args).await {
        Ok(outcome) => {
            for summary in outcome.summaries.iter().filter(|s| s.abandoned) {
                let _ = writeln!(
                    host.error(),
                    "Gave up on {} after {} of {} issues",
                    summary.repo,
                    summary.fetched,
                    summary.total_count.unwrap_or_default()
                );
            }

            let _ = writeln!(
                host.output(),
                "Wrote {} issues from {} repositories to {}",
                outcome.rows,
                outcome.summaries.len(),
                outcome.output
            );
            Ok(())
        }

        Err(e) => {
            let _ = writeln!(host.error(), "Download failed: {e}");
            host.exit(DOWNLOAD_FAILURE_EXIT_CODE);
            Err(e)
        }
    }
}

async fn download(args: &DownloadArgs) -> Result<DownloadOutcome> {
    let config = Config::load(args.common.config.as_deref())?;

    let repositories = if args.repos.is_empty() { &config.download.repositories } else { &args.repos };
    if repositories.is_empty() {
        bail!("no repositories to download, list some in the configuration or pass --repo");
    }

    let output = args.output.clone().unwrap_or_else(|| config.download.output.clone());
    let secrets_path = args.secrets_file.clone().or_else(default_secrets_path);
    let token = resolve_token(args.github_token.as_deref(), secrets_path.as_deref())?;
    let rules = config.labels.rules()?;

    // an unwritable output stops the run before any request is made
    let file = issues_csv::create_file(&output)?;

    let client = GraphQlClient::new(
        &token,
        config.download.endpoint.clone(),
        config.download.page_size,
        config.download.request_timeout,
    )?;

    let progress = ProgressReporter::new(args.common.show_progress(), PROGRESS_DELAY, args.common.use_colors_for_progress());
    let fetcher = Fetcher::new(&client, &rules, config.download.retry_policy(), &progress);

    let mut rows = Vec::new();
    let mut summaries = Vec::with_capacity(repositories.len());
    let mut failure = None;

    for repo in repositories {
        match fetcher.fetch_repository(repo, &mut rows).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    progress.done();

    if let Some(e) = &failure {
        log::error!(target: LOG_TARGET, "Download stopped early: {e}");
    }

    // rows gathered before a fatal error are still persisted
    let written = issues_csv::write_to_file(file, &output, &rows);

    match (failure, written) {
        (None, Ok(())) => Ok(DownloadOutcome {
            output,
            rows: rows.len(),
            summaries,
        }),
        (None, Err(e)) => Err(e),
        (Some(e), Ok(())) => {
            log::error!(target: LOG_TARGET, "{} issues were kept in '{output}'", rows.len());
            Err(e)
        }
        (Some(e), Err(write_err)) => {
            // the fetch failure stays the reported cause
            log::error!(target: LOG_TARGET, "Issues gathered before the failure were lost: {write_err}");
            Err(e)
        }
    }
}
