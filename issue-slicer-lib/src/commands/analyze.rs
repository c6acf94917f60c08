use super::Host;
use super::common::CommonArgs;
use super::config::Config;
use crate::Result;
use crate::issues::issues_csv;
use crate::reports::{
    AREA_FILE_NAME, CATEGORY_FILE_NAME, WEEKLY_FILE_NAME, generate_area_csv, generate_category_csv, generate_console,
    generate_weekly_csv, generate_xlsx,
};
use crate::triage::{TriageReport, analyze};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   analyze";

/// Exit code reported when an analysis fails.
pub const ANALYSIS_FAILURE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Issues CSV file produced by the download command
    #[arg(value_name = "CSV")]
    pub input: Utf8PathBuf,

    /// Also write the tables to an Excel workbook
    #[arg(long, value_name = "PATH")]
    pub excel: Option<Utf8PathBuf>,

    /// Reference time closing the last week (default is the current time)
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,

    /// First day of the weekly tables, overriding the configuration
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "from_oldest")]
    pub start_date: Option<NaiveDate>,

    /// Start the weekly tables at the oldest issue, ignoring the configured start date
    #[arg(long)]
    pub from_oldest: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn analyze_issues<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    args.common.init_logging();

    match analyze_file(args) {
        Ok((report, config)) => {
            let mut console_output = String::new();
            generate_console(&report, args.common.use_colors(), config.triage.max_console_areas, &mut console_output)?;
            let _ = write!(host.output(), "{console_output}");
            Ok(())
        }

        Err(e) => {
            let _ = writeln!(host.error(), "Analysis failed: {e}");
            host.exit(ANALYSIS_FAILURE_EXIT_CODE);
            Err(e)
        }
    }
}

fn analyze_file(args: &AnalyzeArgs) -> Result<(TriageReport, Config)> {
    let config = Config::load(args.common.config.as_deref())?;

    let mut options = config.triage.options();
    if args.from_oldest {
        options.start_date = None;
    } else if args.start_date.is_some() {
        options.start_date = args.start_date;
    }

    let rows = issues_csv::read_file(&args.input)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let report = analyze(&rows, now, &options);

    let report_dir = report_dir(&args.input)?;
    write_csv_reports(&report, &report_dir)?;

    if let Some(path) = &args.excel {
        let mut file = fs::File::create(path).into_app_err_with(|| format!("unable to create workbook '{path}'"))?;
        generate_xlsx(&report, &mut file)?;
        log::info!(target: LOG_TARGET, "Wrote workbook '{path}'");
    }

    Ok((report, config))
}

/// Reports land next to the input, in a directory named after its stem.
fn report_dir(input: &Utf8Path) -> Result<Utf8PathBuf> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| app_err!("cannot derive a report directory from '{input}'"))?;

    Ok(input.parent().unwrap_or_else(|| Utf8Path::new("")).join(stem))
}

fn write_csv_reports(report: &TriageReport, dir: &Utf8Path) -> Result<()> {
    fs::create_dir_all(dir).into_app_err_with(|| format!("unable to create report directory '{dir}'"))?;

    let mut weekly = String::new();
    generate_weekly_csv(&report.weeks, &mut weekly)?;
    write_report(&dir.join(WEEKLY_FILE_NAME), &weekly)?;

    let mut areas = String::new();
    generate_area_csv(&report.areas, &mut areas)?;
    write_report(&dir.join(AREA_FILE_NAME), &areas)?;

    if !report.categories.is_empty() {
        let mut categories = String::new();
        generate_category_csv(&report.categories, &mut categories)?;
        write_report(&dir.join(CATEGORY_FILE_NAME), &categories)?;
    }

    Ok(())
}

fn write_report(path: &Utf8Path, contents: &str) -> Result<()> {
    fs::write(path, contents).into_app_err_with(|| format!("unable to write report '{path}'"))?;
    log::info!(target: LOG_TARGET, "Wrote '{path}'");
    Ok(())
}
