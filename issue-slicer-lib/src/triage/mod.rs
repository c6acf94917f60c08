//! Aggregation of issue rows into triage tables
//!
//! Everything here is a pure function of the rows and a reference "now", so an analysis can be
//! reproduced exactly from a CSV file and a timestamp.
//!
//! [`analyze`] produces a [`TriageReport`] with four parts:
//!
//! - weekly opened/closed counts ([`WeeklyBucket`]),
//! - per-area counts of open bugs in target milestones and without a milestone
//!   ([`AreaTriageSummary`]),
//! - an overall [`BugSummary`],
//! - a per-label weekly intake ([`CategoryBreakdown`]).

mod area;
mod bugs;
mod categories;
mod milestones;
mod weekly;

pub use area::{AreaOrder, AreaTriageSummary, NO_AREA, summarize_areas};
pub use bugs::{BugBucket, BugSummary};
pub use categories::{CategoryBreakdown, CategoryWeek};
pub use milestones::{GaMilestoneRule, MilestoneSet};
pub use weekly::{WeeklyBucket, bucket_by_week, week_starts};

use crate::issues::IssueRow;
use chrono::{DateTime, NaiveDate, Utc};

const LOG_TARGET: &str = "    triage";

/// Knobs of an analysis.
#[derive(Debug, Clone, Default)]
pub struct TriageOptions {
    /// First day of the weekly tables. When unset, the day the oldest issue was created.
    pub start_date: Option<NaiveDate>,

    /// Milestones always treated as targets.
    pub target_milestones: Vec<String>,

    /// Rule adding observed milestones to the targets.
    pub ga_milestones: Option<GaMilestoneRule>,

    pub future_milestones: Vec<String>,
    pub category_labels: Vec<String>,
    pub area_order: AreaOrder,
}

/// The result of an analysis.
#[derive(Debug, Clone)]
pub struct TriageReport {
    pub now: DateTime<Utc>,
    pub start_date: NaiveDate,
    pub target_milestones: MilestoneSet,
    pub weeks: Vec<WeeklyBucket>,
    pub areas: Vec<AreaTriageSummary>,
    pub bugs: BugSummary,
    pub categories: CategoryBreakdown,
}

#[must_use]
pub fn analyze(rows: &[IssueRow], now: DateTime<Utc>, options: &TriageOptions) -> TriageReport {
    let start_date = options
        .start_date
        .or_else(|| rows.iter().map(|r| r.created_at.date_naive()).min())
        .unwrap_or_else(|| now.date_naive());

    let target_milestones = MilestoneSet::targets(&options.target_milestones, options.ga_milestones.as_ref(), rows);
    let future_milestones = MilestoneSet::new(&options.future_milestones);

    log::debug!(
        target: LOG_TARGET,
        "Analyzing {} issues from {start_date} to {now} with {} target milestones",
        rows.len(),
        target_milestones.len()
    );

    let weeks = bucket_by_week(rows, start_date, now);
    let areas = summarize_areas(rows, &target_milestones, options.area_order);
    let bugs = BugSummary::compute(rows, &target_milestones, &future_milestones);
    let categories = CategoryBreakdown::compute(rows, &weeks, &options.category_labels);

    TriageReport {
        now,
        start_date,
        target_milestones,
        weeks,
        areas,
        bugs,
        categories,
    }
}
