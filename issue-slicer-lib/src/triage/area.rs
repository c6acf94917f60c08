use super::MilestoneSet;
use crate::issues::IssueRow;
use core::cmp::Ordering;
use core::fmt::{Display, Formatter};
use std::collections::BTreeMap;

/// Display name of the group of issues without a primary area.
pub const NO_AREA: &str = "(no area)";

/// How open bugs of one area are distributed over triage states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaTriageSummary {
    /// The primary area label, `None` for issues without one.
    pub area: Option<String>,
    pub in_target_milestones: u64,
    pub untriaged: u64,
}

impl AreaTriageSummary {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.area.as_deref().unwrap_or(NO_AREA)
    }

    fn sort_key(&self) -> &str {
        self.area.as_deref().unwrap_or_default()
    }
}

/// Tie-break order between areas with the same number of untriaged issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AreaOrder {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl AreaOrder {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::CaseSensitive => a.cmp(b),
            Self::CaseInsensitive => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }
}

impl Display for AreaOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CaseSensitive => write!(f, "case-sensitive"),
            Self::CaseInsensitive => write!(f, "case-insensitive"),
        }
    }
}

/// Summarize the open bugs of every area.
///
/// Only rows that are both open and bugs take part. Rows without a primary area, or with an
/// empty one, form a single group. The result is ordered by descending untriaged count, with
/// ties broken by area name; the group without an area sorts as the empty name.
#[must_use]
pub fn summarize_areas(rows: &[IssueRow], targets: &MilestoneSet, order: AreaOrder) -> Vec<AreaTriageSummary> {
    let mut groups: BTreeMap<Option<&str>, AreaTriageSummary> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.is_open() && r.is_bug) {
        let area = row.primary_area.as_deref().filter(|a| !a.is_empty());
        let summary = groups.entry(area).or_insert_with(|| AreaTriageSummary {
            area: area.map(str::to_string),
            in_target_milestones: 0,
            untriaged: 0,
        });

        if targets.contains_row(row) {
            summary.in_target_milestones += 1;
        }

        if row.milestone().is_none() {
            summary.untriaged += 1;
        }
    }

    let mut summaries: Vec<_> = groups.into_values().collect();
    summaries.sort_by(|a, b| {
        b.untriaged
            .cmp(&a.untriaged)
            .then_with(|| order.compare(a.sort_key(), b.sort_key()))
    });

    summaries
}
