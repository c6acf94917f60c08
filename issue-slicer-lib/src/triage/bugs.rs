use super::MilestoneSet;
use crate::issues::IssueRow;
use strum::{Display, EnumIter};

/// Triage state of an open bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum BugBucket {
    #[strum(serialize = "Target milestones")]
    Target,

    #[strum(serialize = "Future milestones")]
    Future,

    Untriaged,

    /// Open bugs in some other milestone.
    Unknown,
}

/// Where the open bugs stand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BugSummary {
    pub total_issues: u64,
    pub open_bugs: u64,
    pub target_milestone_bugs: u64,
    pub future_milestone_bugs: u64,
    pub untriaged_bugs: u64,
    pub unknown_bugs: u64,
}

impl BugSummary {
    #[must_use]
    pub fn compute(rows: &[IssueRow], targets: &MilestoneSet, future: &MilestoneSet) -> Self {
        let mut summary = Self {
            total_issues: rows.len() as u64,
            ..Self::default()
        };

        for row in rows.iter().filter(|r| r.is_open() && r.is_bug) {
            summary.open_bugs += 1;

            if targets.contains_row(row) {
                summary.target_milestone_bugs += 1;
            }

            if future.contains_row(row) {
                summary.future_milestone_bugs += 1;
            }

            if row.milestone().is_none() {
                summary.untriaged_bugs += 1;
            }
        }

        // a milestone listed both as target and future is counted twice, hence the saturation
        summary.unknown_bugs = summary
            .open_bugs
            .saturating_sub(summary.target_milestone_bugs)
            .saturating_sub(summary.future_milestone_bugs)
            .saturating_sub(summary.untriaged_bugs);

        summary
    }

    #[must_use]
    pub const fn count(&self, bucket: BugBucket) -> u64 {
        match bucket {
            BugBucket::Target => self.target_milestone_bugs,
            BugBucket::Future => self.future_milestone_bugs,
            BugBucket::Untriaged => self.untriaged_bugs,
            BugBucket::Unknown => self.unknown_bugs,
        }
    }
}
