use chrono::{DateTime, Utc};
use core::cmp::Ordering;
use std::sync::Arc;

/// One issue of a repository, flattened for CSV output and triage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    pub repository: Arc<str>,
    pub number: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub milestone: Option<String>,
    pub primary_area: Option<String>,
    pub is_bug: bool,
    pub labels: Vec<String>,
}

impl IssueRow {
    /// An issue is open exactly when it has no close timestamp.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// The milestone name, treating an empty name as no milestone.
    #[must_use]
    pub fn milestone(&self) -> Option<&str> {
        self.milestone.as_deref().filter(|m| !m.is_empty())
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Output order of the issues file: creation time, then repository, then number.
    #[must_use]
    pub fn cmp_output_order(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.repository.cmp(&other.repository))
            .then_with(|| self.number.cmp(&other.number))
    }
}
