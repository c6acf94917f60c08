use crate::issues::IssueRow;
use std::collections::BTreeMap;

/// Recognizes the milestones of a release by name prefix, skipping servicing milestones and the like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaMilestoneRule {
    prefix: String,
    exclusions: Vec<String>,
}

impl GaMilestoneRule {
    #[must_use]
    pub fn new(prefix: impl AsRef<str>, exclusions: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            prefix: prefix.as_ref().to_lowercase(),
            exclusions: exclusions.into_iter().map(|e| e.as_ref().to_lowercase()).collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, milestone: &str) -> bool {
        let milestone = milestone.to_lowercase();
        milestone.starts_with(&self.prefix) && !self.exclusions.iter().any(|e| milestone.contains(e.as_str()))
    }
}

/// A set of milestone names compared case-insensitively.
///
/// Names keep the spelling they were first seen with, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneSet {
    names: BTreeMap<String, String>,
}

impl MilestoneSet {
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref());
        }

        set
    }

    /// The milestones triage work is aimed at: every explicitly named milestone plus every
    /// milestone observed in `rows` that the release rule accepts.
    #[must_use]
    pub fn targets(explicit: &[String], rule: Option<&GaMilestoneRule>, rows: &[IssueRow]) -> Self {
        let mut set = Self::new(explicit);

        if let Some(rule) = rule {
            for milestone in rows.iter().filter_map(IssueRow::milestone) {
                if rule.matches(milestone) {
                    set.insert(milestone);
                }
            }
        }

        set
    }

    pub fn insert(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }

        let _ = self.names.entry(name.to_lowercase()).or_insert_with(|| name.to_string());
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        !name.is_empty() && self.names.contains_key(&name.to_lowercase())
    }

    /// Whether the row's milestone is a member of this set.
    #[must_use]
    pub fn contains_row(&self, row: &IssueRow) -> bool {
        row.milestone().is_some_and(|m| self.contains(m))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn with_milestone(milestone: &str) -> IssueRow {
        IssueRow {
            repository: Arc::from("maui"),
            number: 1,
            title: String::new(),
            created_at: Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap(),
            closed_at: None,
            milestone: Some(milestone.to_string()),
            primary_area: None,
            is_bug: true,
            labels: Vec::new(),
        }
    }

    #[test]
    fn test_ga_rule() {
        let rule = GaMilestoneRule::new("6.0", ["servicing"]);
        assert!(rule.matches("6.0.100-rc.1"));
        assert!(rule.matches("6.0.100"));
        assert!(!rule.matches("6.0.1xx-Servicing"));
        assert!(!rule.matches(".NET 7"));
        assert!(!rule.matches("16.0"));
    }

    #[test]
    fn test_targets_from_observed_milestones() {
        let rows = vec![
            with_milestone("6.0.100-preview.7"),
            with_milestone("6.0.100-preview.7"),
            with_milestone("6.0.1xx-servicing"),
            with_milestone("Future"),
            with_milestone(""),
        ];

        let rule = GaMilestoneRule::new("6.0", ["servicing"]);
        let targets = MilestoneSet::targets(&["Backlog".to_string()], Some(&rule), &rows);

        assert_eq!(targets.names().collect::<Vec<_>>(), vec!["6.0.100-preview.7", "Backlog"]);
        assert!(targets.contains("backlog"));
        assert!(!targets.contains("Future"));
        assert!(!targets.contains(""));
    }

    #[test]
    fn test_targets_without_rule() {
        let rows = vec![with_milestone("6.0.100")];
        let targets = MilestoneSet::targets(&[], None, &rows);
        assert!(targets.is_empty());
        assert!(!targets.contains_row(&rows[0]));
    }

    #[test]
    fn test_case_insensitive_membership() {
        let set = MilestoneSet::new([".NET 7", "Future"]);
        assert!(set.contains(".net 7"));
        assert!(set.contains("FUTURE"));
        assert!(set.contains_row(&with_milestone("future")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_first_spelling_wins() {
        let set = MilestoneSet::new(["Future", "FUTURE"]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Future"]);
    }
}
