use super::WeeklyBucket;
use crate::issues::IssueRow;
use chrono::NaiveDate;

/// Issues opened in one week, per category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWeek {
    pub week_start: NaiveDate,

    /// One count per category, in the order of [`CategoryBreakdown::labels`].
    pub counts: Vec<u64>,
}

/// Weekly intake split by a fixed list of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub labels: Vec<String>,
    pub weeks: Vec<CategoryWeek>,
}

impl CategoryBreakdown {
    /// Count, for every week and label, the issues created in the week that carry the label.
    #[must_use]
    pub fn compute(rows: &[IssueRow], weeks: &[WeeklyBucket], labels: &[String]) -> Self {
        let weeks = weeks
            .iter()
            .map(|week| {
                let opened: Vec<&IssueRow> = rows.iter().filter(|r| week.contains(r.created_at.date_naive())).collect();
                CategoryWeek {
                    week_start: week.week_start,
                    counts: labels
                        .iter()
                        .map(|label| opened.iter().filter(|r| r.has_label(label)).count() as u64)
                        .collect(),
                }
            })
            .collect();

        Self {
            labels: labels.to_vec(),
            weeks,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn issue(day: u32, labels: &[&str]) -> IssueRow {
        IssueRow {
            repository: Arc::from("maui"),
            number: 1,
            title: String::new(),
            created_at: Utc.with_ymd_and_hms(2021, 6, day, 0, 0, 0).unwrap(),
            closed_at: None,
            milestone: None,
            primary_area: None,
            is_bug: false,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    fn week(day: u32) -> WeeklyBucket {
        WeeklyBucket {
            week_start: NaiveDate::from_ymd_opt(2021, 6, day).unwrap(),
            opened: 0,
            closed: 0,
        }
    }

    #[test]
    fn test_compute() {
        let rows = vec![
            issue(1, &["t/bug", "area/xaml"]),
            issue(2, &["t/enhancement"]),
            issue(3, &["t/bug"]),
            issue(9, &["t/bug", "t/enhancement"]),
        ];
        let labels = vec!["t/bug".to_string(), "t/enhancement".to_string()];

        let breakdown = CategoryBreakdown::compute(&rows, &[week(1), week(8)], &labels);
        assert_eq!(breakdown.labels, labels);
        assert_eq!(breakdown.weeks[0].counts, vec![2, 1]);
        assert_eq!(breakdown.weeks[1].counts, vec![1, 1]);
        assert_eq!(breakdown.weeks[1].week_start, NaiveDate::from_ymd_opt(2021, 6, 8).unwrap());
    }

    #[test]
    fn test_without_labels() {
        let breakdown = CategoryBreakdown::compute(&[issue(1, &["t/bug"])], &[week(1)], &[]);
        assert!(breakdown.is_empty());
        assert!(breakdown.weeks[0].counts.is_empty());
    }
}
