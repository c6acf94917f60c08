use crate::issues::IssueRow;
use chrono::{DateTime, Days, NaiveDate, Utc};

const WEEK_DAYS: u64 = 7;
const WEEK_MILLIS: u64 = WEEK_DAYS * 24 * 60 * 60 * 1000;

/// Issues opened and closed during one 7-day interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub opened: u64,
    pub closed: u64,
}

impl WeeklyBucket {
    /// First day after this bucket.
    #[must_use]
    pub fn week_end(&self) -> NaiveDate {
        next_week(self.week_start)
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start && date < self.week_end()
    }
}

fn next_week(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(WEEK_DAYS)).unwrap_or(NaiveDate::MAX)
}

/// Start dates of the weeks covering `[start, now]`.
///
/// The interval is measured from midnight of `start`, and a partial last week counts as a
/// full one.
#[must_use]
pub fn week_starts(start: NaiveDate, now: DateTime<Utc>) -> Vec<NaiveDate> {
    let start_time = start.and_time(chrono::NaiveTime::MIN).and_utc();
    let Ok(elapsed) = u64::try_from((now - start_time).num_milliseconds()) else {
        return Vec::new();
    };

    let weeks = elapsed.div_ceil(WEEK_MILLIS);
    let mut starts = Vec::new();
    let mut week = start;
    for _ in 0..weeks {
        starts.push(week);
        week = next_week(week);
    }

    starts
}

/// Count the issues opened and closed in every week from `start` to `now`.
///
/// Dates are compared by calendar day in UTC. An issue created exactly on the first day of a
/// week belongs to that week, not the one before.
#[must_use]
pub fn bucket_by_week(rows: &[IssueRow], start: NaiveDate, now: DateTime<Utc>) -> Vec<WeeklyBucket> {
    week_starts(start, now)
        .into_iter()
        .map(|week_start| {
            let mut bucket = WeeklyBucket {
                week_start,
                opened: 0,
                closed: 0,
            };

            for row in rows {
                if bucket.contains(row.created_at.date_naive()) {
                    bucket.opened += 1;
                }

                if let Some(closed_at) = row.closed_at
                    && bucket.contains(closed_at.date_naive())
                {
                    bucket.closed += 1;
                }
            }

            bucket
        })
        .collect()
}
