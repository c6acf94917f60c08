use crate::Result;
use crate::triage::{AreaTriageSummary, CategoryBreakdown, WeeklyBucket};
use core::fmt::Write;
use std::borrow::Cow;

pub const WEEKLY_FILE_NAME: &str = "openclosed-by-week.csv";
pub const AREA_FILE_NAME: &str = "area-triage.csv";
pub const CATEGORY_FILE_NAME: &str = "category-by-week.csv";

pub fn generate_weekly<W: Write>(weeks: &[WeeklyBucket], writer: &mut W) -> Result<()> {
    writeln!(writer, "Week,IssuesOpened,IssuesClosed")?;
    for week in weeks {
        writeln!(writer, "{},{},{}", week.week_start.format("%Y-%m-%d"), week.opened, week.closed)?;
    }

    Ok(())
}

pub fn generate_areas<W: Write>(areas: &[AreaTriageSummary], writer: &mut W) -> Result<()> {
    writeln!(writer, "Area,IssuesInTargetMilestones,IssuesUntriaged")?;
    for area in areas {
        writeln!(
            writer,
            "{},{},{}",
            escape_csv(area.display_name()),
            area.in_target_milestones,
            area.untriaged
        )?;
    }

    Ok(())
}

pub fn generate_categories<W: Write>(breakdown: &CategoryBreakdown, writer: &mut W) -> Result<()> {
    write!(writer, "Week")?;
    for label in &breakdown.labels {
        write!(writer, ",{}", escape_csv(label))?;
    }
    writeln!(writer)?;

    for week in &breakdown.weeks {
        write!(writer, "{}", week.week_start.format("%Y-%m-%d"))?;
        for count in &week.counts {
            write!(writer, ",{count}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}
