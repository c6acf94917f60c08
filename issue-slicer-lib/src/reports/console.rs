use crate::Result;
use crate::triage::{AreaTriageSummary, BugBucket, TriageReport};
use core::fmt::Write;
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

const UNTRIAGED_HEADER: &str = "Untriaged";
const TARGET_HEADER: &str = "In target";

/// Print the bug summary and the areas with the most untriaged bugs.
pub fn generate<W: Write>(report: &TriageReport, use_colors: bool, max_areas: usize, writer: &mut W) -> Result<()> {
    let bugs = &report.bugs;

    write_heading(writer, "Bug summary", use_colors)?;

    let mut lines = vec![("Total issues".to_string(), bugs.total_issues), ("Open bugs".to_string(), bugs.open_bugs)];
    lines.extend(BugBucket::iter().map(|bucket| (bucket.to_string(), bugs.count(bucket))));

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, count) in &lines {
        if use_colors {
            writeln!(writer, "  {label:<label_width$} : {}", count.cyan())?;
        } else {
            writeln!(writer, "  {label:<label_width$} : {count}")?;
        }
    }

    if !report.target_milestones.is_empty() {
        writeln!(writer)?;
        let names: Vec<&str> = report.target_milestones.names().collect();
        writeln!(writer, "Target milestones: {}", names.join(", "))?;
    }

    if report.areas.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    write_heading(writer, "Areas with the most untriaged bugs", use_colors)?;
    write_area_table(writer, &report.areas, use_colors, max_areas)?;

    Ok(())
}

fn write_heading<W: Write>(writer: &mut W, heading: &str, use_colors: bool) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }

    Ok(())
}

fn write_area_table<W: Write>(writer: &mut W, areas: &[AreaTriageSummary], use_colors: bool, max_areas: usize) -> Result<()> {
    let shown = &areas[..areas.len().min(max_areas)];
    let name_width = shown.iter().map(|a| a.display_name().chars().count()).max().unwrap_or(0).max("Area".len());
    let untriaged_width = UNTRIAGED_HEADER.len();
    let target_width = TARGET_HEADER.len();

    writeln!(
        writer,
        "  {:<name_width$}  {UNTRIAGED_HEADER:>untriaged_width$}  {TARGET_HEADER:>target_width$}",
        "Area"
    )?;

    for area in shown {
        let name = area.display_name();
        if use_colors && area.untriaged > 0 {
            // pad before coloring so escape codes don't skew the alignment
            let untriaged = format!("{:>untriaged_width$}", area.untriaged);
            writeln!(
                writer,
                "  {name:<name_width$}  {}  {:>target_width$}",
                untriaged.yellow(),
                area.in_target_milestones
            )?;
        } else {
            writeln!(
                writer,
                "  {name:<name_width$}  {:>untriaged_width$}  {:>target_width$}",
                area.untriaged, area.in_target_milestones
            )?;
        }
    }

    let hidden = areas.len() - shown.len();
    if hidden > 0 {
        writeln!(writer, "  ... and {hidden} more")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::{BugSummary, CategoryBreakdown, MilestoneSet};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn area(name: Option<&str>, in_target_milestones: u64, untriaged: u64) -> AreaTriageSummary {
        AreaTriageSummary {
            area: name.map(str::to_string),
            in_target_milestones,
            untriaged,
        }
    }

    fn report() -> TriageReport {
        TriageReport {
            now: Utc.with_ymd_and_hms(2021, 10, 1, 0, 0, 0).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            target_milestones: MilestoneSet::new(["6.0.100-rc.1", "6.0.100"]),
            weeks: Vec::new(),
            areas: vec![
                area(Some("area/controls"), 4, 12),
                area(None, 0, 5),
                area(Some("area/xaml"), 7, 0),
            ],
            bugs: BugSummary {
                total_issues: 1500,
                open_bugs: 40,
                target_milestone_bugs: 11,
                future_milestone_bugs: 6,
                untriaged_bugs: 17,
                unknown_bugs: 6,
            },
            categories: CategoryBreakdown::default(),
        }
    }

    #[test]
    fn test_console_report_no_colors() {
        let mut output = String::new();
        generate(&report(), false, 10, &mut output).unwrap();

        insta::assert_snapshot!(output, @r"
        Bug summary
          Total issues      : 1500
          Open bugs         : 40
          Target milestones : 11
          Future milestones : 6
          Untriaged         : 17
          Unknown           : 6

        Target milestones: 6.0.100, 6.0.100-rc.1

        Areas with the most untriaged bugs
          Area           Untriaged  In target
          area/controls         12          4
          (no area)              5          0
          area/xaml              0          7
        ");
    }

    #[test]
    fn test_console_report_truncates_areas() {
        let mut output = String::new();
        generate(&report(), false, 1, &mut output).unwrap();

        assert!(output.contains("area/controls"));
        assert!(!output.contains("area/xaml"));
        assert!(output.ends_with("  ... and 2 more\n"));
    }

    #[test]
    fn test_console_report_with_colors() {
        let mut output = String::new();
        generate(&report(), true, 10, &mut output).unwrap();

        assert!(output.contains("\u{1b}["));
        assert!(output.contains("area/controls"));
    }

    #[test]
    fn test_console_report_without_areas() {
        let mut empty = report();
        empty.areas.clear();
        empty.target_milestones = MilestoneSet::default();

        let mut output = String::new();
        generate(&empty, false, 10, &mut output).unwrap();
        assert!(!output.contains("Areas"));
        assert!(!output.contains("Target milestones:"));
    }
}
