use crate::Result;
use crate::triage::{AreaTriageSummary, CategoryBreakdown, TriageReport, WeeklyBucket};
use rust_xlsxwriter::{Chart, ChartType, DocProperties, Format, Workbook, Worksheet};
use std::io::Write;

pub const WEEKLY_SHEET: &str = "Weekly";
pub const AREA_SHEET: &str = "Area Triage";
pub const CATEGORY_SHEET: &str = "Categories";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Write the triage tables as an `.xlsx` workbook, one sheet per table.
#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(report: &TriageReport, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new()
        .set_author("issue-slicer")
        .set_title("Issue triage");
    workbook.set_properties(&properties);

    let bold_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(WEEKLY_SHEET)?;
    write_weekly(worksheet, &report.weeks, &bold_format)?;

    let worksheet = workbook.add_worksheet().set_name(AREA_SHEET)?;
    write_areas(worksheet, &report.areas, &bold_format)?;

    if !report.categories.is_empty() {
        let worksheet = workbook.add_worksheet().set_name(CATEGORY_SHEET)?;
        write_categories(worksheet, &report.categories, &bold_format)?;
    }

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_weekly(worksheet: &mut Worksheet, weeks: &[WeeklyBucket], bold_format: &Format) -> Result<()> {
    worksheet.write_string_with_format(0, 0, "Week", bold_format)?;
    worksheet.write_string_with_format(0, 1, "IssuesOpened", bold_format)?;
    worksheet.write_string_with_format(0, 2, "IssuesClosed", bold_format)?;
    worksheet.set_column_width(0, 12)?;
    worksheet.set_column_width(1, 14)?;
    worksheet.set_column_width(2, 14)?;
    worksheet.set_freeze_panes(1, 0)?;

    let mut row: u32 = 1;
    for week in weeks {
        worksheet.write_string(row, 0, week.week_start.format(DATE_FORMAT).to_string())?;
        worksheet.write_number(row, 1, week.opened as f64)?;
        worksheet.write_number(row, 2, week.closed as f64)?;
        row += 1;
    }

    if weeks.is_empty() {
        return Ok(());
    }

    let last_row = row - 1;
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("Issues opened and closed per week");
    chart.x_axis().set_name("Week");
    chart.y_axis().set_name("Issues");

    for column in 1..=2_u16 {
        chart
            .add_series()
            .set_name((WEEKLY_SHEET, 0_u32, column))
            .set_categories((WEEKLY_SHEET, 1_u32, 0_u16, last_row, 0_u16))
            .set_values((WEEKLY_SHEET, 1_u32, column, last_row, column));
    }

    worksheet.insert_chart(1, 4, &chart)?;
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_areas(worksheet: &mut Worksheet, areas: &[AreaTriageSummary], bold_format: &Format) -> Result<()> {
    worksheet.write_string_with_format(0, 0, "Area", bold_format)?;
    worksheet.write_string_with_format(0, 1, "IssuesInTargetMilestones", bold_format)?;
    worksheet.write_string_with_format(0, 2, "IssuesUntriaged", bold_format)?;

    let area_width = areas.iter().map(|a| a.display_name().chars().count()).max().unwrap_or(0).max(12);
    worksheet.set_column_width(0, area_width as f64 + 2.0)?;
    worksheet.set_column_width(1, 26)?;
    worksheet.set_column_width(2, 18)?;
    worksheet.set_freeze_panes(1, 0)?;

    let mut row = 1;
    for area in areas {
        worksheet.write_string(row, 0, area.display_name())?;
        worksheet.write_number(row, 1, area.in_target_milestones as f64)?;
        worksheet.write_number(row, 2, area.untriaged as f64)?;
        row += 1;
    }

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_categories(worksheet: &mut Worksheet, breakdown: &CategoryBreakdown, bold_format: &Format) -> Result<()> {
    worksheet.write_string_with_format(0, 0, "Week", bold_format)?;
    worksheet.set_column_width(0, 12)?;

    for (index, label) in breakdown.labels.iter().enumerate() {
        #[expect(clippy::cast_possible_truncation, reason = "Column index limited by Excel's u16 column limit")]
        let col = (index + 1) as u16;
        worksheet.write_string_with_format(0, col, label, bold_format)?;
        worksheet.set_column_width(col, label.chars().count().max(8) as f64 + 2.0)?;
    }
    worksheet.set_freeze_panes(1, 1)?;

    let mut row = 1;
    for week in &breakdown.weeks {
        worksheet.write_string(row, 0, week.week_start.format(DATE_FORMAT).to_string())?;
        for (index, count) in week.counts.iter().enumerate() {
            #[expect(clippy::cast_possible_truncation, reason = "Column index limited by Excel's u16 column limit")]
            worksheet.write_number(row, (index + 1) as u16, *count as f64)?;
        }
        row += 1;
    }

    Ok(())
}
