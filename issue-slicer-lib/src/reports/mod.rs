//! Multi-format rendering of triage results
//!
//! # Implementation Model
//!
//! Three renderers are provided:
//! - **Console**: a short summary with ANSI colors for the terminal
//! - **CSV**: one small file per table, for further processing in other tools
//! - **Excel**: a native .xlsx workbook with one sheet per table and a chart of the weekly counts
//!
//! All renderers consume a [`TriageReport`](crate::triage::TriageReport) and write to a
//! caller-supplied writer, so callers decide where the output goes.

mod console;
mod csv;
mod excel;

pub use console::generate as generate_console;
pub use csv::{
    AREA_FILE_NAME, CATEGORY_FILE_NAME, WEEKLY_FILE_NAME, generate_areas as generate_area_csv,
    generate_categories as generate_category_csv, generate_weekly as generate_weekly_csv,
};
pub use excel::generate as generate_xlsx;
