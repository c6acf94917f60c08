//! The issues CSV file shared by the download and analysis phases.
//!
//! Files are UTF-8 with a leading byte-order mark so spreadsheet tools pick the right
//! encoding. Every field is quoted. Line breaks inside a field are removed and double quotes
//! are turned into apostrophes, which keeps every issue on exactly one physical line and makes
//! the file easy to diff and grep.
//!
//! Rows are written sorted by creation time, repository and issue number, so downloading the
//! same set of issues twice produces byte-identical files.

use super::IssueRow;
use crate::Result;
use camino::Utf8Path;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use ohno::{EnrichableExt, IntoAppError, app_err, bail};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::sync::Arc;

const LOG_TARGET: &str = "issues_csv";

const BOM: &str = "\u{feff}";

/// Column names, in file order.
pub const HEADERS: [&str; 10] = [
    "Repository",
    "Number",
    "Title",
    "CreatedAt",
    "ClosedAt",
    "MilestoneName",
    "IsOpen",
    "PrimaryArea",
    "IsBug",
    "Labels",
];

const LABEL_SEPARATOR: char = '|';

/// Write `rows` to `writer` in output order.
pub fn write_rows(rows: &[IssueRow], mut writer: impl Write) -> Result<()> {
    let mut sorted: Vec<&IssueRow> = rows.iter().collect();
    sorted.sort_by(|a, b| a.cmp_output_order(b));

    writer.write_all(BOM.as_bytes())?;

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(HEADERS)?;

    for row in sorted {
        let labels = row.labels.join(&LABEL_SEPARATOR.to_string());
        let record = [
            flatten_field(&row.repository),
            Cow::Owned(row.number.to_string()),
            flatten_field(&row.title),
            Cow::Owned(format_timestamp(row.created_at)),
            Cow::Owned(row.closed_at.map(format_timestamp).unwrap_or_default()),
            flatten_field(row.milestone().unwrap_or_default()),
            Cow::Borrowed(format_bool(row.is_open())),
            flatten_field(row.primary_area.as_deref().unwrap_or_default()),
            Cow::Borrowed(format_bool(row.is_bug)),
            flatten_field(&labels),
        ];

        csv_writer.write_record(record.iter().map(|field| field.as_bytes()))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `rows` to a new file at `path`, replacing any existing file.
pub fn write_file(path: &Utf8Path, rows: &[IssueRow]) -> Result<()> {
    let file = create_file(path)?;
    write_to_file(file, path, rows)
}

/// Create or truncate the issues file at `path`, along with any missing parent directories.
pub fn create_file(path: &Utf8Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).into_app_err_with(|| format!("unable to create directory '{parent}'"))?;
    }

    File::create(path).into_app_err_with(|| format!("unable to create issues file '{path}'"))
}

/// Write `rows` into a file opened by [`create_file`] for `path`.
pub fn write_to_file(file: File, path: &Utf8Path, rows: &[IssueRow]) -> Result<()> {
    let mut writer = BufWriter::new(file);
    write_rows(rows, &mut writer).map_err(|e| e.enrich_with(|| format!("unable to write issues file '{path}'")))?;
    writer.flush().into_app_err_with(|| format!("unable to write issues file '{path}'"))?;

    log::info!(target: LOG_TARGET, "Wrote {} issues to '{path}'", rows.len());
    Ok(())
}

/// Read issue rows from CSV text, locating columns by header name.
pub fn read_rows(mut reader: impl Read) -> Result<Vec<IssueRow>> {
    let mut text = String::new();
    let _ = reader.read_to_string(&mut text).into_app_err("unable to read issues data as UTF-8")?;
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    let mut csv_reader = ReaderBuilder::new().from_reader(text.as_bytes());
    let columns = Columns::locate(csv_reader.headers()?)?;

    let mut repositories: HashMap<String, Arc<str>> = HashMap::new();
    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    while csv_reader.read_record(&mut record)? {
        let line = record.position().map_or(0, csv::Position::line);
        let row = columns
            .parse(&record, &mut repositories)
            .map_err(|e| e.enrich_with(|| format!("malformed issue record on line {line}")))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Read an issues file from disk.
pub fn read_file(path: &Utf8Path) -> Result<Vec<IssueRow>> {
    let file = File::open(path).into_app_err_with(|| format!("unable to open issues file '{path}'"))?;
    let rows = read_rows(file).map_err(|e| e.enrich_with(|| format!("unable to load issues file '{path}'")))?;

    log::info!(target: LOG_TARGET, "Read {} issues from '{path}'", rows.len());
    Ok(rows)
}

/// Strip line breaks and turn double quotes into apostrophes.
fn flatten_field(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n', '"']) {
        Cow::Owned(s.chars().filter(|c| *c != '\r' && *c != '\n').map(|c| if c == '"' { '\'' } else { c }).collect())
    } else {
        Cow::Borrowed(s)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

const fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Column positions of a particular file.
struct Columns {
    repository: Option<usize>,
    number: usize,
    title: usize,
    created_at: usize,
    closed_at: usize,
    milestone: usize,
    is_open: usize,
    primary_area: usize,
    is_bug: usize,
    labels: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |name: &str| find(name).ok_or_else(|| app_err!("issues data has no '{name}' column"));

        Ok(Self {
            repository: find("Repository"),
            number: require("Number")?,
            title: require("Title")?,
            created_at: require("CreatedAt")?,
            closed_at: require("ClosedAt")?,
            milestone: require("MilestoneName")?,
            is_open: require("IsOpen")?,
            primary_area: require("PrimaryArea")?,
            is_bug: require("IsBug")?,
            labels: find("Labels"),
        })
    }

    fn parse(&self, record: &StringRecord, repositories: &mut HashMap<String, Arc<str>>) -> Result<IssueRow> {
        let field = |index: usize| record.get(index).unwrap_or_default();

        let repository_name = self.repository.map(field).unwrap_or_default();
        let repository = match repositories.get(repository_name) {
            Some(repository) => Arc::clone(repository),
            None => {
                let repository: Arc<str> = Arc::from(repository_name);
                let _ = repositories.insert(repository_name.to_string(), Arc::clone(&repository));
                repository
            }
        };

        let number_text = field(self.number).trim();
        let number = number_text
            .parse::<u64>()
            .into_app_err_with(|| format!("invalid issue number '{number_text}'"))?;

        let created_at = parse_timestamp(field(self.created_at))?;
        let closed_at = non_empty(field(self.closed_at)).map(parse_timestamp).transpose()?;

        let row = IssueRow {
            repository,
            number,
            title: field(self.title).to_string(),
            created_at,
            closed_at,
            milestone: non_empty(field(self.milestone)).map(str::to_string),
            primary_area: non_empty(field(self.primary_area)).map(str::to_string),
            is_bug: parse_bool(field(self.is_bug))?,
            labels: self
                .labels
                .map(field)
                .map(|labels| labels.split(LABEL_SEPARATOR).filter(|l| !l.is_empty()).map(str::to_string).collect())
                .unwrap_or_default(),
        };

        let stated_open = parse_bool(field(self.is_open))?;
        if stated_open != row.is_open() {
            log::warn!(
                target: LOG_TARGET,
                "Issue #{} of '{}' says IsOpen={stated_open} but its ClosedAt column disagrees, using ClosedAt",
                row.number,
                row.repository
            );
        }

        Ok(row)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .into_app_err_with(|| format!("invalid timestamp '{s}'"))
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        bail!("invalid boolean '{s}'")
    }
}
