//! Renders matched requirements as a VCD report

use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, VcdError};
use crate::logging::{LogSink, Logger};
use crate::models::Requirement;

pub const SHEET_PREFIX: &str = "VCD";
pub const HEADERS: [&str; 3] = ["REQUIREMENT-ID", "REQUIREMENT-TEXT", "TESTCASE"];

/// Most characters a single xlsx cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;
/// Room kept free for the `"… (N more)"` marker of a shortened cell
const TRUNCATION_RESERVE: usize = 32;

const MIN_COLUMN_WIDTH: usize = 12;
const MAX_COLUMN_WIDTH: usize = 100;

/// Output format of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    #[serde(alias = "xlsx", alias = "excel")]
    Spreadsheet,
    Html,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Spreadsheet => write!(f, "spreadsheet"),
            ReportKind::Html => write!(f, "HTML"),
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spreadsheet" | "xlsx" | "excel" => Ok(ReportKind::Spreadsheet),
            "html" => Ok(ReportKind::Html),
            other => Err(format!(
                "Unknown report kind: {}. Supported kinds: spreadsheet, html",
                other
            )),
        }
    }
}

/// Name of the report worksheet for the given date, e.g. `VCD-2024-03-01`
pub fn sheet_name(date: NaiveDate) -> String {
    format!("{}-{}", SHEET_PREFIX, date.format("%Y-%m-%d"))
}

/// The cell listing the linked test cases, one `"{full name} - {result}"` per line
pub fn test_case_cell(requirement: &Requirement) -> String {
    requirement
        .test_cases
        .iter()
        .map(|tc| tc.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The test-case cell cut down to fit a single xlsx cell
///
/// Whole lines are kept while they fit. The rest are replaced by a final
/// `"… (N more)"` line. Returns the cell and the number of omitted test cases.
fn fitted_test_case_cell(requirement: &Requirement) -> (String, usize) {
    let full = test_case_cell(requirement);
    if full.chars().count() <= MAX_CELL_CHARS {
        return (full, 0);
    }

    let budget = MAX_CELL_CHARS - TRUNCATION_RESERVE;
    let mut cell = String::new();
    let mut used = 0;
    let mut kept = 0;

    for tc in &requirement.test_cases {
        let line = tc.to_string();
        let len = line.chars().count() + usize::from(kept > 0);
        if used + len > budget {
            break;
        }
        if kept > 0 {
            cell.push('\n');
        }
        cell.push_str(&line);
        used += len;
        kept += 1;
    }

    let omitted = requirement.test_cases.len() - kept;
    if kept > 0 {
        cell.push('\n');
    }
    cell.push_str(&format!("… ({} more)", omitted));

    (cell, omitted)
}

pub struct ReportGenerator {
    log: Logger,
    date: Option<NaiveDate>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            log: Logger::new("vcd::report"),
            date: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = self.log.with_sink(sink);
        self
    }

    /// Pins the report date instead of using today's UTC date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Writes the report to `path`, replacing any existing file
    pub fn generate<P: AsRef<Path>>(
        &self,
        requirements: &[Requirement],
        path: P,
        kind: ReportKind,
    ) -> Result<()> {
        match kind {
            ReportKind::Spreadsheet => self.generate_spreadsheet(requirements, path.as_ref()),
            ReportKind::Html => Err(VcdError::NotImplemented { kind }),
        }
    }

    fn generate_spreadsheet(&self, requirements: &[Requirement], path: &Path) -> Result<()> {
        let to_error = |source: XlsxError| VcdError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(date)).map_err(to_error)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *header)
                .map_err(to_error)?;
        }

        for (i, requirement) in requirements.iter().enumerate() {
            let row = i as u32 + 1;

            let (test_cases, omitted) = fitted_test_case_cell(requirement);
            if omitted > 0 {
                self.log.warn(format!(
                    "{} lists too many test cases for one cell, {} of {} omitted from the report",
                    requirement.identifier,
                    omitted,
                    requirement.test_cases.len()
                ));
            }

            worksheet
                .write_string(row, 0, &requirement.identifier)
                .map_err(to_error)?
                .write_string(row, 1, &requirement.text)
                .map_err(to_error)?
                .write_string(row, 2, test_cases)
                .map_err(to_error)?;
        }

        if let Err(e) = apply_layout(worksheet, requirements) {
            self.log
                .warn(format!("report layout skipped, using default sizing: {}", e));
        }

        workbook.save(path).map_err(to_error)?;

        self.log.info(format!(
            "VCD report with {} requirements written to {}",
            requirements.len(),
            path.display()
        ));

        Ok(())
    }
}

/// Bold header, wrapped text and column widths sized to the content
fn apply_layout(
    worksheet: &mut Worksheet,
    requirements: &[Requirement],
) -> std::result::Result<(), XlsxError> {
    let header = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();

    worksheet.set_row_format(0, &header)?;
    worksheet.set_freeze_panes(1, 0)?;

    let columns: [Vec<String>; 3] = [
        requirements.iter().map(|r| r.identifier.clone()).collect(),
        requirements.iter().map(|r| r.text.clone()).collect(),
        requirements
            .iter()
            .map(|r| fitted_test_case_cell(r).0)
            .collect(),
    ];

    for (col, values) in columns.iter().enumerate() {
        let width = values
            .iter()
            .flat_map(|v| v.lines())
            .chain(std::iter::once(HEADERS[col]))
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);

        worksheet.set_column_width(col as u16, (width + 2) as f64)?;
        if col > 0 {
            worksheet.set_column_format(col as u16, &wrap)?;
        }
    }

    Ok(())
}
