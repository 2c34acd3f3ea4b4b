//! Reads requirements from a spreadsheet
//!
//! The reader makes few assumptions about the layout of the workbook: the
//! header row is the first row that has any content, and the identifier and
//! text columns are located by their header caption.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, VcdError};
use crate::logging::{LogSink, Logger};
use crate::models::Requirement;

pub struct RequirementsReader {
    log: Logger,
}

impl Default for RequirementsReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementsReader {
    pub fn new() -> Self {
        Self {
            log: Logger::new("vcd::requirements"),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = self.log.with_sink(sink);
        self
    }

    /// Reads the requirements from the workbook at `path`
    ///
    /// # Arguments
    /// * `sheet` - Name of the worksheet; the first sheet is used when `None` or empty
    /// * `identifier_column` - Header caption of the identifier column; defaults to
    ///   the first used column of the header row
    /// * `text_column` - Header caption of the text column; when `None` every
    ///   requirement gets an empty text
    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: Option<&str>,
        identifier_column: Option<&str>,
        text_column: Option<&str>,
    ) -> Result<Vec<Requirement>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VcdError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(path).map_err(|source| VcdError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

        let sheet_name = match sheet.filter(|s| !s.is_empty()) {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Err(VcdError::SheetNotFound {
                        name: name.to_string(),
                    });
                }
                name.to_string()
            }
            None => workbook.sheet_names().first().cloned().ok_or_else(|| {
                VcdError::InvalidFormat(format!(
                    "The workbook {} does not contain any sheets",
                    path.display()
                ))
            })?,
        };

        self.log.debug(format!("reading requirements from sheet {}", sheet_name));

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| VcdError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        self.read_range(&range, identifier_column, text_column)
    }

    fn read_range(
        &self,
        range: &Range<Data>,
        identifier_column: Option<&str>,
        text_column: Option<&str>,
    ) -> Result<Vec<Requirement>> {
        let Some(bounds) = UsedArea::of(range) else {
            self.log.debug("the requirements sheet is empty");
            return Ok(Vec::new());
        };

        let id_col = match identifier_column {
            Some(name) => self
                .find_column(range, &bounds, name)
                .ok_or_else(|| VcdError::missing_column("identifier", name))?,
            None => bounds.first_col,
        };

        let text_col = match text_column {
            Some(name) => Some(
                self.find_column(range, &bounds, name)
                    .ok_or_else(|| VcdError::missing_column("text", name))?,
            ),
            None => None,
        };

        let mut requirements = Vec::new();

        for row in bounds.header_row + 1..=bounds.last_row {
            let identifier = cell_text(range, row, id_col);
            let identifier = identifier.trim();
            if identifier.is_empty() {
                continue;
            }

            self.log.debug(format!("requirement found: {}", identifier));

            let text = text_col
                .map(|col| cell_text(range, row, col))
                .unwrap_or_default();

            requirements.push(Requirement::new(identifier, text));
        }

        Ok(requirements)
    }

    /// Scans the header row left to right for a cell whose trimmed text equals `name`
    fn find_column(&self, range: &Range<Data>, bounds: &UsedArea, name: &str) -> Option<u32> {
        let wanted = name.trim();
        let found = (bounds.first_col..=bounds.last_col)
            .find(|&col| cell_text(range, bounds.header_row, col).trim() == wanted);

        if let Some(col) = found {
            self.log.debug(format!("{}: {}", name, col));
        }
        found
    }
}

/// The part of a sheet that holds data, in absolute cell coordinates
#[derive(Debug, PartialEq, Eq)]
struct UsedArea {
    header_row: u32,
    last_row: u32,
    /// First and last used cell of the header row
    first_col: u32,
    last_col: u32,
}

impl UsedArea {
    fn of(range: &Range<Data>) -> Option<Self> {
        let (start_row, start_col) = range.start()?;
        let (end_row, end_col) = range.end()?;

        let row_used =
            |row: u32| (start_col..=end_col).any(|col| !is_blank(range.get_value((row, col))));

        let header_row = (start_row..=end_row).find(|&row| row_used(row))?;
        let last_row = (header_row..=end_row).rev().find(|&row| row_used(row))?;

        let header_used = |col: &u32| !is_blank(range.get_value((header_row, *col)));
        let first_col = (start_col..=end_col).find(header_used)?;
        let last_col = (start_col..=end_col).rev().find(header_used)?;

        Some(Self {
            header_row,
            last_row,
            first_col,
            last_col,
        })
    }
}

fn is_blank(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Renders a cell as text; whole numbers have no fractional part
fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => String::new(),
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Some(other) => other.to_string(),
    }
}
