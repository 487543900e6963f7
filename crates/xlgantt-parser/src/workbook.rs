//! Workbook access through calamine
//!
//! Only the first sheet is read. Its first row holds the column headers and
//! every following non-blank row becomes a [`Row`].

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::cell::CellValue;
use crate::ParseError;

/// One data row keyed by column header
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, CellValue>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and programmatic callers
    pub fn with(mut self, header: impl Into<String>, value: CellValue) -> Self {
        self.insert(header, value);
        self
    }

    /// Keeps the first value when a header repeats
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.entry(header.into()).or_insert(value);
    }

    /// The cell under `header`, `CellValue::Empty` when the column is missing
    pub fn get(&self, header: &str) -> &CellValue {
        self.cells.get(header).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Names of all sheets in the workbook
pub fn sheet_names(bytes: &[u8]) -> Result<Vec<String>, ParseError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read the first sheet of an xlsx/xls/xlsb/ods workbook held in memory
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Row>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first) = sheet_names.first() else {
        return Err(ParseError::NoSheets);
    };

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| ParseError::Sheet {
            name: first.clone(),
            message: e.to_string(),
        })?;

    let rows = rows_from_range(&range);
    tracing::debug!(sheet = %first, rows = rows.len(), "read worksheet");
    Ok(rows)
}

/// Header row first, then data rows with blank rows skipped
fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let mut lines = range.rows();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header_line
        .iter()
        .map(|cell| {
            let header = CellValue::from(cell).as_text();
            let header = header.trim();
            (!header.is_empty()).then(|| header.to_string())
        })
        .collect();

    lines
        .filter_map(|line| {
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(line) {
                let Some(header) = header else { continue };
                let value = CellValue::from(cell);
                if !matches!(value, CellValue::Empty) {
                    row.insert(header.clone(), value);
                }
            }
            (!row.is_empty()).then_some(row)
        })
        .collect()
}
