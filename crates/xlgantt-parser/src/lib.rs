//! # xlgantt-parser
//!
//! Reads task and release sheets into typed records.
//!
//! This crate provides:
//! - `CellValue`: the tagged union every cell is converted to
//! - Date coercion: native dates, 1900-system serial numbers, `d/m/y` strings
//! - Workbook access through calamine (first sheet, header row)
//! - Row → `TaskRecord` / `ReleaseRecord` mapping driven by a `ColumnMap`
//!
//! ## Example
//!
//! ```rust,ignore
//! use xlgantt_core::ColumnMap;
//! use xlgantt_parser::parse_tasks;
//!
//! let bytes = std::fs::read("plan.xlsx")?;
//! let tasks = parse_tasks(&bytes, &ColumnMap::default())?;
//! println!("{} tasks", tasks.len());
//! ```

pub mod cell;
pub mod mapper;
pub mod workbook;

pub use cell::{date_to_serial, parse_slash_date, serial_to_date, CellValue};
pub use mapper::{map_release_row, map_release_rows, map_task_row, map_task_rows};
pub use workbook::{read_first_sheet, sheet_names, Row};

use thiserror::Error;
use xlgantt_core::{ColumnMap, ReleaseRecord, TaskRecord};

/// Workbook-level failures; individual cells never produce one
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot open workbook: {0}")]
    Workbook(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Cannot read sheet '{name}': {message}")]
    Sheet { name: String, message: String },
}

/// Parse the task sheet of a workbook
pub fn parse_tasks(bytes: &[u8], columns: &ColumnMap) -> Result<Vec<TaskRecord>, ParseError> {
    let rows = read_first_sheet(bytes)?;
    let tasks = map_task_rows(&rows, columns);
    tracing::debug!(tasks = tasks.len(), "mapped task rows");
    Ok(tasks)
}

/// Parse the release sheet of a workbook
pub fn parse_releases(
    bytes: &[u8],
    columns: &ColumnMap,
) -> Result<Vec<ReleaseRecord>, ParseError> {
    let rows = read_first_sheet(bytes)?;
    let releases = map_release_rows(&rows, columns);
    tracing::debug!(
        rows = rows.len(),
        releases = releases.len(),
        "mapped release rows"
    );
    Ok(releases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages() {
        assert_eq!(ParseError::NoSheets.to_string(), "Workbook contains no sheets");
        let err = ParseError::Sheet {
            name: "Plan".into(),
            message: "corrupt".into(),
        };
        assert_eq!(err.to_string(), "Cannot read sheet 'Plan': corrupt");
    }

    #[test]
    fn parse_tasks_rejects_non_workbooks() {
        let result = parse_tasks(b"PK\x03\x04 truncated", &ColumnMap::default());
        assert!(matches!(result, Err(ParseError::Workbook(_))));
    }
}
