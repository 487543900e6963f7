//! Starter workbooks
//!
//! Writes task and release sheets with the configured headers and a few
//! sample rows, so a new plan can be filled in and rendered straight away.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use xlgantt_core::{date_to_serial, ColumnMap, RenderError};

/// Sample task rows: type, epic, name, status full, status, priority,
/// effort, analytical, assignee, then the seven dates in header order
type SampleTask = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    bool,
    &'static str,
    [Option<(i32, u32, u32)>; 7],
);

const SAMPLE_TASKS: [SampleTask; 3] = [
    (
        "Story",
        "Payments",
        "Card tokenization",
        "In development",
        "Dev",
        "High",
        13.0,
        false,
        "olga",
        [
            Some((2025, 3, 3)),
            Some((2025, 3, 7)),
            Some((2025, 3, 10)),
            Some((2025, 3, 21)),
            Some((2025, 3, 24)),
            Some((2025, 3, 28)),
            Some((2025, 4, 1)),
        ],
    ),
    (
        "Research",
        "Payments",
        "Refund flow discovery",
        "Analysis",
        "Analytics",
        "Medium",
        5.0,
        true,
        "ivan",
        [
            Some((2025, 3, 10)),
            Some((2025, 3, 14)),
            None,
            None,
            None,
            None,
            None,
        ],
    ),
    (
        "Bug",
        "",
        "Fix session timeout",
        "Ready for test",
        "Testing",
        "Low",
        2.0,
        false,
        "",
        [
            None,
            None,
            Some((2025, 3, 17)),
            Some((2025, 3, 18)),
            Some((2025, 3, 19)),
            Some((2025, 3, 20)),
            None,
        ],
    ),
];

const SAMPLE_RELEASES: [(&str, (i32, u32, u32)); 3] = [
    ("2025.1", (2025, 3, 14)),
    ("2025.2", (2025, 3, 28)),
    ("2025.3", (2025, 4, 11)),
];

/// Writes template workbooks for a column layout
#[derive(Clone, Debug, Default)]
pub struct TemplateWriter {
    pub columns: ColumnMap,
}

impl TemplateWriter {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    /// Task workbook as xlsx bytes
    pub fn tasks_workbook(&self) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = TemplateFormats::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Tasks").map_err(xlsx_error)?;

        let headers = self.columns.task_headers();
        write_headers(sheet, &headers, &formats)?;

        for (index, sample) in SAMPLE_TASKS.iter().enumerate() {
            let row = (index + 1) as u32;
            let (task_type, epic, name, status_full, status, priority, effort, analytical, assignee, dates) =
                sample;

            for (col, text) in [task_type, epic, name, status_full, status, priority]
                .into_iter()
                .enumerate()
            {
                if !text.is_empty() {
                    sheet
                        .write_string(row, col as u16, *text)
                        .map_err(xlsx_error)?;
                }
            }
            sheet.write_number(row, 6, *effort).map_err(xlsx_error)?;
            sheet.write_boolean(row, 7, *analytical).map_err(xlsx_error)?;
            if !assignee.is_empty() {
                sheet.write_string(row, 8, *assignee).map_err(xlsx_error)?;
            }

            for (offset, ymd) in dates.iter().enumerate() {
                let Some(date) = ymd.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)) else {
                    continue;
                };
                sheet
                    .write_number_with_format(row, 9 + offset as u16, date_to_serial(date), &formats.date)
                    .map_err(xlsx_error)?;
            }
        }

        sheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;
        save(&mut workbook)
    }

    /// Release workbook as xlsx bytes
    pub fn releases_workbook(&self) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = TemplateFormats::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Releases").map_err(xlsx_error)?;

        let headers = self.columns.release_headers();
        write_headers(sheet, &headers, &formats)?;

        for (index, (label, (y, m, d))) in SAMPLE_RELEASES.iter().enumerate() {
            let row = (index + 1) as u32;
            sheet.write_string(row, 0, *label).map_err(xlsx_error)?;
            if let Some(date) = NaiveDate::from_ymd_opt(*y, *m, *d) {
                sheet
                    .write_number_with_format(row, 1, date_to_serial(date), &formats.date)
                    .map_err(xlsx_error)?;
            }
        }

        save(&mut workbook)
    }

    pub fn write_tasks(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, self.tasks_workbook()?)?;
        tracing::info!(path = %path.display(), "wrote task template");
        Ok(())
    }

    pub fn write_releases(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, self.releases_workbook()?)?;
        tracing::info!(path = %path.display(), "wrote release template");
        Ok(())
    }
}

struct TemplateFormats {
    header: Format,
    date: Format,
}

impl TemplateFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            date: Format::new().set_num_format("dd/mm/yyyy"),
        }
    }
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    formats: &TemplateFormats,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *header, &formats.header)
            .map_err(xlsx_error)?;
        let width = header.chars().count().max(12) as f64 + 2.0;
        sheet.set_column_width(col, width).map_err(xlsx_error)?;
    }
    Ok(())
}

fn save(workbook: &mut Workbook) -> Result<Vec<u8>, RenderError> {
    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(format!("Failed to create Excel: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbooks_are_xlsx() {
        let writer = TemplateWriter::default();
        let tasks = writer.tasks_workbook().unwrap();
        let releases = writer.releases_workbook().unwrap();
        // xlsx is a zip container
        assert_eq!(&tasks[..2], b"PK");
        assert_eq!(&releases[..2], b"PK");
    }

    #[test]
    fn writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TemplateWriter::default();
        let tasks = dir.path().join("tasks.xlsx");
        let releases = dir.path().join("releases.xlsx");

        writer.write_tasks(&tasks).unwrap();
        writer.write_releases(&releases).unwrap();

        assert!(std::fs::metadata(&tasks).unwrap().len() > 0);
        assert!(std::fs::metadata(&releases).unwrap().len() > 0);
    }

    #[test]
    fn write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("tasks.xlsx");
        let result = TemplateWriter::default().write_tasks(&path);
        assert!(matches!(result, Err(RenderError::Io(_))));
    }
}
