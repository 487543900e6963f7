//! Row → record mapping
//!
//! Mapping never fails. A missing or malformed cell becomes the field's
//! default (`""`, `false` or no date) and the rest of the row is kept.

use xlgantt_core::{ColumnMap, PhaseDates, ReleaseRecord, TaskRecord};

use crate::workbook::Row;

/// Map one task row
pub fn map_task_row(row: &Row, columns: &ColumnMap) -> TaskRecord {
    let text = |header: &str| row.get(header).as_text();
    let phase = |start: &str, end: &str| {
        PhaseDates::new(row.get(start).as_date(), row.get(end).as_date())
    };

    TaskRecord {
        task_type: text(&columns.task_type),
        epic_name: text(&columns.epic_name),
        task_name: text(&columns.task_name),
        task_status_full: text(&columns.task_status_full),
        task_status: text(&columns.task_status),
        priority: text(&columns.priority),
        effort: text(&columns.effort),
        assignee: text(&columns.assignee),
        is_analytical: row.get(&columns.is_analytical).as_flag(),
        analytics: phase(&columns.analytics_start, &columns.analytics_end),
        development: phase(&columns.development_start, &columns.development_end),
        testing: phase(&columns.testing_start, &columns.testing_end),
        production_deadline: row.get(&columns.production_deadline).as_date(),
    }
}

pub fn map_task_rows(rows: &[Row], columns: &ColumnMap) -> Vec<TaskRecord> {
    rows.iter().map(|row| map_task_row(row, columns)).collect()
}

/// Map one release row; `None` unless it has both a label and a cutoff date
pub fn map_release_row(row: &Row, columns: &ColumnMap) -> Option<ReleaseRecord> {
    let label = row.get(&columns.release).as_text();
    let cutoff = row.get(&columns.release_cutoff).as_date();

    match cutoff {
        Some(cutoff) if !label.is_empty() => Some(ReleaseRecord { label, cutoff }),
        _ => None,
    }
}

/// Map release rows in order, dropping incomplete ones
pub fn map_release_rows(rows: &[Row], columns: &ColumnMap) -> Vec<ReleaseRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let release = map_release_row(row, columns);
            if release.is_none() {
                tracing::debug!(row = index + 2, "skipping release row without label or date");
            }
            release
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn empty_row_maps_to_defaults() {
        let record = map_task_row(&Row::new(), &ColumnMap::default());
        assert_eq!(record, TaskRecord::default());
    }

    #[test]
    fn full_row_maps_every_field() {
        let columns = ColumnMap::default();
        let row = Row::new()
            .with("Task Type", CellValue::text("Story"))
            .with("Epic Name", CellValue::text("Payments"))
            .with("Task Name", CellValue::text("Refunds"))
            .with("Task Status Full", CellValue::text("In development"))
            .with("Task Status", CellValue::text("Dev"))
            .with("Приоритет", CellValue::text("High"))
            .with("Ожидаемые трудозатраты", CellValue::Number(8.0))
            .with("Аналитическая задача", CellValue::Bool(true))
            .with("Response", CellValue::text("ivan"))
            .with("Plan — Analytics — Start", CellValue::Date(date(2025, 3, 3)))
            .with("Plan — Analytics — End", CellValue::text("07/03/2025"))
            .with("Plan — Development — Start", CellValue::Number(45726.0))
            .with("Plan — Development — End", CellValue::Number(45737.0))
            .with("Plan — Testing — Start", CellValue::text("24/03/2025"))
            .with("Production Deadline", CellValue::text("01/04/2025"));

        let record = map_task_row(&row, &columns);

        assert_eq!(record.task_type, "Story");
        assert_eq!(record.epic_name, "Payments");
        assert_eq!(record.task_name, "Refunds");
        assert_eq!(record.task_status_full, "In development");
        assert_eq!(record.task_status, "Dev");
        assert_eq!(record.priority, "High");
        assert_eq!(record.effort, "8");
        assert!(record.is_analytical);
        assert_eq!(record.assignee, "ivan");
        assert_eq!(record.analytics.span(), Some((date(2025, 3, 3), date(2025, 3, 7))));
        assert_eq!(record.development.span(), Some((date(2025, 3, 10), date(2025, 3, 21))));
        assert_eq!(record.testing, PhaseDates::new(Some(date(2025, 3, 24)), None));
        assert_eq!(record.production_deadline, Some(date(2025, 4, 1)));
    }

    #[test]
    fn malformed_fields_degrade_individually() {
        let row = Row::new()
            .with("Task Name", CellValue::text("Still here"))
            .with("Plan — Analytics — Start", CellValue::text("next week"))
            .with("Plan — Analytics — End", CellValue::Bool(true))
            .with("Аналитическая задача", CellValue::text("yes"))
            .with("Production Deadline", CellValue::Number(-1.0));

        let record = map_task_row(&row, &ColumnMap::default());
        assert_eq!(record.task_name, "Still here");
        assert_eq!(record.analytics, PhaseDates::default());
        assert!(!record.is_analytical);
        assert_eq!(record.production_deadline, None);
    }

    #[test]
    fn analytical_flag_accepts_string_true() {
        let row = Row::new().with("Аналитическая задача", CellValue::text("True"));
        assert!(map_task_row(&row, &ColumnMap::default()).is_analytical);
    }

    #[test]
    fn custom_columns_are_honoured() {
        let columns = ColumnMap {
            priority: "Priority".into(),
            ..ColumnMap::default()
        };
        let row = Row::new()
            .with("Priority", CellValue::text("P1"))
            .with("Приоритет", CellValue::text("ignored"));
        assert_eq!(map_task_row(&row, &columns).priority, "P1");
    }

    #[test]
    fn release_requires_label_and_date() {
        let columns = ColumnMap::default();
        let rows = vec![
            Row::new()
                .with("Release", CellValue::text("R1"))
                .with("DevCutDate", CellValue::text("10/01/2025")),
            Row::new().with("Release", CellValue::text("no date")),
            Row::new().with("DevCutDate", CellValue::text("20/01/2025")),
            Row::new()
                .with("Release", CellValue::text("bad date"))
                .with("DevCutDate", CellValue::text("soon")),
            Row::new()
                .with("Release", CellValue::Number(2.0))
                .with("DevCutDate", CellValue::Number(45700.0)),
        ];

        let releases = map_release_rows(&rows, &columns);
        assert_eq!(
            releases,
            vec![
                ReleaseRecord::new("R1", date(2025, 1, 10)),
                ReleaseRecord::new("2", date(2025, 2, 12)),
            ]
        );
    }
}
