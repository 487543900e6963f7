//! Timeline builder
//!
//! Turns the loaded records into display groups and items. Building is a
//! pure function of its inputs: the same records, releases, filters and
//! configuration always produce the same timeline.
//!
//! Row policy:
//! - the releases row, when shown, is always group 0
//! - one group per (epic, task name), in first-seen order
//! - a task's phases and deadline always share its group

use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;
use xlgantt_core::{
    DisplayGroup, DisplayItem, FilterSet, GroupKind, ItemCategory, ItemKind, Phase,
    ReleaseRecord, TaskRecord, Timeline, TimelineConfig,
};

/// Caption of the release overlay row
pub const RELEASES_LABEL: &str = "Releases";

/// Marker shown for a production deadline
pub const DEADLINE_MARKER: &str = "●";

/// Build groups and items for one render pass
///
/// Filters are applied before grouping. A phase with only one of its two
/// dates is skipped without error.
pub fn build_timeline(
    tasks: &[TaskRecord],
    releases: &[ReleaseRecord],
    filters: &FilterSet,
    config: &TimelineConfig,
) -> Timeline {
    let mut timeline = Timeline::default();

    if config.show_releases && !releases.is_empty() {
        push_releases(&mut timeline, releases, config);
    }

    let visible = filters.apply(tasks);
    let mut rows: HashMap<(&str, &str), usize> = HashMap::new();

    for (index, task) in visible.iter().enumerate() {
        let epic = epic_label(task, config);
        let group = *rows
            .entry((epic, task.task_name.as_str()))
            .or_insert_with(|| {
                let id = timeline.groups.len();
                timeline.groups.push(DisplayGroup {
                    id,
                    kind: GroupKind::Task,
                    label: truncate_name(&task.task_name, config.max_task_name_length),
                    title: task.task_name.clone(),
                    subtitle: Some(epic.to_string()),
                });
                id
            });

        for phase in Phase::ALL {
            let dates = task.phase_dates(phase);
            let Some((start, end)) = dates.span() else {
                if dates.is_partial() {
                    tracing::debug!(
                        task = index,
                        name = %task.task_name,
                        %phase,
                        "phase has only one date, not rendered"
                    );
                }
                continue;
            };

            timeline.items.push(DisplayItem {
                id: format!("{}-{}", index, phase.slug()),
                group,
                content: phase.name().to_string(),
                start,
                end: Some(end),
                kind: ItemKind::Range,
                category: phase.category(),
                title: phase_tooltip(task, phase),
            });
        }

        if let Some(deadline) = task.production_deadline {
            timeline.items.push(DisplayItem {
                id: format!("{}-production-deadline", index),
                group,
                content: DEADLINE_MARKER.to_string(),
                start: deadline,
                end: None,
                kind: ItemKind::Point,
                category: ItemCategory::Deadline,
                title: format!(
                    "Production Deadline\n{}",
                    format_date(deadline, &config.date_format)
                ),
            });
        }
    }

    tracing::debug!(
        tasks = tasks.len(),
        visible = visible.len(),
        groups = timeline.groups.len(),
        items = timeline.items.len(),
        "built timeline"
    );

    timeline
}

/// Consecutive spans: each release runs from the previous cutoff to its own
fn push_releases(timeline: &mut Timeline, releases: &[ReleaseRecord], config: &TimelineConfig) {
    let group = timeline.groups.len();
    timeline.groups.push(DisplayGroup {
        id: group,
        kind: GroupKind::Releases,
        label: RELEASES_LABEL.to_string(),
        title: RELEASES_LABEL.to_string(),
        subtitle: None,
    });

    let mut previous: Option<NaiveDate> = None;
    for (index, release) in releases.iter().enumerate() {
        let start = previous.unwrap_or(release.cutoff);
        timeline.items.push(DisplayItem {
            id: format!("release-{}", index),
            group,
            content: format!("Release {}", release.label),
            start,
            end: Some(release.cutoff),
            kind: ItemKind::Range,
            category: ItemCategory::Release,
            title: format!(
                "Release {}\nDevCutDate: {}",
                release.label,
                format_date(release.cutoff, &config.date_format)
            ),
        });
        previous = Some(release.cutoff);
    }
}

fn epic_label<'a>(task: &'a TaskRecord, config: &'a TimelineConfig) -> &'a str {
    if task.epic_name.is_empty() {
        &config.no_epic_label
    } else {
        &task.epic_name
    }
}

fn phase_tooltip(task: &TaskRecord, phase: Phase) -> String {
    let mut lines = vec![
        task.task_name.clone(),
        format!("Phase: {}", phase),
        format!("Status: {}", task.task_status),
        format!("Priority: {}", task.priority),
    ];
    if !task.assignee.is_empty() {
        lines.push(format!("Assignee: {}", task.assignee));
    }
    let epic = if task.epic_name.is_empty() { "N/A" } else { &task.epic_name };
    lines.push(format!("Epic: {}", epic));
    lines.join("\n")
}

/// Keep the first `max` characters and mark the cut with `...`
pub fn truncate_name(name: &str, max: usize) -> String {
    match name.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &name[..cut]),
        None => name.to_string(),
    }
}

/// Format with a user pattern, falling back to ISO when the pattern is invalid
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}
