//! # xlgantt-core
//!
//! Core domain model and traits for xlgantt timelines.
//!
//! This crate provides:
//! - Record types: `TaskRecord`, `ReleaseRecord`, `PhaseDates`
//! - Filtering: `FilterSet`, `TaskField`, `unique_values`
//! - Display model: `Timeline`, `DisplayGroup`, `DisplayItem`
//! - Rendering seam: `TimelineRenderer`, `TimelineWidget`, `DisplayOptions`
//! - Configuration: `Config`, `ColumnMap`, `TimelineConfig`, `CategoryStyles`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use xlgantt_core::{FilterSet, Phase, TaskRecord};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
//!
//! let task = TaskRecord::new("Checkout redesign")
//!     .epic("Payments")
//!     .task_type("Story")
//!     .phase(Phase::Development, Some(start), Some(end));
//!
//! let filters = FilterSet::default().task_types(["Story"]);
//! assert!(filters.matches(&task));
//! assert_eq!(task.phase_dates(Phase::Development).span(), Some((start, end)));
//! ```

pub mod config;
pub mod filter;

pub use config::{is_css_value, CategoryStyles, ColumnMap, Config, ConfigError, TimelineConfig};
pub use filter::{unique_values, FilterSet, TaskField};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Phases
// ============================================================================

/// A named stage of a task with its own start/end dates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Analytics,
    Development,
    Testing,
}

impl Phase {
    /// All phases in display order
    pub const ALL: [Phase; 3] = [Phase::Analytics, Phase::Development, Phase::Testing];

    /// Human-readable name, also used as the item caption
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Analytics => "Analytics",
            Phase::Development => "Development",
            Phase::Testing => "Testing",
        }
    }

    /// Lowercase identifier used in item ids
    pub const fn slug(self) -> &'static str {
        match self {
            Phase::Analytics => "analytics",
            Phase::Development => "development",
            Phase::Testing => "testing",
        }
    }

    pub const fn category(self) -> ItemCategory {
        match self {
            Phase::Analytics => ItemCategory::Analytics,
            Phase::Development => ItemCategory::Development,
            Phase::Testing => ItemCategory::Testing,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Planned interval of a single phase; either end may be missing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDates {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl PhaseDates {
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// The renderable interval, present only when both dates are set
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Exactly one of start/end is set
    pub fn is_partial(&self) -> bool {
        self.start.is_some() != self.end.is_some()
    }
}

// ============================================================================
// Records
// ============================================================================

/// One task row of the plan spreadsheet
///
/// Identity is positional: two records with the same fields are still
/// distinct rows, and nothing survives a reload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_type: String,
    pub epic_name: String,
    pub task_name: String,
    pub task_status_full: String,
    pub task_status: String,
    pub priority: String,
    pub effort: String,
    pub assignee: String,
    pub is_analytical: bool,
    pub analytics: PhaseDates,
    pub development: PhaseDates,
    pub testing: PhaseDates,
    pub production_deadline: Option<NaiveDate>,
}

impl TaskRecord {
    /// Create a record with the given task name and every other field defaulted
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            ..Self::default()
        }
    }

    pub fn epic(mut self, epic: impl Into<String>) -> Self {
        self.epic_name = epic.into();
        self
    }

    pub fn task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Set the short status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.task_status = status.into();
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    pub fn phase(mut self, phase: Phase, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        *self.phase_dates_mut(phase) = PhaseDates::new(start, end);
        self
    }

    pub fn deadline(mut self, date: NaiveDate) -> Self {
        self.production_deadline = Some(date);
        self
    }

    pub fn phase_dates(&self, phase: Phase) -> &PhaseDates {
        match phase {
            Phase::Analytics => &self.analytics,
            Phase::Development => &self.development,
            Phase::Testing => &self.testing,
        }
    }

    pub fn phase_dates_mut(&mut self, phase: Phase) -> &mut PhaseDates {
        match phase {
            Phase::Analytics => &mut self.analytics,
            Phase::Development => &mut self.development,
            Phase::Testing => &mut self.testing,
        }
    }

    /// Text value of a filterable field
    pub fn field(&self, field: TaskField) -> &str {
        match field {
            TaskField::TaskType => &self.task_type,
            TaskField::EpicName => &self.epic_name,
            TaskField::TaskName => &self.task_name,
            TaskField::TaskStatusFull => &self.task_status_full,
            TaskField::TaskStatus => &self.task_status,
            TaskField::Priority => &self.priority,
            TaskField::Effort => &self.effort,
            TaskField::Assignee => &self.assignee,
        }
    }
}

/// A release and the date its development window closes
///
/// Releases are ordered: release *i* is displayed from release *i-1*'s
/// cutoff to its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub label: String,
    pub cutoff: NaiveDate,
}

impl ReleaseRecord {
    pub fn new(label: impl Into<String>, cutoff: NaiveDate) -> Self {
        Self {
            label: label.into(),
            cutoff,
        }
    }
}

/// Serial day number in the 1900 date system, for dates after 1900-02-28
pub fn date_to_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

// ============================================================================
// Display Model
// ============================================================================

/// Visual style selector for an item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Analytics,
    Development,
    Testing,
    Release,
    Deadline,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Analytics,
        ItemCategory::Development,
        ItemCategory::Testing,
        ItemCategory::Release,
        ItemCategory::Deadline,
    ];

    /// CSS class the widget attaches to items of this category
    pub const fn css_class(self) -> &'static str {
        match self {
            ItemCategory::Analytics => "phase-analytics",
            ItemCategory::Development => "phase-development",
            ItemCategory::Testing => "phase-testing",
            ItemCategory::Release => "phase-release",
            ItemCategory::Deadline => "production-deadline",
        }
    }

    /// Legend caption
    pub const fn label(self) -> &'static str {
        match self {
            ItemCategory::Analytics => "Analytics",
            ItemCategory::Development => "Development",
            ItemCategory::Testing => "Testing",
            ItemCategory::Release => "Releases",
            ItemCategory::Deadline => "Production Deadline",
        }
    }
}

/// Range items span an interval, point items mark a single date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Range,
    Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Releases,
    Task,
}

/// A horizontal track of the timeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGroup {
    /// Row index, also the sort key of the widget
    pub id: usize,
    pub kind: GroupKind,
    /// Possibly truncated caption
    pub label: String,
    /// Full task name for hover text
    pub title: String,
    /// Epic line under the caption
    pub subtitle: Option<String>,
}

/// A renderable unit on a track
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub id: String,
    /// Index of the owning `DisplayGroup`
    pub group: usize,
    pub content: String,
    pub start: NaiveDate,
    /// `None` for point items
    pub end: Option<NaiveDate>,
    pub kind: ItemKind,
    pub category: ItemCategory,
    /// Tooltip text, one line per `\n`
    pub title: String,
}

/// Groups and items of one build pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub groups: Vec<DisplayGroup>,
    pub items: Vec<DisplayItem>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.items.is_empty()
    }

    /// Items belonging to the given group, in emission order
    pub fn items_in_group(&self, group: usize) -> impl Iterator<Item = &DisplayItem> {
        self.items.iter().filter(move |item| item.group == group)
    }

    /// Earliest and latest date touched by any item
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.items.iter().fold(None, |acc, item| {
            let last = item.end.unwrap_or(item.start).max(item.start);
            Some(match acc {
                Some((min, max)) => (item.start.min(min), last.max(max)),
                None => (item.start, last),
            })
        })
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Options bag handed to the timeline widget
///
/// Serialized field names follow the widget's option names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    /// Phases of one task share a row, so stacking stays off
    pub stack: bool,
    pub orientation: String,
    pub show_current_time: bool,
    /// Milliseconds
    pub zoom_min: u64,
    /// Milliseconds
    pub zoom_max: u64,
    pub margin: ItemMargin,
    pub width: String,
    pub group_order: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMargin {
    pub item: u32,
}

const DAY_MS: u64 = 1000 * 60 * 60 * 24;

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            stack: false,
            orientation: "top".into(),
            show_current_time: true,
            zoom_min: DAY_MS * 7,
            zoom_max: DAY_MS * 365 * 2,
            margin: ItemMargin { item: 10 },
            width: "100%".into(),
            group_order: "id".into(),
        }
    }
}

/// A mounted, visible timeline
pub trait TimelineWidget {
    /// Release the widget. Terminal: a destroyed widget is never re-mounted.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// The external rendering collaborator
pub trait TimelineRenderer {
    type Widget: TimelineWidget;

    /// Produce a widget inside `container` showing `timeline`
    fn mount(
        &self,
        container: &str,
        timeline: &Timeline,
        options: &DisplayOptions,
        styles: &CategoryStyles,
    ) -> Result<Self::Widget, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
