//! Configuration: column headers, timeline presentation, category colors
//!
//! Every key is optional when loaded from TOML; missing keys keep their
//! defaults.
//!
//! ```toml
//! [columns]
//! priority = "Priority"
//!
//! [timeline]
//! max_task_name_length = 40
//! show_releases = true
//!
//! [timeline.colors]
//! testing = "#22c55e"
//! ```

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ItemCategory;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete configuration file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnMap,
    pub timeline: TimelineConfig,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(input)?;
        config.timeline.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, else `xlgantt.toml` in `dir` if it exists, else defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join("xlgantt.toml");
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Column headers looked up in each sheet row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub task_type: String,
    pub epic_name: String,
    pub task_name: String,
    pub task_status_full: String,
    pub task_status: String,
    pub priority: String,
    pub effort: String,
    pub is_analytical: String,
    pub assignee: String,
    pub analytics_start: String,
    pub analytics_end: String,
    pub development_start: String,
    pub development_end: String,
    pub testing_start: String,
    pub testing_end: String,
    pub production_deadline: String,
    pub release: String,
    pub release_cutoff: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            task_type: "Task Type".into(),
            epic_name: "Epic Name".into(),
            task_name: "Task Name".into(),
            task_status_full: "Task Status Full".into(),
            task_status: "Task Status".into(),
            priority: "Приоритет".into(),
            effort: "Ожидаемые трудозатраты".into(),
            is_analytical: "Аналитическая задача".into(),
            assignee: "Response".into(),
            analytics_start: "Plan — Analytics — Start".into(),
            analytics_end: "Plan — Analytics — End".into(),
            development_start: "Plan — Development — Start".into(),
            development_end: "Plan — Development — End".into(),
            testing_start: "Plan — Testing — Start".into(),
            testing_end: "Plan — Testing — End".into(),
            production_deadline: "Production Deadline".into(),
            release: "Release".into(),
            release_cutoff: "DevCutDate".into(),
        }
    }
}

impl ColumnMap {
    /// Task sheet headers in template order
    pub fn task_headers(&self) -> [&str; 16] {
        [
            &self.task_type,
            &self.epic_name,
            &self.task_name,
            &self.task_status_full,
            &self.task_status,
            &self.priority,
            &self.effort,
            &self.is_analytical,
            &self.assignee,
            &self.analytics_start,
            &self.analytics_end,
            &self.development_start,
            &self.development_end,
            &self.testing_start,
            &self.testing_end,
            &self.production_deadline,
        ]
    }

    pub fn release_headers(&self) -> [&str; 2] {
        [&self.release, &self.release_cutoff]
    }
}

/// Per-category colors handed to the renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyles {
    pub analytics: String,
    pub development: String,
    pub testing: String,
    pub release: String,
    pub deadline: String,
}

impl Default for CategoryStyles {
    fn default() -> Self {
        Self {
            analytics: "#6366f1".into(),
            development: "#8b5cf6".into(),
            testing: "#10b981".into(),
            release: "#f59e0b".into(),
            deadline: "#ef4444".into(),
        }
    }
}

impl CategoryStyles {
    pub fn color(&self, category: ItemCategory) -> &str {
        match category {
            ItemCategory::Analytics => &self.analytics,
            ItemCategory::Development => &self.development,
            ItemCategory::Testing => &self.testing,
            ItemCategory::Release => &self.release,
            ItemCategory::Deadline => &self.deadline,
        }
    }

    /// Override one category's color
    pub fn with_color(mut self, category: ItemCategory, color: impl Into<String>) -> Self {
        let slot = match category {
            ItemCategory::Analytics => &mut self.analytics,
            ItemCategory::Development => &mut self.development,
            ItemCategory::Testing => &mut self.testing,
            ItemCategory::Release => &mut self.release,
            ItemCategory::Deadline => &mut self.deadline,
        };
        *slot = color.into();
        self
    }
}

/// Timeline presentation settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Characters of a task name shown before the ellipsis
    pub max_task_name_length: usize,
    /// CSS width of the group label column
    pub label_width: String,
    /// Insert the releases row
    pub show_releases: bool,
    /// Subtitle and grouping key for tasks without an epic
    pub no_epic_label: String,
    /// chrono format for dates in tooltips
    pub date_format: String,
    pub colors: CategoryStyles,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_task_name_length: 50,
            label_width: "25%".into(),
            show_releases: false,
            no_epic_label: "Без эпика".into(),
            date_format: "%d.%m.%Y".into(),
            colors: CategoryStyles::default(),
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_task_name_length == 0 {
            return Err(ConfigError::Invalid(
                "max_task_name_length must be at least 1".into(),
            ));
        }
        if self.date_format.trim().is_empty() {
            return Err(ConfigError::Invalid("date_format must not be empty".into()));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "date_format '{}' is not a valid chrono pattern",
                self.date_format
            )));
        }
        if !is_css_value(&self.label_width) {
            return Err(ConfigError::Invalid(format!(
                "label_width '{}' is not a plain CSS value",
                self.label_width
            )));
        }
        for category in ItemCategory::ALL {
            let color = self.colors.color(category);
            if color.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "color for '{}' must not be empty",
                    category.css_class()
                )));
            }
            if !is_css_value(color) {
                return Err(ConfigError::Invalid(format!(
                    "color '{}' for '{}' is not a plain CSS value",
                    color,
                    category.css_class()
                )));
            }
        }
        Ok(())
    }
}

/// A single CSS value that cannot close its declaration, rule or `<style>` element
pub fn is_css_value(value: &str) -> bool {
    !value.trim().is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, '<' | '>' | '{' | '}' | ';' | '"' | '\\') || c.is_control())
}
