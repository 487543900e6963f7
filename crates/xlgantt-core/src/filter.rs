//! Record filtering and filter-choice discovery
//!
//! A `FilterSet` is a conjunction of up to four inclusion lists. A list that
//! is absent or empty does not restrict its dimension.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TaskRecord;

/// Text fields of a `TaskRecord` that can be listed or filtered on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    TaskType,
    EpicName,
    TaskName,
    TaskStatusFull,
    TaskStatus,
    Priority,
    Effort,
    Assignee,
}

impl TaskField {
    pub const ALL: [TaskField; 8] = [
        TaskField::TaskType,
        TaskField::EpicName,
        TaskField::TaskName,
        TaskField::TaskStatusFull,
        TaskField::TaskStatus,
        TaskField::Priority,
        TaskField::Effort,
        TaskField::Assignee,
    ];

    /// camelCase name, as accepted by `FromStr`
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskField::TaskType => "taskType",
            TaskField::EpicName => "epicName",
            TaskField::TaskName => "taskName",
            TaskField::TaskStatusFull => "taskStatusFull",
            TaskField::TaskStatus => "taskStatus",
            TaskField::Priority => "priority",
            TaskField::Effort => "effort",
            TaskField::Assignee => "assignee",
        }
    }
}

impl std::fmt::Display for TaskField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskField {
    type Err = String;

    /// Accepts camelCase (`taskStatus`), kebab-case (`task-status`) and
    /// snake_case (`task_status`), plus the short aliases `type`, `status`,
    /// `epic`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "tasktype" | "type" => Ok(TaskField::TaskType),
            "epicname" | "epic" => Ok(TaskField::EpicName),
            "taskname" | "name" => Ok(TaskField::TaskName),
            "taskstatusfull" => Ok(TaskField::TaskStatusFull),
            "taskstatus" | "status" => Ok(TaskField::TaskStatus),
            "priority" => Ok(TaskField::Priority),
            "effort" => Ok(TaskField::Effort),
            "assignee" | "response" => Ok(TaskField::Assignee),
            _ => Err(format!(
                "unknown task field '{}' (expected one of: {})",
                s,
                TaskField::ALL.map(TaskField::as_str).join(", ")
            )),
        }
    }
}

/// Inclusion filters over task records
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    pub task_types: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
    pub priorities: Option<Vec<String>>,
    pub epics: Option<Vec<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_types = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn statuses<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn priorities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priorities = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn epics<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.epics = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// No dimension restricts anything
    pub fn is_empty(&self) -> bool {
        [&self.task_types, &self.statuses, &self.priorities, &self.epics]
            .iter()
            .all(|list| list.as_ref().map_or(true, Vec::is_empty))
    }

    /// Every restricted dimension contains the record's value
    pub fn matches(&self, task: &TaskRecord) -> bool {
        allows(&self.task_types, &task.task_type)
            && allows(&self.statuses, &task.task_status)
            && allows(&self.priorities, &task.priority)
            && allows(&self.epics, &task.epic_name)
    }

    /// Matching records in their original order
    pub fn apply<'a>(&self, tasks: &'a [TaskRecord]) -> Vec<&'a TaskRecord> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

fn allows(list: &Option<Vec<String>>, value: &str) -> bool {
    match list {
        Some(values) if !values.is_empty() => values.iter().any(|v| v == value),
        _ => true,
    }
}

/// Sorted distinct non-empty values of `field` across `tasks`
pub fn unique_values(tasks: &[TaskRecord], field: TaskField) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.field(field))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
