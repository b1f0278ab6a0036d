//! On-disk schema versions and the chain that upgrades them.
//!
//! Each stored layout is its own set of record types. Loading detects the
//! layout, then walks it forward one version at a time until it reaches the
//! current one; only then is it converted into domain values.

use crate::domain::{Importance, SubTask, Task};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Version written by this build
pub const CURRENT_VERSION: u64 = 2;

/// Unversioned layout: a bare array of flat tasks with inline dates
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatTaskV0 {
    pub name: String,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub completed: Option<NaiveDate>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub snooze: Option<NaiveDate>,
}

/// Version 1 sub-task: no completion date of its own
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubTaskV1 {
    pub name: String,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub snooze: Option<NaiveDate>,
}

/// Version 1 task: completion tracked on the task
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskV1 {
    pub name: String,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub completed: Option<NaiveDate>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTaskV1>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentV1 {
    pub tasks: Vec<TaskV1>,
}

/// Current sub-task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTaskRecord {
    pub name: String,
    pub due: Option<NaiveDate>,
    pub snooze: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
}

/// Current task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub importance: Importance,
    pub due: Option<NaiveDate>,
    pub snooze: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTaskRecord>,
    #[serde(default)]
    pub resources: Vec<PathBuf>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Current document layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u64,
    pub tasks: Vec<TaskRecord>,
}

/// A stored document in whichever layout it was written
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSchema {
    Unversioned(Vec<FlatTaskV0>),
    V1(DocumentV1),
    V2(Document),
}

impl StoredSchema {
    /// Detect the layout of a parsed JSON document
    pub fn detect(value: Value) -> Result<Self> {
        if value.is_array() {
            let tasks = serde_json::from_value(value).context("Invalid unversioned task list")?;
            return Ok(Self::Unversioned(tasks));
        }

        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .context("Task document has no version field")?;
        match version {
            1 => Ok(Self::V1(
                serde_json::from_value(value).context("Invalid version 1 task document")?,
            )),
            2 => Ok(Self::V2(
                serde_json::from_value(value).context("Invalid version 2 task document")?,
            )),
            other => anyhow::bail!(
                "Unsupported task document version {} (newest known is {})",
                other,
                CURRENT_VERSION
            ),
        }
    }

    /// Version number, 0 for the unversioned layout
    pub fn version(&self) -> u64 {
        match self {
            Self::Unversioned(_) => 0,
            Self::V1(_) => 1,
            Self::V2(document) => document.version,
        }
    }

    /// Upgrade by exactly one version; the current layout is returned as is
    pub fn upgrade(self) -> Self {
        match self {
            Self::Unversioned(tasks) => Self::V1(unversioned_to_v1(tasks)),
            Self::V1(document) => Self::V2(v1_to_v2(document)),
            current @ Self::V2(_) => current,
        }
    }

    /// Walk the chain up to the current layout
    pub fn into_current(self) -> Document {
        let mut schema = self;
        loop {
            match schema {
                Self::V2(document) => return document,
                older => {
                    tracing::info!(from = older.version(), "upgrading task document");
                    schema = older.upgrade();
                }
            }
        }
    }
}

/// Inline due/snooze dates move into one sub-task named after the task
fn unversioned_to_v1(tasks: Vec<FlatTaskV0>) -> DocumentV1 {
    let tasks = tasks
        .into_iter()
        .map(|flat| {
            let sub_tasks = if flat.due.is_some() || flat.snooze.is_some() {
                vec![SubTaskV1 {
                    name: flat.name.clone(),
                    due: flat.due,
                    snooze: flat.snooze,
                }]
            } else {
                Vec::new()
            };
            TaskV1 {
                name: flat.name,
                importance: flat.importance,
                completed: flat.completed,
                sub_tasks,
            }
        })
        .collect();
    DocumentV1 { tasks }
}

/// Task-level completion moves into every sub-task
fn v1_to_v2(document: DocumentV1) -> Document {
    let tasks = document
        .tasks
        .into_iter()
        .map(|task| {
            let own_completed = if task.sub_tasks.is_empty() {
                task.completed
            } else {
                None
            };
            let sub_tasks = task
                .sub_tasks
                .into_iter()
                .map(|st| SubTaskRecord {
                    name: st.name,
                    due: st.due,
                    snooze: st.snooze,
                    completed: task.completed,
                })
                .collect();
            TaskRecord {
                name: task.name,
                importance: task.importance,
                due: None,
                snooze: None,
                completed: own_completed,
                sub_tasks,
                resources: Vec::new(),
                notes: Vec::new(),
            }
        })
        .collect();
    Document {
        version: CURRENT_VERSION,
        tasks,
    }
}

impl From<&SubTask> for SubTaskRecord {
    fn from(sub_task: &SubTask) -> Self {
        Self {
            name: sub_task.name().to_string(),
            due: sub_task.due(),
            snooze: sub_task.snooze(),
            completed: sub_task.completed(),
        }
    }
}

impl From<SubTaskRecord> for SubTask {
    fn from(record: SubTaskRecord) -> Self {
        SubTask::new(record.name)
            .with_due(record.due)
            .with_snooze(record.snooze)
            .with_completed(record.completed)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let (due, snooze, completed) = task.stored_dates();
        Self {
            name: task.name().to_string(),
            importance: task.importance(),
            due,
            snooze,
            completed,
            sub_tasks: task.sub_tasks().iter().map(SubTaskRecord::from).collect(),
            resources: task.resources().to_vec(),
            notes: task.notes().to_vec(),
        }
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Task::new(record.name)
            .with_importance(record.importance)
            .with_stored_dates(record.due, record.snooze, record.completed)
            .with_sub_tasks(record.sub_tasks.into_iter().map(SubTask::from).collect())
            .with_resources(record.resources)
            .with_notes(record.notes)
    }
}

impl Document {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: tasks.iter().map(TaskRecord::from).collect(),
        }
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks.into_iter().map(Task::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_detect_unversioned() {
        let value = json!([{
            "name": "ztru",
            "importance": "Unimportant",
            "completed": null,
            "due": null,
            "snooze": null
        }]);
        let schema = StoredSchema::detect(value).unwrap();
        assert_eq!(schema.version(), 0);
        assert_eq!(schema.into_current().into_tasks(), vec![Task::new("ztru")]);
    }

    #[test]
    fn test_unversioned_dates_become_sub_task() {
        let value = json!([{
            "name": "flat",
            "importance": "Important",
            "completed": "2023-05-01",
            "due": "2023-04-30",
            "snooze": "2023-04-20"
        }]);
        let tasks = StoredSchema::detect(value).unwrap().into_current().into_tasks();
        let expected = Task::new("flat")
            .with_importance(Importance::Important)
            .with_sub_tasks(vec![SubTask::new("flat")
                .with_due(Some(date(2023, 4, 30)))
                .with_snooze(Some(date(2023, 4, 20)))
                .with_completed(Some(date(2023, 5, 1)))]);
        assert_eq!(tasks, vec![expected]);
    }

    #[test]
    fn test_unversioned_completed_without_dates_stays_on_task() {
        let value = json!([{ "name": "done", "completed": "2023-01-02" }]);
        let tasks = StoredSchema::detect(value).unwrap().into_current().into_tasks();
        assert_eq!(
            tasks,
            vec![Task::new("done").with_completed(Some(date(2023, 1, 2)))]
        );
    }

    #[test]
    fn test_v1_completion_moves_into_sub_tasks() {
        let value = json!({
            "version": 1,
            "tasks": [{
                "name": "v1",
                "importance": "Important",
                "completed": "2022-12-24",
                "sub_tasks": [
                    { "name": "a", "due": "2022-12-20", "snooze": null },
                    { "name": "b" }
                ]
            }]
        });
        let schema = StoredSchema::detect(value).unwrap();
        assert_eq!(schema.version(), 1);
        let tasks = schema.into_current().into_tasks();
        let task = &tasks[0];
        assert_eq!(task.sub_tasks().len(), 2);
        assert!(task
            .sub_tasks()
            .iter()
            .all(|st| st.completed() == Some(date(2022, 12, 24))));
        assert_eq!(task.completed(), Some(date(2022, 12, 24)));
        assert_eq!(task.stored_dates(), (None, None, None));
    }

    #[test]
    fn test_upgrade_steps_one_version() {
        let schema = StoredSchema::Unversioned(vec![]);
        let v1 = schema.upgrade();
        assert_eq!(v1.version(), 1);
        let v2 = v1.upgrade();
        assert_eq!(v2.version(), CURRENT_VERSION);
        assert_eq!(v2.clone().upgrade(), v2);
    }

    #[test]
    fn test_unknown_version_is_error() {
        let value = json!({ "version": 99, "tasks": [] });
        let err = StoredSchema::detect(value).unwrap_err();
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_missing_version_is_error() {
        assert!(StoredSchema::detect(json!({ "tasks": [] })).is_err());
    }

    #[test]
    fn test_record_conversion_keeps_stored_dates() {
        let task = Task::new("parent")
            .with_stored_dates(Some(date(2024, 1, 1)), None, None)
            .with_sub_tasks(vec![SubTask::new("child").with_due(Some(date(2024, 2, 2)))])
            .with_resources(vec![PathBuf::from("/docs/a.txt")])
            .with_notes(vec!["note".to_string()]);
        let record = TaskRecord::from(&task);
        assert_eq!(record.due, Some(date(2024, 1, 1)));
        assert_eq!(Task::from(record), task);
    }
}
