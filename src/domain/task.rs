use super::enums::Importance;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Today's calendar date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A decomposition unit of a task.
///
/// Values are never edited in place: every `with_*` method returns a new
/// sub-task, and owners swap the old value out by equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SubTask {
    name: String,
    due: Option<NaiveDate>,
    snooze: Option<NaiveDate>,
    completed: Option<NaiveDate>,
}

impl SubTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn due(&self) -> Option<NaiveDate> {
        self.due
    }

    pub fn snooze(&self) -> Option<NaiveDate> {
        self.snooze
    }

    pub fn completed(&self) -> Option<NaiveDate> {
        self.completed
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_due(mut self, due: Option<NaiveDate>) -> Self {
        self.due = due;
        self
    }

    pub fn with_snooze(mut self, snooze: Option<NaiveDate>) -> Self {
        self.snooze = snooze;
        self
    }

    pub fn with_completed(mut self, completed: Option<NaiveDate>) -> Self {
        self.completed = completed;
        self
    }

    /// Snoozed into the future; a past snooze date is inert
    pub fn is_snoozed(&self, today: NaiveDate) -> bool {
        self.snooze.map_or(false, |snooze| snooze > today)
    }

    /// Neither snoozed nor scheduled
    pub fn is_bare(&self) -> bool {
        self.snooze.is_none() && self.due.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// A task in the matrix.
///
/// Without sub-tasks the task's own due/snooze/completed dates apply. With
/// sub-tasks those dates are aggregates computed from the sub-tasks, and the
/// stored ones are only kept so that a save/load cycle is lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Task {
    name: String,
    importance: Importance,
    sub_tasks: Vec<SubTask>,
    resources: Vec<PathBuf>,
    notes: Vec<String>,
    due: Option<NaiveDate>,
    snooze: Option<NaiveDate>,
    completed: Option<NaiveDate>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn sub_tasks(&self) -> &[SubTask] {
        &self.sub_tasks
    }

    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Stored dates, ignoring sub-tasks (used by the store)
    pub fn stored_dates(&self) -> (Option<NaiveDate>, Option<NaiveDate>, Option<NaiveDate>) {
        (self.due, self.snooze, self.completed)
    }

    /// Effective due date
    pub fn due(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.sub_tasks.is_empty() {
            return self.due;
        }
        // Snoozed sub-tasks only count when every sub-task is snoozed
        let all_snoozed = self.sub_tasks.iter().all(|st| st.is_snoozed(today));
        self.sub_tasks
            .iter()
            .filter(|st| all_snoozed || !st.is_snoozed(today))
            .filter_map(SubTask::due)
            .min()
    }

    /// Effective snooze date
    pub fn snooze(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.sub_tasks.is_empty() {
            return self.snooze;
        }
        if self.sub_tasks.iter().any(SubTask::is_bare) {
            return None;
        }
        self.sub_tasks
            .iter()
            .filter(|st| st.is_snoozed(today))
            .filter_map(SubTask::snooze)
            .min()
    }

    /// Effective completion date
    pub fn completed(&self) -> Option<NaiveDate> {
        if self.sub_tasks.is_empty() {
            return self.completed;
        }
        self.sub_tasks
            .iter()
            .map(SubTask::completed)
            .collect::<Option<Vec<_>>>()
            .and_then(|dates| dates.into_iter().max())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_sub_tasks(mut self, sub_tasks: Vec<SubTask>) -> Self {
        self.sub_tasks = sub_tasks;
        self
    }

    pub fn with_resources(mut self, resources: Vec<PathBuf>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the due date. On a task with sub-tasks every sub-task is
    /// rescheduled so the effective date follows the edit.
    pub fn with_due(mut self, due: Option<NaiveDate>) -> Self {
        if self.sub_tasks.is_empty() {
            self.due = due;
        } else {
            self.sub_tasks = self
                .sub_tasks
                .into_iter()
                .map(|st| st.with_due(due))
                .collect();
        }
        self
    }

    /// Set the snooze date, fanning out to sub-tasks like `with_due`
    pub fn with_snooze(mut self, snooze: Option<NaiveDate>) -> Self {
        if self.sub_tasks.is_empty() {
            self.snooze = snooze;
        } else {
            self.sub_tasks = self
                .sub_tasks
                .into_iter()
                .map(|st| st.with_snooze(snooze))
                .collect();
        }
        self
    }

    /// Set the completion date. Completing a task with sub-tasks completes
    /// the open ones and leaves earlier completion dates alone; clearing it
    /// reopens all of them.
    pub fn with_completed(mut self, completed: Option<NaiveDate>) -> Self {
        if self.sub_tasks.is_empty() {
            self.completed = completed;
        } else {
            self.sub_tasks = self
                .sub_tasks
                .into_iter()
                .map(|st| match completed {
                    Some(date) if st.completed().is_none() => st.with_completed(Some(date)),
                    Some(_) => st,
                    None => st.with_completed(None),
                })
                .collect();
        }
        self
    }

    /// Stored dates without the sub-task fan-out (used by the store)
    pub fn with_stored_dates(
        mut self,
        due: Option<NaiveDate>,
        snooze: Option<NaiveDate>,
        completed: Option<NaiveDate>,
    ) -> Self {
        self.due = due;
        self.snooze = snooze;
        self.completed = completed;
        self
    }

    /// Index of the first sub-task equal to `sub_task`
    pub fn position_of(&self, sub_task: &SubTask) -> Option<usize> {
        self.sub_tasks.iter().position(|st| st == sub_task)
    }
}
