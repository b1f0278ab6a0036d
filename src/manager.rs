use crate::domain::{today, Importance, SubTask, Task};
use crate::history::{History, HistoryError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// The mutation API over the task collection.
///
/// Every operation records a new history step first and then edits the
/// fresh present in place, so each one can be undone. Tasks and sub-tasks
/// are located by value equality; when the target is not in the collection
/// the edit is a silent no-op.
#[derive(Debug, Clone)]
pub struct TaskManager {
    history: History<Vec<Task>>,
    clock: fn() -> NaiveDate,
}

impl TaskManager {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            history: History::new(tasks),
            clock: today,
        }
    }

    /// Use a fixed source for "today" (completion dates)
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        self.history.present()
    }

    pub fn add(&mut self, task: Task) {
        tracing::debug!(task = task.name(), "add task");
        self.history.advance_history().push(task);
    }

    pub fn delete(&mut self, task: &Task) {
        let tasks = self.history.advance_history();
        remove_first(tasks, task);
    }

    /// Swap `old` for `new`; `new` goes to the end of the collection
    pub fn replace(&mut self, old: &Task, new: Task) {
        let tasks = self.history.advance_history();
        remove_first(tasks, old);
        tasks.push(new);
    }

    pub fn set_complete(&mut self, task: &Task, is_complete: bool) {
        let completed = is_complete.then(self.clock);
        self.update(task, |t| t.with_completed(completed));
    }

    pub fn rename(&mut self, task: &Task, new_name: &str) {
        self.update(task, |t| t.with_name(new_name));
    }

    pub fn schedule(&mut self, task: &Task, due: Option<NaiveDate>) {
        self.update(task, |t| t.with_due(due));
    }

    pub fn snooze(&mut self, task: &Task, snooze: Option<NaiveDate>) {
        self.update(task, |t| t.with_snooze(snooze));
    }

    pub fn remove_due(&mut self, task: &Task) {
        self.update(task, |t| t.with_due(None));
    }

    pub fn remove_snooze(&mut self, task: &Task) {
        self.update(task, |t| t.with_snooze(None));
    }

    pub fn set_importance(&mut self, task: &Task, importance: Importance) {
        self.update(task, |t| t.with_importance(importance));
    }

    pub fn add_resource(&mut self, task: &Task, resource: PathBuf) {
        self.update(task, |t| {
            let mut resources = t.resources().to_vec();
            resources.push(resource);
            t.with_resources(resources)
        });
    }

    pub fn remove_resource(&mut self, task: &Task, resource: &Path) {
        self.update(task, |t| {
            let mut resources = t.resources().to_vec();
            if let Some(index) = resources.iter().position(|r| r == resource) {
                resources.remove(index);
            }
            t.with_resources(resources)
        });
    }

    pub fn set_notes(&mut self, task: &Task, notes: Vec<String>) {
        self.update(task, |t| t.with_notes(notes));
    }

    /// Append a sub-task. The first sub-task takes over the task's own due
    /// and snooze dates and the stored dates are cleared, since from then on
    /// the task's dates are derived from its sub-tasks.
    pub fn add_sub_task(&mut self, task: &Task, sub_task: SubTask) {
        self.update(task, |t| {
            let mut sub_tasks = t.sub_tasks().to_vec();
            if sub_tasks.is_empty() {
                let (due, snooze, _) = t.stored_dates();
                let due = sub_task.due().or(due);
                let snooze = sub_task.snooze().or(snooze);
                sub_tasks.push(sub_task.with_due(due).with_snooze(snooze));
            } else {
                sub_tasks.push(sub_task);
            }
            t.with_sub_tasks(sub_tasks).with_stored_dates(None, None, None)
        });
    }

    pub fn delete_sub_task(&mut self, sub_task: &SubTask) {
        self.update_sub_task(sub_task, |_| None);
    }

    pub fn rename_sub_task(&mut self, sub_task: &SubTask, new_name: &str) {
        self.update_sub_task(sub_task, |st| Some(st.with_name(new_name)));
    }

    pub fn schedule_sub_task(&mut self, sub_task: &SubTask, due: Option<NaiveDate>) {
        self.update_sub_task(sub_task, |st| Some(st.with_due(due)));
    }

    pub fn snooze_sub_task(&mut self, sub_task: &SubTask, snooze: Option<NaiveDate>) {
        self.update_sub_task(sub_task, |st| Some(st.with_snooze(snooze)));
    }

    pub fn remove_due_sub_task(&mut self, sub_task: &SubTask) {
        self.update_sub_task(sub_task, |st| Some(st.with_due(None)));
    }

    pub fn remove_snooze_sub_task(&mut self, sub_task: &SubTask) {
        self.update_sub_task(sub_task, |st| Some(st.with_snooze(None)));
    }

    pub fn set_complete_sub_task(&mut self, sub_task: &SubTask, is_complete: bool) {
        let completed = is_complete.then(self.clock);
        self.update_sub_task(sub_task, |st| Some(st.with_completed(completed)));
    }

    pub fn is_undoable(&self) -> bool {
        self.history.has_past()
    }

    pub fn is_redoable(&self) -> bool {
        self.history.has_future()
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.history.undo()?;
        tracing::debug!("undo");
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.history.redo()?;
        tracing::debug!("redo");
        Ok(())
    }

    /// Number of recorded history steps
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Replace the first task equal to `old` with `edit(old)`
    fn update(&mut self, old: &Task, edit: impl FnOnce(Task) -> Task) {
        let tasks = self.history.advance_history();
        match tasks.iter().position(|t| t == old) {
            Some(index) => {
                let updated = edit(tasks[index].clone());
                tasks[index] = updated;
            }
            None => tracing::debug!(task = old.name(), "task not found, nothing to edit"),
        }
    }

    /// Edit the first sub-task equal to `old` inside whichever task holds
    /// it; `None` from `edit` removes the sub-task
    fn update_sub_task(&mut self, old: &SubTask, edit: impl FnOnce(SubTask) -> Option<SubTask>) {
        let tasks = self.history.advance_history();
        let found = tasks
            .iter()
            .enumerate()
            .find_map(|(i, t)| t.position_of(old).map(|j| (i, j)));
        let Some((task_index, sub_index)) = found else {
            tracing::debug!(sub_task = old.name(), "sub-task not found, nothing to edit");
            return;
        };

        let owner = tasks[task_index].clone();
        let mut sub_tasks = owner.sub_tasks().to_vec();
        match edit(sub_tasks[sub_index].clone()) {
            Some(updated) => sub_tasks[sub_index] = updated,
            None => {
                sub_tasks.remove(sub_index);
            }
        }
        tasks[task_index] = owner.with_sub_tasks(sub_tasks);
    }
}

fn remove_first(tasks: &mut Vec<Task>, task: &Task) {
    if let Some(index) = tasks.iter().position(|t| t == task) {
        tasks.remove(index);
    }
}
