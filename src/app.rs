use crate::domain::{
    flatten_groups, is_completed, sort_tasks_by_relevance, today, Importance, RelevanceGroups,
    Row, SubTask, Task, UiMode,
};
use crate::manager::TaskManager;
use crate::persistence::{Settings, TaskStore};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::path::{Path, PathBuf};

/// What the open text prompt will do on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddTask,
    AddSubTask,
    Rename,
    Schedule,
    Snooze,
    AddNote,
    AddResource,
    RemoveResource,
    RenameSubTask,
    ScheduleSubTask,
    SnoozeSubTask,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AddTask => " Add Task ",
            Self::AddSubTask => " Add Sub-task ",
            Self::Rename => " Rename ",
            Self::Schedule => " Due Date ",
            Self::Snooze => " Snooze Until ",
            Self::AddNote => " Add Note ",
            Self::AddResource => " Add Resource ",
            Self::RemoveResource => " Remove Resource ",
            Self::RenameSubTask => " Rename Sub-task ",
            Self::ScheduleSubTask => " Sub-task Due Date ",
            Self::SnoozeSubTask => " Snooze Sub-task Until ",
        }
    }

    pub fn expects_date(&self) -> bool {
        matches!(
            self,
            Self::Schedule | Self::Snooze | Self::ScheduleSubTask | Self::SnoozeSubTask
        )
    }

    fn targets_sub_task(&self) -> bool {
        matches!(
            self,
            Self::RenameSubTask | Self::ScheduleSubTask | Self::SnoozeSubTask
        )
    }
}

/// Text prompt state
#[derive(Debug, Clone)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    /// Importance for new tasks, toggled with Tab
    pub importance: Importance,
}

/// Main application state: the task manager plus view state.
///
/// Every user action maps to one `TaskManager` operation and flags the
/// collection for saving; the event loop persists it.
pub struct AppState {
    pub manager: TaskManager,
    pub settings: Settings,
    pub store: Box<dyn TaskStore>,
    pub title: String,
    pub ui_mode: UiMode,
    pub prompt: Option<PromptState>,
    pub selected_index: usize,
    pub selected_sub_task: usize,
    pub show_completed: bool,
    pub status: Option<String>,
    pub needs_save: bool,
}

impl AppState {
    pub fn new(store: Box<dyn TaskStore>, tasks: Vec<Task>, settings: Settings, title: String) -> Self {
        let show_completed = settings.show_completed;
        Self {
            manager: TaskManager::new(tasks),
            settings,
            store,
            title,
            ui_mode: UiMode::Normal,
            prompt: None,
            selected_index: 0,
            selected_sub_task: 0,
            show_completed,
            status: None,
            needs_save: false,
        }
    }

    pub fn today(&self) -> NaiveDate {
        today()
    }

    /// Relevance groups for one importance column
    pub fn column(&self, importance: Importance) -> RelevanceGroups<'_> {
        let today = self.today();
        sort_tasks_by_relevance(
            self.manager
                .tasks()
                .iter()
                .filter(|task| task.importance() == importance),
            today,
        )
    }

    /// Selectable tasks in display order: important column, then unimportant
    pub fn visible_tasks(&self) -> Vec<&Task> {
        [Importance::Important, Importance::Unimportant]
            .iter()
            .flat_map(|importance| {
                flatten_groups(&self.column(*importance), self.show_completed)
                    .into_iter()
                    .filter_map(|row| match row {
                        Row::Task(task) => Some(task),
                        Row::Header(..) => None,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.visible_tasks().get(self.selected_index).map(|task| (*task).clone())
    }

    pub fn selected_sub_task(&self) -> Option<SubTask> {
        self.selected_task()
            .and_then(|task| task.sub_tasks().get(self.selected_sub_task).cloned())
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.selected_sub_task = 0;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_tasks().len() {
            self.selected_index += 1;
            self.selected_sub_task = 0;
        }
    }

    pub fn next_sub_task(&mut self) {
        let count = self
            .selected_task()
            .map_or(0, |task| task.sub_tasks().len());
        if self.selected_sub_task + 1 < count {
            self.selected_sub_task += 1;
        }
    }

    pub fn previous_sub_task(&mut self) {
        self.selected_sub_task = self.selected_sub_task.saturating_sub(1);
    }

    /// Keep the selection inside the visible rows after an edit
    fn clamp_selection(&mut self) {
        let count = self.visible_tasks().len();
        if count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
        let sub_count = self
            .selected_task()
            .map_or(0, |task| task.sub_tasks().len());
        if self.selected_sub_task >= sub_count {
            self.selected_sub_task = sub_count.saturating_sub(1);
        }
    }

    fn mutated(&mut self) {
        self.needs_save = true;
        self.status = None;
        self.clamp_selection();
    }

    pub fn add_task(&mut self, name: &str, importance: Importance) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        tracing::info!(task = name, importance = importance.name(), "adding task");
        self.manager.add(Task::new(name).with_importance(importance));
        self.mutated();
    }

    /// Toggle completion of the selected task
    pub fn toggle_complete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.manager.set_complete(&task, !is_completed(&task));
            self.mutated();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            tracing::info!(task = task.name(), "deleting task");
            self.manager.delete(&task);
            self.mutated();
        }
    }

    pub fn toggle_importance_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.manager
                .set_importance(&task, task.importance().toggled());
            self.mutated();
        }
    }

    pub fn remove_due_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.manager.remove_due(&task);
            self.mutated();
        }
    }

    pub fn remove_snooze_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.manager.remove_snooze(&task);
            self.mutated();
        }
    }

    pub fn remove_due_sub_task(&mut self) {
        if let Some(sub_task) = self.selected_sub_task() {
            self.manager.remove_due_sub_task(&sub_task);
            self.mutated();
        }
    }

    pub fn remove_snooze_sub_task(&mut self) {
        if let Some(sub_task) = self.selected_sub_task() {
            self.manager.remove_snooze_sub_task(&sub_task);
            self.mutated();
        }
    }

    pub fn toggle_complete_sub_task(&mut self) {
        if let Some(sub_task) = self.selected_sub_task() {
            self.manager
                .set_complete_sub_task(&sub_task, !sub_task.is_completed());
            self.mutated();
        }
    }

    pub fn delete_sub_task_selected(&mut self) {
        if let Some(sub_task) = self.selected_sub_task() {
            self.manager.delete_sub_task(&sub_task);
            self.mutated();
        }
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.clamp_selection();
    }

    /// Undo the last edit; reports instead of failing when there is none
    pub fn undo(&mut self) {
        if !self.manager.is_undoable() {
            self.status = Some("Nothing to undo".to_string());
            return;
        }
        match self.manager.undo() {
            Ok(()) => self.mutated(),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) {
        if !self.manager.is_redoable() {
            self.status = Some("Nothing to redo".to_string());
            return;
        }
        match self.manager.redo() {
            Ok(()) => self.mutated(),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Open the text prompt, pre-filled where a sensible default exists
    pub fn start_prompt(&mut self, kind: PromptKind) {
        let needs_task = !matches!(kind, PromptKind::AddTask);
        let selected = self.selected_task();
        if needs_task && selected.is_none() {
            return;
        }
        let sub_task = self.selected_sub_task();
        if kind.targets_sub_task() && sub_task.is_none() {
            self.status = Some("No sub-task selected".to_string());
            return;
        }

        let today = self.today();
        let input = match kind {
            PromptKind::AddTask
            | PromptKind::AddSubTask
            | PromptKind::AddNote
            | PromptKind::AddResource => String::new(),
            PromptKind::Rename => selected.map(|t| t.name().to_string()).unwrap_or_default(),
            PromptKind::RemoveResource => selected
                .and_then(|t| t.resources().last().map(|r| r.display().to_string()))
                .unwrap_or_default(),
            PromptKind::RenameSubTask => sub_task
                .map(|st| st.name().to_string())
                .unwrap_or_default(),
            PromptKind::Schedule | PromptKind::ScheduleSubTask => {
                format_date(today + Duration::days(self.settings.schedule_days))
            }
            PromptKind::Snooze | PromptKind::SnoozeSubTask => {
                format_date(today + Duration::days(self.settings.snooze_days))
            }
        };

        self.prompt = Some(PromptState {
            kind,
            input,
            importance: Importance::Important,
        });
        self.ui_mode = UiMode::Prompt;
    }

    pub fn prompt_add_char(&mut self, c: char) {
        if let Some(prompt) = &mut self.prompt {
            prompt.input.push(c);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            prompt.input.pop();
        }
    }

    pub fn prompt_toggle_importance(&mut self) {
        if let Some(prompt) = &mut self.prompt {
            if prompt.kind == PromptKind::AddTask {
                prompt.importance = prompt.importance.toggled();
            }
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Apply the prompt. A date that doesn't parse keeps the prompt open.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.clone() else {
            return;
        };

        let result = self.apply_prompt(&prompt);
        match result {
            Ok(()) => self.cancel_prompt(),
            Err(e) => self.status = Some(format!("{:#}", e)),
        }
    }

    fn apply_prompt(&mut self, prompt: &PromptState) -> Result<()> {
        let input = prompt.input.trim();
        if prompt.kind == PromptKind::AddTask {
            self.add_task(input, prompt.importance);
            return Ok(());
        }

        let Some(task) = self.selected_task() else {
            return Ok(());
        };
        match prompt.kind {
            PromptKind::AddTask => {}
            PromptKind::AddSubTask => {
                if !input.is_empty() {
                    self.manager.add_sub_task(&task, SubTask::new(input));
                    self.mutated();
                }
            }
            PromptKind::Rename => {
                if !input.is_empty() {
                    self.manager.rename(&task, input);
                    self.mutated();
                }
            }
            PromptKind::Schedule => {
                let due = parse_date_input(input, self.today())?;
                self.manager.schedule(&task, Some(due));
                self.mutated();
            }
            PromptKind::Snooze => {
                let snooze = parse_date_input(input, self.today())?;
                self.manager.snooze(&task, Some(snooze));
                self.mutated();
            }
            PromptKind::AddNote => {
                if !input.is_empty() {
                    let mut notes = task.notes().to_vec();
                    notes.push(input.to_string());
                    self.manager.set_notes(&task, notes);
                    self.mutated();
                }
            }
            PromptKind::AddResource => {
                if !input.is_empty() {
                    self.manager.add_resource(&task, PathBuf::from(input));
                    self.mutated();
                }
            }
            PromptKind::RemoveResource => {
                let path = Path::new(input);
                if !task.resources().iter().any(|r| r == path) {
                    anyhow::bail!("No resource {} on this task", input);
                }
                self.manager.remove_resource(&task, path);
                self.mutated();
            }
            PromptKind::RenameSubTask | PromptKind::ScheduleSubTask | PromptKind::SnoozeSubTask => {
                let Some(sub_task) = self.selected_sub_task() else {
                    return Ok(());
                };
                match prompt.kind {
                    PromptKind::RenameSubTask if !input.is_empty() => {
                        self.manager.rename_sub_task(&sub_task, input);
                    }
                    PromptKind::ScheduleSubTask => {
                        let due = parse_date_input(input, self.today())?;
                        self.manager.schedule_sub_task(&sub_task, Some(due));
                    }
                    PromptKind::SnoozeSubTask => {
                        let snooze = parse_date_input(input, self.today())?;
                        self.manager.snooze_sub_task(&sub_task, Some(snooze));
                    }
                    _ => return Ok(()),
                }
                self.mutated();
            }
        }
        Ok(())
    }

    /// Persist the present collection
    pub fn save(&mut self) -> Result<()> {
        self.store.save(self.manager.tasks())?;
        self.needs_save = false;
        Ok(())
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse "YYYY-MM-DD", "today", "tomorrow" or "+N" (days from today)
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        _ => {}
    }
    if let Some(days) = input.strip_prefix('+') {
        let days: i64 = days
            .parse()
            .with_context(|| format!("Invalid day offset: {}", input))?;
        return Ok(today + Duration::days(days));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD, +N, today or tomorrow", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::has_snoozed_date;
    use crate::persistence::JsonStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_app() -> (AppState, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(temp_dir.path().join("tasks.json"));
        let tasks = vec![
            Task::new("Task 1").with_importance(Importance::Important),
            Task::new("Task 2"),
        ];
        let app = AppState::new(Box::new(store), tasks, Settings::default(), "test".to_string());
        (app, temp_dir)
    }

    fn submit(app: &mut AppState, kind: PromptKind, text: &str) {
        app.start_prompt(kind);
        if let Some(prompt) = &mut app.prompt {
            prompt.input = text.to_string();
        }
        app.submit_prompt();
    }

    #[test]
    fn test_app_state_new() {
        let (app, _dir) = create_test_app();
        assert_eq!(app.manager.tasks().len(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_visible_tasks_order() {
        let (app, _dir) = create_test_app();
        let names: Vec<&str> = app.visible_tasks().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Task 1", "Task 2"]);
    }

    #[test]
    fn test_move_selection() {
        let (mut app, _dir) = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_add_task_via_prompt() {
        let (mut app, _dir) = create_test_app();
        app.start_prompt(PromptKind::AddTask);
        app.prompt_toggle_importance();
        for c in "New task".chars() {
            app.prompt_add_char(c);
        }
        app.submit_prompt();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.prompt.is_none());
        let added = app.manager.tasks().last().unwrap();
        assert_eq!(added.name(), "New task");
        assert_eq!(added.importance(), Importance::Unimportant);
        assert!(app.needs_save);
    }

    #[test]
    fn test_blank_task_name_is_ignored() {
        let (mut app, _dir) = create_test_app();
        submit(&mut app, PromptKind::AddTask, "   ");
        assert_eq!(app.manager.tasks().len(), 2);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_complete_hides_task_and_undo_restores() {
        let (mut app, _dir) = create_test_app();
        app.toggle_complete_selected();
        assert_eq!(app.visible_tasks().len(), 1);
        assert!(is_completed(&app.manager.tasks()[0]));

        app.toggle_show_completed();
        assert_eq!(app.visible_tasks().len(), 2);

        app.undo();
        assert!(!is_completed(&app.manager.tasks()[0]));
        app.redo();
        assert!(is_completed(&app.manager.tasks()[0]));
    }

    #[test]
    fn test_undo_with_nothing_sets_status() {
        let (mut app, _dir) = create_test_app();
        app.undo();
        assert_eq!(app.status.as_deref(), Some("Nothing to undo"));
        app.redo();
        assert_eq!(app.status.as_deref(), Some("Nothing to redo"));
        assert!(!app.needs_save);
    }

    #[test]
    fn test_delete_clamps_selection() {
        let (mut app, _dir) = create_test_app();
        app.move_selection_down();
        app.delete_selected();
        assert_eq!(app.manager.tasks().len(), 1);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_toggle_importance_moves_column() {
        let (mut app, _dir) = create_test_app();
        app.toggle_importance_selected();
        assert!(app.column(Importance::Important).len() == 0);
        assert_eq!(app.column(Importance::Unimportant).len(), 2);
    }

    #[test]
    fn test_schedule_and_snooze_prompts() {
        let (mut app, _dir) = create_test_app();
        let today = app.today();

        submit(&mut app, PromptKind::Schedule, "+3");
        let task = app.selected_task().unwrap();
        assert_eq!(task.due(today), Some(today + Duration::days(3)));

        submit(&mut app, PromptKind::Snooze, "tomorrow");
        let task = app
            .manager
            .tasks()
            .iter()
            .find(|t| t.name() == "Task 1")
            .unwrap()
            .clone();
        assert!(has_snoozed_date(&task, today));
    }

    #[test]
    fn test_bad_date_keeps_prompt_open() {
        let (mut app, _dir) = create_test_app();
        submit(&mut app, PromptKind::Schedule, "someday");
        assert!(app.prompt.is_some());
        assert!(app.status.as_deref().unwrap().contains("Invalid date"));
        assert!(!app.needs_save);
    }

    #[test]
    fn test_snooze_prompt_prefilled_from_settings() {
        let (mut app, _dir) = create_test_app();
        app.start_prompt(PromptKind::Snooze);
        let expected = format_date(app.today() + Duration::days(7));
        assert_eq!(app.prompt.as_ref().unwrap().input, expected);
    }

    #[test]
    fn test_sub_task_flow() {
        let (mut app, _dir) = create_test_app();
        submit(&mut app, PromptKind::AddSubTask, "step one");
        submit(&mut app, PromptKind::AddSubTask, "step two");

        let task = app.selected_task().unwrap();
        assert_eq!(task.sub_tasks().len(), 2);

        app.next_sub_task();
        assert_eq!(app.selected_sub_task().unwrap().name(), "step two");
        app.toggle_complete_sub_task();
        app.delete_sub_task_selected();

        let task = app.selected_task().unwrap();
        assert_eq!(task.sub_tasks(), &[SubTask::new("step one")]);
        assert_eq!(app.selected_sub_task, 0);
    }

    #[test]
    fn test_sub_task_prompts() {
        let (mut app, _dir) = create_test_app();
        let today = app.today();

        app.start_prompt(PromptKind::RenameSubTask);
        assert!(app.prompt.is_none());
        assert_eq!(app.status.as_deref(), Some("No sub-task selected"));

        submit(&mut app, PromptKind::AddSubTask, "step");
        app.start_prompt(PromptKind::RenameSubTask);
        assert_eq!(app.prompt.as_ref().unwrap().input, "step");
        app.cancel_prompt();

        submit(&mut app, PromptKind::RenameSubTask, "first step");
        submit(&mut app, PromptKind::ScheduleSubTask, "+2");
        submit(&mut app, PromptKind::SnoozeSubTask, "+5");

        let sub_task = app.selected_sub_task().unwrap();
        assert_eq!(sub_task.name(), "first step");
        assert_eq!(sub_task.due(), Some(today + Duration::days(2)));
        assert_eq!(sub_task.snooze(), Some(today + Duration::days(5)));
        assert_eq!(
            app.selected_task().unwrap().snooze(today),
            Some(today + Duration::days(5))
        );

        app.remove_due_sub_task();
        app.remove_snooze_sub_task();
        assert_eq!(app.selected_sub_task().unwrap(), SubTask::new("first step"));
    }

    #[test]
    fn test_notes_and_resources_prompts() {
        let (mut app, _dir) = create_test_app();

        submit(&mut app, PromptKind::AddNote, "call Bob");
        submit(&mut app, PromptKind::AddNote, "  ");
        assert_eq!(app.selected_task().unwrap().notes(), &["call Bob".to_string()]);

        submit(&mut app, PromptKind::AddResource, "/tmp/plan.pdf");
        submit(&mut app, PromptKind::AddResource, "/tmp/notes.txt");

        app.start_prompt(PromptKind::RemoveResource);
        assert_eq!(app.prompt.as_ref().unwrap().input, "/tmp/notes.txt");
        app.submit_prompt();
        assert_eq!(
            app.selected_task().unwrap().resources(),
            &[PathBuf::from("/tmp/plan.pdf")]
        );

        submit(&mut app, PromptKind::RemoveResource, "/tmp/missing");
        assert!(app.prompt.is_some());
        assert!(app.status.as_deref().unwrap().contains("No resource"));
        assert_eq!(app.selected_task().unwrap().resources().len(), 1);
    }

    #[test]
    fn test_rename_prompt_prefilled() {
        let (mut app, _dir) = create_test_app();
        app.start_prompt(PromptKind::Rename);
        assert_eq!(app.prompt.as_ref().unwrap().input, "Task 1");
        app.prompt_backspace();
        app.prompt_add_char('!');
        app.submit_prompt();
        assert_eq!(app.selected_task().unwrap().name(), "Task !");
    }

    #[test]
    fn test_save_writes_store() {
        let (mut app, dir) = create_test_app();
        app.add_task("Persisted", Importance::Important);
        app.save().unwrap();
        assert!(!app.needs_save);

        let loaded = JsonStore::new(dir.path().join("tasks.json")).load().unwrap();
        assert_eq!(loaded, app.manager.tasks().to_vec());
    }

    #[test]
    fn test_parse_date_input() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(parse_date_input("today", today).unwrap(), today);
        assert_eq!(
            parse_date_input("Tomorrow", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
        );
        assert_eq!(
            parse_date_input("+10", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 25).unwrap()
        );
        assert_eq!(
            parse_date_input("2025-01-31", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert!(parse_date_input("+x", today).is_err());
        assert!(parse_date_input("31.01.2025", today).is_err());
    }
}
