use crate::app::{AppState, PromptKind};
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Prompt => handle_prompt_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('z') => app.undo(),
            KeyCode::Char('y') => app.redo(),
            KeyCode::Char('c') => return Ok(true),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Char('[') => app.previous_sub_task(),
        KeyCode::Char(']') => app.next_sub_task(),

        KeyCode::Char('a') => app.start_prompt(PromptKind::AddTask),
        KeyCode::Char('A') => app.start_prompt(PromptKind::AddSubTask),
        KeyCode::Char('e') => app.start_prompt(PromptKind::Rename),
        KeyCode::Char('t') => app.start_prompt(PromptKind::Schedule),
        KeyCode::Char('s') => app.start_prompt(PromptKind::Snooze),

        KeyCode::Char('T') => app.remove_due_selected(),
        KeyCode::Char('S') => app.remove_snooze_selected(),
        KeyCode::Char('c') | KeyCode::Enter => app.toggle_complete_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('i') => app.toggle_importance_selected(),
        KeyCode::Char('n') => app.start_prompt(PromptKind::AddNote),
        KeyCode::Char('o') => app.start_prompt(PromptKind::AddResource),
        KeyCode::Char('O') => app.start_prompt(PromptKind::RemoveResource),

        KeyCode::Char('E') => app.start_prompt(PromptKind::RenameSubTask),
        KeyCode::Char('w') => app.start_prompt(PromptKind::ScheduleSubTask),
        KeyCode::Char('z') => app.start_prompt(PromptKind::SnoozeSubTask),
        KeyCode::Char('W') => app.remove_due_sub_task(),
        KeyCode::Char('Z') => app.remove_snooze_sub_task(),
        KeyCode::Char('x') => app.toggle_complete_sub_task(),
        KeyCode::Char('X') => app.delete_sub_task_selected(),
        KeyCode::Char('h') => app.toggle_show_completed(),

        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('r') => app.redo(),

        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while the text prompt is open
fn handle_prompt_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Tab => app.prompt_toggle_importance(),
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c) => app.prompt_add_char(c),
        _ => {}
    }
    Ok(false)
}
