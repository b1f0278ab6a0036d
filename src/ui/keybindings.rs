use crate::app::AppState;
use crate::ui::styles::{error_style, hint_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("a add   "),
        Span::raw("A sub-task   "),
        Span::raw("e rename   "),
        Span::raw("c complete   "),
        Span::raw("t/T due   "),
        Span::raw("s/S snooze   "),
        Span::raw("i importance   "),
        Span::raw("n note   "),
        Span::raw("o/O resource   "),
        Span::raw("[/] E w/W z/Z x/X sub-task   "),
        Span::raw("d delete   "),
        Span::raw("h completed   "),
        Span::raw("u/r undo/redo   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status bar: last message, or the store and history state
pub fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(format!(" {}", message), error_style())),
        None => {
            let undo = if app.manager.is_undoable() { "undo" } else { "-" };
            let redo = if app.manager.is_redoable() { "redo" } else { "-" };
            Line::from(Span::styled(
                format!(
                    " {}  ·  {} tasks  ·  {}/{} ({} steps){}",
                    app.title,
                    app.manager.tasks().len(),
                    undo,
                    redo,
                    app.manager.history_len(),
                    if app.needs_save { "  ·  unsaved" } else { "" }
                ),
                hint_style(),
            ))
        }
    };

    f.render_widget(Paragraph::new(line), area);
}
