use crate::app::{format_date, AppState};
use crate::domain::{quadrant_of, relevance_of};
use crate::ui::styles::{border_style, default_style, selected_style, title_style};
use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };
    let today = app.today();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name:      ", title_style()),
            Span::raw(task.name().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Quadrant:  ", title_style()),
            Span::raw(format!(
                "{} ({})",
                quadrant_of(&task, today).name(),
                relevance_of(&task, today).label()
            )),
        ]),
        Line::from(vec![
            Span::styled("Due:       ", title_style()),
            Span::raw(date_or_dash(task.due(today))),
        ]),
        Line::from(vec![
            Span::styled("Snooze:    ", title_style()),
            Span::raw(date_or_dash(task.snooze(today))),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", title_style()),
            Span::raw(date_or_dash(task.completed())),
        ]),
        Line::raw(""),
    ];

    if !task.sub_tasks().is_empty() {
        lines.push(Line::from(Span::styled("Sub-tasks:", title_style())));
        for (i, sub_task) in task.sub_tasks().iter().enumerate() {
            let mark = if sub_task.is_completed() { "x" } else { " " };
            let mut text = format!("  [{}] {}", mark, sub_task.name());
            if let Some(due) = sub_task.due() {
                text.push_str(&format!("  due {}", format_date(due)));
            }
            if sub_task.is_snoozed(today) {
                text.push_str(&format!("  snoozed {}", date_or_dash(sub_task.snooze())));
            }
            let style = if i == app.selected_sub_task {
                selected_style()
            } else {
                default_style()
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        lines.push(Line::raw(""));
    }

    if !task.resources().is_empty() {
        lines.push(Line::from(Span::styled("Resources:", title_style())));
        for resource in task.resources() {
            lines.push(Line::raw(format!("  {}", resource.display())));
        }
        lines.push(Line::raw(""));
    }

    if task.notes().is_empty() {
        lines.push(Line::from(Span::styled("Notes: (empty)", default_style())));
    } else {
        lines.push(Line::from(Span::styled("Notes:", title_style())));
        for note in task.notes() {
            lines.push(Line::raw(format!("  {}", note)));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
