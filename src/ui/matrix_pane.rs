use crate::app::AppState;
use crate::domain::{
    flatten_groups, has_snoozed_date, quadrant_of, relative_label, Importance, Row, Task,
};
use crate::ui::styles::{
    border_style, date_style, default_style, header_style, selected_style, title_style,
};
use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render one importance column of the matrix.
///
/// `first_index` is the selection index of the column's first task, so the
/// highlight lines up with `AppState::visible_tasks`.
pub fn render_column(
    f: &mut Frame,
    app: &AppState,
    importance: Importance,
    first_index: usize,
    area: Rect,
) -> usize {
    let today = app.today();
    let groups = app.column(importance);
    let rows = flatten_groups(&groups, app.show_completed);

    let mut task_index = first_index;
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            Row::Header(relevance, count) => ListItem::new(Line::from(Span::styled(
                format!("{} ({})", relevance.label(), count),
                header_style(*relevance),
            ))),
            Row::Task(task) => {
                let style = if task_index == app.selected_index {
                    selected_style()
                } else {
                    default_style()
                };
                task_index += 1;
                ListItem::new(create_task_line(task, today)).style(style)
            }
        })
        .collect();

    let title = format!(" {} ({}) ", importance.name(), groups.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
    task_index - first_index
}

/// Create a single line for a task
/// Format: [Do] Write proposal  due in 3d  ⏾ tomorrow  (1/3)
fn create_task_line(task: &Task, today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("[{}] ", quadrant_of(task, today).name())));
    spans.push(Span::raw(task.name().to_string()));

    if let Some(due) = task.due(today) {
        spans.push(Span::styled(
            format!("  due {}", relative_label(due, today)),
            date_style(),
        ));
    }

    if has_snoozed_date(task, today) {
        if let Some(snooze) = task.snooze(today) {
            spans.push(Span::styled(
                format!("  ⏾ {}", relative_label(snooze, today)),
                date_style(),
            ));
        }
    }

    let sub_tasks = task.sub_tasks();
    if !sub_tasks.is_empty() {
        let done = sub_tasks.iter().filter(|st| st.is_completed()).count();
        spans.push(Span::raw(format!("  ({}/{})", done, sub_tasks.len())));
    }

    Line::from(spans)
}
