use crate::app::{AppState, PromptKind};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the text prompt for adding, renaming and dating tasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(prompt) = &app.prompt {
        let modal_area = create_modal_area(area);

        f.render_widget(Clear, modal_area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::raw("> "),
                Span::styled(prompt.input.as_str(), modal_title_style()),
                Span::styled("█", modal_title_style()),
            ]),
            Line::raw(""),
        ];

        if prompt.kind == PromptKind::AddTask {
            lines.push(Line::from(vec![
                Span::raw("Importance: "),
                Span::styled(prompt.importance.name(), modal_title_style()),
                Span::raw("  (Tab to switch)"),
            ]));
        }
        if prompt.kind.expects_date() {
            lines.push(Line::raw("YYYY-MM-DD, +N days, today or tomorrow"));
        }
        lines.push(Line::raw("Enter to submit  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(prompt.kind.title(), modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
