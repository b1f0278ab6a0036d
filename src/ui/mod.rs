pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod matrix_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::{Importance, UiMode};
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status};
use layout::create_layout;
use matrix_pane::render_column;
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);

    let important_count = render_column(f, app, Importance::Important, 0, layout.important_area);
    render_column(
        f,
        app,
        Importance::Unimportant,
        important_count,
        layout.unimportant_area,
    );
    render_details_pane(f, app, layout.details_area);
    render_status(f, app, layout.status_area);

    if app.ui_mode == UiMode::Prompt {
        render_input_form(f, app, size);
    }
}
