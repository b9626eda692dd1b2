pub mod counters_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use counters_pane::render_counters_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_confirm_modal;
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};
use styles::{error_style, hint_style};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &mut AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_counters_pane(f, app, layout.counters_area);
    render_status_line(f, app, layout.status_area);

    if app.pending_delete.is_some() {
        render_confirm_modal(f, app, size);
    }

    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}

fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status {
        Some(message) => Span::styled(format!(" {}", message), error_style()),
        None => Span::styled(format!(" theme: {}", app.theme().to_tag()), hint_style()),
    };
    f.render_widget(Paragraph::new(line), area);
}
