use crate::app::AppState;
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

/// Render the prompt for adding or renaming a task
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let (title_text, label) = if form.target.is_some() {
            (" Rename Task ", "Edit task:")
        } else {
            (" Add Task ", "New task:")
        };

        let lines = vec![
            Line::raw(""),
            Line::raw(label),
            Line::from(vec![
                Span::raw("> "),
                Span::styled(form.text.as_str(), modal_title_style()),
                Span::styled("█", modal_title_style()), // Cursor
            ]),
            Line::raw(""),
            Line::raw("Enter to save  ·  Esc to cancel"),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title_text, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
