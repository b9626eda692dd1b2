use crate::app::AppState;
use crate::domain::Counters;
use crate::ui::styles::{border_style, default_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn counter_lines(counters: &Counters, selected: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::raw(format!("Total:      {}", counters.total)),
        Line::raw(format!("Completed:  {}", counters.completed)),
        Line::raw(format!("Remaining:  {}", counters.remaining())),
        Line::raw(format!("Deleted:    {}", counters.deleted)),
        Line::raw(format!("Edited:     {}", counters.edited)),
    ];
    if selected > 0 {
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!("Selected:   {}", selected)));
    }
    lines
}

/// Render the counters pane
pub fn render_counters_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = app.theme();
    let lines = counter_lines(&app.session.counters(), app.selected.len());

    let paragraph = Paragraph::new(lines).style(default_style(theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Counters ", title_style(theme))),
    );

    f.render_widget(paragraph, area);
}
