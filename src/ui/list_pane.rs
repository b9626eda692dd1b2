use crate::app::AppState;
use crate::domain::{Task, Theme};
use crate::ui::styles::{
    border_style, checkbox_style, cursor_style, default_style, done_style, dragging_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &mut AppState, area: Rect) {
    let theme = app.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Tasks ", title_style(theme)));

    // Remember the inner area for mouse hit-testing
    let inner = block.inner(area);
    app.list_inner = inner;
    app.scroll_to_cursor(inner.height as usize);

    let dragged = app.drag.as_ref().map(|d| d.moved);
    let items: Vec<ListItem> = app
        .visible_tasks()
        .iter()
        .enumerate()
        .skip(app.list_offset)
        .take(inner.height as usize)
        .map(|(idx, task)| {
            let line = create_task_line(task, app.selected.contains(&task.id), theme);
            let style = if Some(task.id) == dragged {
                dragging_style()
            } else if idx == app.cursor {
                cursor_style(theme)
            } else {
                default_style(theme)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Line::raw("No tasks yet. Press a to add one."))])
    } else {
        List::new(items)
    };

    f.render_widget(list.block(block).style(default_style(theme)), area);
}

/// Create a single line for a task
/// Format: [x] ✓ Write proposal
fn create_task_line(task: &Task, selected: bool, theme: Theme) -> Line<'static> {
    let checkbox = if selected { "[x] " } else { "[ ] " };
    let mut spans = vec![Span::styled(checkbox.to_string(), checkbox_style())];

    if task.completed {
        spans.push(Span::raw("✓ ".to_string()));
        spans.push(Span::styled(task.text.clone(), done_style(theme)));
    } else {
        spans.push(Span::raw("  ".to_string()));
        spans.push(Span::raw(task.text.clone()));
    }

    Line::from(spans)
}
