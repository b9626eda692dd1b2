use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

fn hints_for(mode: UiMode) -> Vec<&'static str> {
    match mode {
        UiMode::Normal => vec![
            " ↑/↓ move   ",
            "a add   ",
            "e rename   ",
            "Enter done   ",
            "Space select   ",
            "d delete   ",
            "s/S sort   ",
            "r reset   ",
            "m drag   ",
            "t theme   ",
            "q quit",
        ],
        UiMode::AddingTask | UiMode::RenamingTask => vec![" Enter save   ", "Esc cancel"],
        UiMode::Confirming => vec![" y confirm   ", "n cancel"],
        UiMode::Dragging => vec![" ↑/↓ move   ", "Enter drop   ", "Esc cancel"],
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let hints = Line::from(hints_for(mode).into_iter().map(Span::raw).collect::<Vec<_>>());

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
