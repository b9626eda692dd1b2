use crate::app::AppState;
use crate::domain::{SortDirection, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // A status message lives until the next key press
    app.status = None;

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::RenamingTask => handle_input_form_mode(app, key),
        UiMode::Confirming => handle_confirm_mode(app, key),
        UiMode::Dragging => handle_drag_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor_down(),

        // Add / rename
        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('e') | KeyCode::F(2) => app.start_rename(),

        // Complete / select
        KeyCode::Enter | KeyCode::Char('c') => app.toggle_complete(),
        KeyCode::Char(' ') => app.toggle_select(),

        // Delete (selection if any, otherwise the cursor task)
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),

        // Ordering
        KeyCode::Char('s') => app.sort(SortDirection::Ascending),
        KeyCode::Char('S') => app.sort(SortDirection::Descending),
        KeyCode::Char('r') => app.reset_order(),
        KeyCode::Char('m') => app.start_drag(false),

        KeyCode::Char('t') => app.toggle_theme(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while the add/rename prompt is open
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Only an answer is accepted while a confirmation is pending
fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirmation(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirmation(false),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while a task is picked up
fn handle_drag_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.drag_step(true),
        KeyCode::Down | KeyCode::Char('j') => app.drag_step(false),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_drag(),
        KeyCode::Esc => app.cancel_drag(),
        _ => {}
    }
    Ok(false)
}

/// Press on a row picks it up, dragging moves it, release drops it.
/// Releasing outside the list cancels the drag.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    match (app.ui_mode, mouse.kind) {
        (UiMode::Normal, MouseEventKind::Down(MouseButton::Left)) => {
            if let Some(index) = app.row_at(mouse.column, mouse.row) {
                app.status = None;
                app.cursor = index;
                app.start_drag(true);
            }
        }
        (UiMode::Dragging, MouseEventKind::Drag(MouseButton::Left)) => {
            if app.drag.as_ref().is_some_and(|d| d.by_mouse) {
                app.drag_to_row(mouse.row);
            }
        }
        (UiMode::Dragging, MouseEventKind::Up(MouseButton::Left)) => {
            if app.drag.as_ref().is_some_and(|d| d.by_mouse) {
                if app.in_list_area(mouse.column, mouse.row) {
                    app.drop_drag();
                } else {
                    app.cancel_drag();
                }
            }
        }
        (UiMode::Normal, MouseEventKind::ScrollUp) => app.move_cursor_up(),
        (UiMode::Normal, MouseEventKind::ScrollDown) => app.move_cursor_down(),
        _ => {}
    }
}
