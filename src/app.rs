use crate::domain::{SortDirection, Task, TaskError, TaskId, Theme, UiMode};
use crate::ordering::{drop_target, move_before, RowBox};
use crate::session::{PendingDelete, Session};
use crate::store::RenameOutcome;
use anyhow::Result;
use ratatui::layout::Rect;
use std::collections::HashSet;
use tracing::{debug, error};

/// Text prompt state for adding or renaming a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormState {
    pub text: String,
    /// Task being renamed; `None` when adding
    pub target: Option<TaskId>,
}

/// A task picked up for moving. The store is not touched until the drop.
#[derive(Debug, Clone)]
pub struct DragState {
    pub moved: TaskId,
    /// Provisional display order shown while dragging
    pub preview: Vec<Task>,
    /// Started with the mouse (released with the button) rather than the keyboard
    pub by_mouse: bool,
}

/// Main application state for the terminal front end
pub struct AppState {
    pub session: Session,
    /// Cursor row in display order
    pub cursor: usize,
    /// Tasks ticked for bulk delete
    pub selected: HashSet<TaskId>,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    /// The single in-flight confirmation, if any
    pub pending_delete: Option<PendingDelete>,
    pub drag: Option<DragState>,
    /// Last message for the status line
    pub status: Option<String>,
    /// First visible row of the list
    pub list_offset: usize,
    /// Inner area of the list pane from the last render, for mouse hit-testing
    pub list_inner: Rect,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            cursor: 0,
            selected: HashSet::new(),
            ui_mode: UiMode::Normal,
            input_form: None,
            pending_delete: None,
            drag: None,
            status: None,
            list_offset: 0,
            list_inner: Rect::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.session.theme()
    }

    /// Tasks in the order they should be drawn (the drag preview while dragging)
    pub fn visible_tasks(&self) -> &[Task] {
        match &self.drag {
            Some(drag) => &drag.preview,
            None => self.session.tasks(),
        }
    }

    pub fn cursor_task_id(&self) -> Option<TaskId> {
        self.visible_tasks().get(self.cursor).map(|t| t.id)
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn place_cursor_on(&mut self, id: TaskId) {
        if let Some(pos) = self.visible_tasks().iter().position(|t| t.id == id) {
            self.cursor = pos;
        }
    }

    /// Show an operation's failure on the status line. Domain rejections are
    /// expected; anything else is also logged.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                match e.downcast_ref::<TaskError>() {
                    Some(TaskError::NotFound) => {}
                    Some(task_error) => self.status = Some(task_error.to_string()),
                    None => {
                        error!("operation failed: {:#}", e);
                        self.status = Some(format!("Error: {}", e));
                    }
                }
                None
            }
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.visible_tasks().len() {
            self.cursor += 1;
        }
    }

    /// Tick or untick the task under the cursor for bulk delete
    pub fn toggle_select(&mut self) {
        if let Some(id) = self.cursor_task_id() {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        }
    }

    pub fn toggle_complete(&mut self) {
        if let Some(id) = self.cursor_task_id() {
            let result = self.session.toggle_complete(id);
            self.report(result);
        }
    }

    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState {
            text: String::new(),
            target: None,
        });
        self.ui_mode = UiMode::AddingTask;
    }

    /// Open the prompt pre-filled with the current name
    pub fn start_rename(&mut self) {
        let Some(task) = self.visible_tasks().get(self.cursor) else {
            return;
        };
        self.input_form = Some(InputFormState {
            text: task.text.clone(),
            target: Some(task.id),
        });
        self.ui_mode = UiMode::RenamingTask;
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.text.push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.text.pop();
        }
    }

    /// Create or rename. A rejected name keeps the prompt open so it can be fixed.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };

        let accepted = match form.target {
            None => {
                let result = self.session.create(&form.text);
                match self.report(result) {
                    Some(id) => {
                        self.place_cursor_on(id);
                        true
                    }
                    None => false,
                }
            }
            Some(id) => {
                let result = self.session.rename(id, &form.text);
                match self.report(result) {
                    Some(RenameOutcome::Renamed) | Some(RenameOutcome::Unchanged) => true,
                    // A vanished task has nothing left to rename
                    None => self.session.store().get(id).is_none(),
                }
            }
        };

        if accepted {
            self.input_form = None;
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Ask before deleting: the ticked tasks if any, otherwise the cursor task
    pub fn request_delete(&mut self) {
        if self.ui_mode.blocks_mutations() {
            return;
        }
        let pending = if self.selected.is_empty() {
            self.cursor_task_id()
                .and_then(|id| self.session.request_delete_one(id))
        } else {
            self.session.request_delete_selected(&self.selected)
        };

        if let Some(pending) = pending {
            debug!(count = pending.ids.len(), "awaiting delete confirmation");
            self.pending_delete = Some(pending);
            self.ui_mode = UiMode::Confirming;
        }
    }

    /// Resolve the pending confirmation; the delete only happens on yes
    pub fn answer_confirmation(&mut self, yes: bool) {
        let Some(pending) = self.pending_delete.take() else {
            self.ui_mode = UiMode::Normal;
            return;
        };
        self.ui_mode = UiMode::Normal;
        if !yes {
            return;
        }

        let deleted = pending.ids.clone();
        let result = self.session.confirm_delete(pending);
        if self.report(result).is_some() {
            self.selected.retain(|id| !deleted.contains(id));
            self.clamp_cursor();
        }
    }

    pub fn sort(&mut self, direction: SortDirection) {
        let current = self.cursor_task_id();
        let result = self.session.sort(direction);
        self.report(result);
        if let Some(id) = current {
            self.place_cursor_on(id);
        }
    }

    pub fn reset_order(&mut self) {
        let current = self.cursor_task_id();
        let result = self.session.reset();
        self.report(result);
        if let Some(id) = current {
            self.place_cursor_on(id);
        }
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.session.theme().toggled();
        let result = self.session.set_theme(theme);
        self.report(result);
    }

    /// Pick up the task under the cursor
    pub fn start_drag(&mut self, by_mouse: bool) {
        if self.ui_mode.blocks_mutations() {
            return;
        }
        let Some(moved) = self.cursor_task_id() else {
            return;
        };
        self.drag = Some(DragState {
            moved,
            preview: self.session.tasks().to_vec(),
            by_mouse,
        });
        self.ui_mode = UiMode::Dragging;
    }

    /// Keyboard drag: move the picked-up task one row up or down in the preview
    pub fn drag_step(&mut self, up: bool) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        let Some(index) = drag.preview.iter().position(|t| t.id == drag.moved) else {
            return;
        };

        let before = if up {
            if index == 0 {
                return;
            }
            Some(drag.preview[index - 1].id)
        } else {
            if index + 1 >= drag.preview.len() {
                return;
            }
            drag.preview.get(index + 2).map(|t| t.id)
        };
        move_before(&mut drag.preview, drag.moved, before);
        let moved = drag.moved;
        self.place_cursor_on(moved);
    }

    /// Mouse drag: reposition the preview for a pointer on terminal row `row`
    pub fn drag_to_row(&mut self, row: u16) {
        let inner = self.list_inner;
        let offset = self.list_offset;
        let Some(drag) = &mut self.drag else {
            return;
        };

        let rows: Vec<RowBox> = drag
            .preview
            .iter()
            .enumerate()
            .map(|(i, t)| RowBox {
                id: t.id,
                top: inner.y as f64 + i as f64 - offset as f64,
                height: 1.0,
            })
            .collect();
        let before = drop_target(&rows, drag.moved, row as f64);
        move_before(&mut drag.preview, drag.moved, before);
        let moved = drag.moved;
        self.place_cursor_on(moved);
    }

    /// Commit the drag as a single reorder
    pub fn drop_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.ui_mode = UiMode::Normal;

        let Some(index) = drag.preview.iter().position(|t| t.id == drag.moved) else {
            return;
        };
        let before = drag.preview.get(index + 1).map(|t| t.id);
        let result = self.session.drag_reorder(drag.moved, before);
        self.report(result);
        self.place_cursor_on(drag.moved);
    }

    /// Abandon the drag; the list stays as it was
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.ui_mode = UiMode::Normal;
            // Cursor follows the task back to where it started
            if let Some(pos) = self.session.tasks().iter().position(|t| t.id == drag.moved) {
                self.cursor = pos;
            }
        }
    }

    /// Whether a terminal cell falls inside the list pane
    pub fn in_list_area(&self, column: u16, row: u16) -> bool {
        let inner = self.list_inner;
        column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height
    }

    /// Map a terminal row to a list index, if it falls on a task
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.in_list_area(column, row) {
            return None;
        }
        let index = (row - self.list_inner.y) as usize + self.list_offset;
        (index < self.visible_tasks().len()).then_some(index)
    }

    /// Keep the cursor row inside a viewport of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.list_offset {
            self.list_offset = self.cursor;
        } else if self.cursor >= self.list_offset + height {
            self.list_offset = self.cursor + 1 - height;
        }
    }
}
