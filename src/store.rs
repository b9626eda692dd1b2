use crate::domain::{same_name, Counters, SortDirection, Task, TaskError, TaskId};
use crate::ordering;
use std::collections::HashSet;

/// Outcome of a rename that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// The trimmed name was identical to the current one
    Unchanged,
}

/// In-memory list state: display order, original order and session tallies.
///
/// Every mutating method validates its input before touching anything, so a
/// returned error always leaves the store as it was.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    /// Current display order
    tasks: Vec<Task>,
    /// Ids in creation order, used only by `reset`
    original_order: Vec<TaskId>,
    deleted_count: usize,
    edited_count: usize,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-validated parts (used when rehydrating)
    pub fn from_parts(tasks: Vec<Task>, original_order: Vec<TaskId>) -> Self {
        Self {
            tasks,
            original_order,
            deleted_count: 0,
            edited_count: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn original_order(&self) -> &[TaskId] {
        &self.original_order
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Find a task by name: exact match first, then case-insensitive
    pub fn find_by_text(&self, text: &str) -> Option<&Task> {
        let text = text.trim();
        self.tasks
            .iter()
            .find(|t| t.text == text)
            .or_else(|| self.tasks.iter().find(|t| t.has_name(text)))
    }

    /// Whether any task other than `except` uses this name
    fn name_taken(&self, text: &str, except: Option<TaskId>) -> bool {
        self.tasks
            .iter()
            .any(|t| Some(t.id) != except && same_name(&t.text, text))
    }

    pub fn counters(&self) -> Counters {
        Counters::compute(&self.tasks, self.deleted_count, self.edited_count)
    }

    /// Append a new task at the end of the display order
    pub fn create(&mut self, text: &str) -> Result<TaskId, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyName);
        }
        if self.name_taken(text, None) {
            return Err(TaskError::Duplicate(text.to_string()));
        }

        let task = Task::new(text.to_string());
        let id = task.id;
        self.tasks.push(task);
        self.original_order.push(id);
        Ok(id)
    }

    /// Rename a task in place. A change of letter case only is allowed.
    pub fn rename(&mut self, id: TaskId, new_text: &str) -> Result<RenameOutcome, TaskError> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(TaskError::EmptyName);
        }
        let index = self.position(id).ok_or(TaskError::NotFound)?;
        if self.tasks[index].text == new_text {
            return Ok(RenameOutcome::Unchanged);
        }
        if self.name_taken(new_text, Some(id)) {
            return Err(TaskError::Duplicate(new_text.to_string()));
        }

        self.tasks[index].text = new_text.to_string();
        self.edited_count += 1;
        Ok(RenameOutcome::Renamed)
    }

    /// Flip the completed flag, returning the new value
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound)?;
        task.toggle();
        Ok(task.completed)
    }

    /// Remove one task from the list and from the original order
    pub fn delete_one(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self.position(id).ok_or(TaskError::NotFound)?;
        let task = self.tasks.remove(index);
        if let Some(pos) = self.original_order.iter().position(|o| *o == id) {
            self.original_order.remove(pos);
        }
        self.deleted_count += 1;
        Ok(task)
    }

    /// Remove every listed task that is still present.
    ///
    /// Returns the removed tasks in display order. Ids that are already gone
    /// are skipped and do not count as deletions.
    pub fn delete_selected(&mut self, ids: &HashSet<TaskId>) -> Vec<Task> {
        if ids.is_empty() {
            return Vec::new();
        }

        let (removed, kept): (Vec<Task>, Vec<Task>) =
            std::mem::take(&mut self.tasks)
                .into_iter()
                .partition(|t| ids.contains(&t.id));
        self.tasks = kept;
        self.original_order.retain(|id| !ids.contains(id));
        self.deleted_count += removed.len();
        removed
    }

    pub fn sort(&mut self, direction: SortDirection) {
        ordering::sort_by_text(&mut self.tasks, direction);
    }

    /// Restore creation order
    pub fn reset(&mut self) {
        ordering::reset_order(&mut self.tasks, &self.original_order);
    }

    /// Move a task before another (or to the end). Returns whether the order
    /// changed.
    pub fn drag_reorder(&mut self, moved: TaskId, before: Option<TaskId>) -> Result<bool, TaskError> {
        if self.position(moved).is_none() {
            return Err(TaskError::NotFound);
        }
        Ok(ordering::move_before(&mut self.tasks, moved, before))
    }
}
