use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a task for the lifetime of a session.
///
/// Ids are never written to storage; they are regenerated when a snapshot is
/// loaded. Display text can change under a task, its id cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for log lines
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

/// A single entry of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, non-empty display text
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(text: String) -> Self {
        Self::with_state(text, false)
    }

    pub fn with_state(text: String, completed: bool) -> Self {
        Self {
            id: TaskId::new(),
            text,
            completed,
        }
    }

    /// Case-insensitive name comparison used for uniqueness checks
    pub fn has_name(&self, other: &str) -> bool {
        same_name(&self.text, other)
    }

    /// Flip the completed flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            text: self.text.clone(),
            completed: self.completed,
        }
    }
}

/// Stored form of a task: `{ "text": ..., "completed": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Whether two names collide under the uniqueness rule
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
