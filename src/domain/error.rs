use thiserror::Error;

/// Rejections raised by list operations.
///
/// Every variant is raised before anything is mutated, so the list and its
/// original order are unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The trimmed name was empty
    #[error("Task name cannot be empty.")]
    EmptyName,

    /// Another task already uses this name (case-insensitive)
    #[error("This task already exists: {0}")]
    Duplicate(String),

    /// The referenced task is no longer in the list
    #[error("Task not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(TaskError::EmptyName.to_string(), "Task name cannot be empty.");
        assert_eq!(
            TaskError::Duplicate("Milk".to_string()).to_string(),
            "This task already exists: Milk"
        );
    }
}
