use super::task::Task;

/// Derived counters shown next to the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub completed: usize,
    /// Tasks deleted since the process started
    pub deleted: usize,
    /// Renames since the process started
    pub edited: usize,
}

impl Counters {
    pub fn compute(tasks: &[Task], deleted: usize, edited: usize) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
            deleted,
            edited,
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }
}
