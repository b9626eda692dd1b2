pub mod counters;
pub mod enums;
pub mod error;
pub mod task;

pub use counters::Counters;
pub use enums::{SortDirection, Theme, UiMode};
pub use error::TaskError;
pub use task::{same_name, Task, TaskId, TaskRecord};
