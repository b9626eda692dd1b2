use super::storage::KeyValueStore;
use crate::domain::{Task, TaskRecord, Theme};
use crate::store::TaskStore;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Storage key for the task list in display order
pub const TASKS_KEY: &str = "tasks";
/// Storage key for task names in creation order
pub const ORIGINAL_ORDER_KEY: &str = "originalOrder";
/// Storage key for the colour theme
pub const THEME_KEY: &str = "theme";

/// Durable form of the list: tasks in display order plus names in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<TaskRecord>,
    pub original_order: Vec<String>,
}

impl Snapshot {
    /// Capture a store. The original order is written with each task's
    /// current name, so renames carry over to the next session.
    pub fn from_store(store: &TaskStore) -> Self {
        let tasks = store.tasks().iter().map(Task::to_record).collect();
        let original_order = store
            .original_order()
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|t| t.text.clone())
            .collect();

        Self {
            tasks,
            original_order,
        }
    }

    /// Rebuild a store with fresh ids.
    ///
    /// Blank names and case-insensitive duplicates are dropped. Original-order
    /// names are matched to tasks by exact text, each task at most once;
    /// names that match nothing are dropped.
    pub fn into_store(self) -> TaskStore {
        let mut tasks: Vec<Task> = Vec::with_capacity(self.tasks.len());
        for record in self.tasks {
            let text = record.text.trim();
            if text.is_empty() {
                warn!("skipping stored task with an empty name");
                continue;
            }
            if tasks.iter().any(|t| t.has_name(text)) {
                warn!(text, "skipping duplicate stored task");
                continue;
            }
            tasks.push(Task::with_state(text.to_string(), record.completed));
        }

        let mut original_order = Vec::with_capacity(self.original_order.len());
        for text in &self.original_order {
            let text = text.trim();
            match tasks
                .iter()
                .find(|t| t.text == text && !original_order.contains(&t.id))
            {
                Some(task) => original_order.push(task.id),
                None => debug!(text, "dropping stale original-order entry"),
            }
        }

        TaskStore::from_parts(tasks, original_order)
    }
}

/// Decode one JSON-valued key; absent or malformed values fall back to the default
fn read_json_key<T: DeserializeOwned + Default>(storage: &dyn KeyValueStore, key: &str) -> T {
    let Some(raw) = storage.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, "ignoring malformed stored value: {}", e);
            T::default()
        }
    }
}

/// Read the snapshot. Never fails: missing or malformed data is an empty list.
pub fn load_snapshot(storage: &dyn KeyValueStore) -> Snapshot {
    let snapshot = Snapshot {
        tasks: read_json_key(storage, TASKS_KEY),
        original_order: read_json_key(storage, ORIGINAL_ORDER_KEY),
    };
    debug!(
        tasks = snapshot.tasks.len(),
        original_order = snapshot.original_order.len(),
        "loaded snapshot"
    );
    snapshot
}

/// Write both list keys in one storage update
pub fn save_snapshot(storage: &mut dyn KeyValueStore, snapshot: &Snapshot) -> Result<()> {
    let tasks = serde_json::to_string(&snapshot.tasks).context("Failed to serialize tasks")?;
    let original_order = serde_json::to_string(&snapshot.original_order)
        .context("Failed to serialize original order")?;
    storage.set_many(vec![(TASKS_KEY, tasks), (ORIGINAL_ORDER_KEY, original_order)])
}

/// Stored theme, light when absent or unrecognised
pub fn load_theme(storage: &dyn KeyValueStore) -> Theme {
    storage
        .get(THEME_KEY)
        .and_then(|raw| Theme::from_tag(&raw))
        .unwrap_or_default()
}

pub fn save_theme(storage: &mut dyn KeyValueStore, theme: Theme) -> Result<()> {
    storage.set(THEME_KEY, theme.to_tag().to_string())
}
