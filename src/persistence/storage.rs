use super::files::{atomic_write, backup_file, read_file};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable string key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Write several keys as one durable update
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and `--ephemeral` runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys live in one JSON object file, rewritten atomically on every update
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file, treating a missing or empty file as empty storage.
    ///
    /// A file that is not a JSON object of strings is backed up and then
    /// treated as empty, so the next write cannot destroy it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;

        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    let backup = backup_file(&path)?;
                    warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        "storage file is unreadable, starting empty: {}",
                        e
                    );
                    BTreeMap::new()
                }
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "opened storage");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize storage")?;
        atomic_write(&self.path, &json)
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        self.flush()
    }
}
