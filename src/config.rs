use crate::persistence::{ensure_dir, get_data_dir, log_file, storage_file, FileStorage, KeyValueStore, MemoryStorage};
use anyhow::Result;
use std::path::PathBuf;

/// Runtime settings resolved from command-line flags and the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding storage.json and the log file
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing is read from or written to disk
    pub ephemeral: bool,
}

impl Config {
    /// An explicit directory wins; otherwise the nearest .tasklane up the tree, then ~/.tasklane
    pub fn resolve(dir: Option<PathBuf>, ephemeral: bool) -> Result<Self> {
        let data_dir = match dir {
            Some(dir) => dir,
            None => get_data_dir()?,
        };
        Ok(Self { data_dir, ephemeral })
    }

    pub fn storage_path(&self) -> PathBuf {
        storage_file(&self.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        log_file(&self.data_dir)
    }

    /// Open the configured storage backend, creating the data directory if needed
    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStore>> {
        if self.ephemeral {
            return Ok(Box::new(MemoryStorage::new()));
        }
        ensure_dir(&self.data_dir)?;
        Ok(Box::new(FileStorage::open(self.storage_path())?))
    }
}
