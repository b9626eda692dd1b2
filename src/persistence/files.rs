use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the per-project data directory
pub const DATA_DIR_NAME: &str = ".tasklane";

/// Get the data directory - checks for a local .tasklane first, then falls back to global ~/.tasklane
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find a local .tasklane directory by walking up the directory tree
fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local .tasklane directory in the current directory
pub fn init_local_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let dir = current_dir.join(DATA_DIR_NAME);

    if dir.exists() {
        anyhow::bail!("Data directory already exists: {}", dir.display());
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    Ok(dir)
}

/// Key-value storage file inside a data directory
pub fn storage_file(dir: &Path) -> PathBuf {
    dir.join("storage.json")
}

/// Log file used while the terminal UI owns the screen
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join("tasklane.log")
}

/// Replace `path` with `content` in one step: write a sibling temp file, sync
/// it, then rename it over the target
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let target = path.as_ref();
    let parent = target
        .parent()
        .with_context(|| format!("No parent directory for {}", target.display()))?;

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("Cannot stage a write in {}", parent.display()))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .with_context(|| format!("Cannot write staged copy of {}", target.display()))?;
    staged
        .persist(target)
        .with_context(|| format!("Cannot replace {}", target.display()))?;

    Ok(())
}

/// Whole file as a string; a file that does not exist reads as empty
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
    }
}

/// Copy a file aside with a timestamp suffix, e.g. `storage.json.bak.20240101_120000`
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = path
        .file_name()
        .context("File path has no file name")?
        .to_string_lossy();
    let backup_path = path.with_file_name(format!("{}.bak.{}", file_name, timestamp));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to backup file: {}", path.display()))?;

    Ok(backup_path)
}
