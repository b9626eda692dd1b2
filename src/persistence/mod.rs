pub mod files;
pub mod snapshot;
pub mod storage;

pub use files::{ensure_dir, get_data_dir, init_local_dir, log_file, storage_file};
pub use snapshot::{load_snapshot, load_theme, save_snapshot, save_theme, Snapshot};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
