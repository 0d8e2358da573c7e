//! Tally store: durable cache for counting progress.
mod blob;
mod progress;

pub use blob::{ensure_cache_dir, BlobStore, FileStore, StoreError};
pub use progress::{load_progress, save_progress};
