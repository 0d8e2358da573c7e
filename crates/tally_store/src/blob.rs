use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache directory missing or not writable: {0}")]
    CacheDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Pluggable key-value blob store behind the durable cache.
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`; `None` if nothing was stored yet.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Durably replaces the blob stored under `key`.
    fn write(&self, key: &str, content: &str) -> Result<(), StoreError>;
}

/// Ensure the cache directory exists; create if missing.
pub fn ensure_cache_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::CacheDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::CacheDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::CacheDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| StoreError::CacheDir(e.to_string()))?;
    Ok(())
}

/// File-backed store keeping one `{key}.ron` blob per cache identifier.
/// Writes go to a temp file first and land via rename, so a crash mid-write
/// leaves the previous blob intact.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.ron"))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.blob_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, content: &str) -> Result<(), StoreError> {
        ensure_cache_dir(&self.dir)?;

        let target = self.blob_path(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing blob if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}
