//! Newsletter discovery cache
//!
//! Remembers the newsletters returned by the last discovery as one JSON array
//! on disk. Reads never fail: a missing or unreadable file is an empty cache.
//! Writes go to a fresh temp file in the cache's directory which is then
//! renamed over the cache, under an exclusive lock on a `.lock` sidecar, so
//! readers see either the previous list or the new one. The sidecar is never
//! removed: every writer must lock the same inode.

use crate::error::AppError;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct NewsletterCache {
    path: PathBuf,
    // Serializes writers inside this process; the lock file covers other processes.
    write_guard: Arc<Mutex<()>>,
}

impl NewsletterCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load cached newsletter references in stored order
    pub fn load(&self) -> Vec<String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No newsletter cache at {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read newsletter cache {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&data) {
            Ok(newsletters) => {
                debug!("Loaded {} cached newsletters", newsletters.len());
                newsletters
            }
            Err(e) => {
                warn!("Ignoring malformed newsletter cache {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Overwrite the cache with `newsletters`
    pub fn save(&self, newsletters: &[String]) -> Result<(), AppError> {
        let _guard = self.write_guard.lock().unwrap_or_else(|e| e.into_inner());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(newsletters)
            .map_err(|e| AppError::CacheError(format!("Failed to serialize cache: {}", e)))?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(sidecar(&self.path, "lock"))?;
        lock_file.lock_exclusive()?;

        let written = self.replace_contents(&dir, &json);
        lock_file.unlock()?;

        written.map_err(|e| AppError::CacheError(format!("Failed to write {}: {}", self.path.display(), e)))?;

        info!("Cached {} newsletters to {}", newsletters.len(), self.path.display());
        Ok(())
    }

    // Caller holds the lock. The temp file is removed on drop if persisting fails.
    fn replace_contents(&self, dir: &Path, json: &str) -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// [`load`](Self::load) on the blocking pool
    pub async fn load_async(&self) -> Vec<String> {
        let cache = self.clone();
        match tokio::task::spawn_blocking(move || cache.load()).await {
            Ok(newsletters) => newsletters,
            Err(e) => {
                warn!("Newsletter cache read task failed: {}", e);
                Vec::new()
            }
        }
    }

    /// [`save`](Self::save) on the blocking pool, so a contended lock does not stall the runtime
    pub async fn save_async(&self, newsletters: Vec<String>) -> Result<(), AppError> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.save(&newsletters))
            .await
            .map_err(|e| AppError::Internal(format!("Cache write task failed: {}", e)))?
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
