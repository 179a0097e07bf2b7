//! Durable local store
//!
//! Key-value persistence for the shelf collection and the session record,
//! scoped to the user's data directory. Uses atomic writes (write to temp
//! file, then rename) to prevent corruption.
//!
//! Files:
//! - `library.json` - the serialized `ShelfState` blob
//! - `session.json` - the optional `Session` record
//!
//! The "reconciliation already reloaded" marker is process-lifetime state
//! kept on the store itself, never written to disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::config::Config;
use crate::models::{Session, ShelfState};

use super::error::{StorageError, StorageResult};

/// Persistence layer for shelf state and session
pub struct LocalStore {
    config: Config,
    /// Set once per process when a reconciliation has already triggered a
    /// view reload; never cleared within the session.
    reload_marker: AtomicBool,
}

impl LocalStore {
    /// Create a new store over the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            reload_marker: AtomicBool::new(false),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if shelf state exists on disk
    pub fn exists(&self) -> bool {
        self.config.library_path().exists()
    }

    /// Load the shelf state
    ///
    /// Absent or malformed stored data is discarded and replaced with a
    /// fresh empty state. This never fails: without readable local data,
    /// the caller starts from an empty library rather than an error.
    pub fn load_shelves(&self) -> ShelfState {
        let path = self.config.library_path();

        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ShelfState::new(),
            Err(e) => {
                warn!("Could not read shelf state from {:?}: {}", path, e);
                return ShelfState::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Discarding malformed shelf state at {:?}: {}",
                    path, e
                );
                ShelfState::new()
            }
        }
    }

    /// Save the shelf state using an atomic write
    pub fn save_shelves(&self, state: &ShelfState) -> StorageResult<()> {
        let path = self.config.library_path();
        let bytes = serde_json::to_vec_pretty(state).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        atomic_write(&path, &bytes)
    }

    /// Load the session record, if one exists
    ///
    /// A malformed record is treated the same as an absent one.
    pub fn load_session(&self) -> Option<Session> {
        let path = self.config.session_path();
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding malformed session record at {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save the session record
    pub fn save_session(&self, session: &Session) -> StorageResult<()> {
        let path = self.config.session_path();
        let bytes = serde_json::to_vec(session).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        atomic_write(&path, &bytes)
    }

    /// Remove the session record
    pub fn clear_session(&self) -> StorageResult<()> {
        let path = self.config.session_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path))?;
        }
        Ok(())
    }

    /// Whether a reconciliation has already triggered a reload this session
    pub fn reload_marker(&self) -> bool {
        self.reload_marker.load(Ordering::SeqCst)
    }

    /// Set the reload marker; there is no way to clear it within a session
    pub fn set_reload_marker(&self) {
        self.reload_marker.store(true, Ordering::SeqCst);
    }

    /// Delete all stored data (shelves and session)
    ///
    /// Use with caution!
    pub fn delete_all(&self) -> StorageResult<()> {
        for path in [self.config.library_path(), self.config.session_path()] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path.clone()))?;
            }
        }
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
