//! Marker storage backends.
//!
//! The file store replaces its file atomically; the previous contents stay
//! readable until a complete new file is in place.

use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::persistence::{DisconnectMarker, PersistenceError, DISCONNECT_KEY, DISCONNECT_VALUE};

/// Small JSON key-value file, rewritten on every change.
#[derive(Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
    entries: Arc<DashMap<String, String>>,
}

impl FileMarkerStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let map: HashMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                entries.insert(k, v);
            }
            tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded wallet state file");
        }

        Ok(Self {
            path,
            entries: Arc::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|r| r.value().clone())
    }

    pub fn insert(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    pub fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let map: HashMap<_, _> = self
            .entries
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let bytes = serde_json::to_vec_pretty(&map)?;

        // Sibling temp file, synced, then renamed over the target.
        let tmp = self.temp_path();
        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp, &self.path)) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "Temp state file not removed");
            }
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write wallet state file");
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DisconnectMarker for FileMarkerStore {
    fn is_set(&self) -> Result<bool, PersistenceError> {
        Ok(self.get(DISCONNECT_KEY).as_deref() == Some(DISCONNECT_VALUE))
    }

    fn set(&self) -> Result<(), PersistenceError> {
        self.insert(DISCONNECT_KEY, DISCONNECT_VALUE)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.remove(DISCONNECT_KEY)
    }
}

/// Process-local marker, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryMarker {
    set: AtomicBool,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker that starts out set, as after a previous explicit disconnect.
    pub fn preset() -> Self {
        Self {
            set: AtomicBool::new(true),
        }
    }
}

impl DisconnectMarker for MemoryMarker {
    fn is_set(&self) -> Result<bool, PersistenceError> {
        Ok(self.set.load(Ordering::SeqCst))
    }

    fn set(&self) -> Result<(), PersistenceError> {
        self.set.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.set.store(false, Ordering::SeqCst);
        Ok(())
    }
}
