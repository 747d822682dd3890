//! Key/value persistence backends for the session token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth store only ever touches one key (`authToken`). Whether a backend
//! exists at all is decided once by the host at startup; a missing backend
//! means "non-interactive context" and every persistence step is skipped.
//!
//! TRADE-OFFS
//! ==========
//! All operations are best-effort. Read failures look like a missing key and
//! write failures are logged, never surfaced to callers.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key under which the session token is persisted.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Minimal synchronous key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str);
    /// Remove `key`. Removing a missing key is a no-op.
    fn remove_item(&self, key: &str);
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Store persisted as a flat JSON object in a single file.
///
/// Every call re-reads the file so separate processes sharing the path see
/// each other's writes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable store file");
                BTreeMap::new()
            }
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "store directory create failed");
                    return;
                }
            }
        }
        let raw = match serde_json::to_string_pretty(items) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "store encode failed");
                return;
            }
        };
        if let Err(e) = write_private(&self.path, raw.as_bytes()) {
            tracing::warn!(path = %self.path.display(), error = %e, "store write failed");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load();
        if apply(&mut items) {
            self.save(&items);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.update(|items| {
            items.insert(key.to_owned(), value.to_owned());
            true
        });
    }

    fn remove_item(&self, key: &str) {
        self.update(|items| items.remove(key).is_some());
    }
}

/// Replace `path` with `bytes` via a sibling temp file and a rename, so readers
/// see either the old or the new contents. On unix the file is owner-only.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("store");
    let tmp = path.with_file_name(format!(".{name}.tmp.{}", std::process::id()));

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }

    let written = options.open(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
