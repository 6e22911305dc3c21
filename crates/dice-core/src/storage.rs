#![forbid(unsafe_code)]

//! Durable key/value storage with a silent in-memory fallback.
//!
//! Three keys are persisted: the theme, the chaos level and the last loaded
//! scene. Toggle memory is deliberately not persisted; it is re-derived from
//! the restored scene instead.
//!
//! [`SafeStorage`] never surfaces an error. When the backend is missing or a
//! call fails, the value goes to (or comes from) an in-memory map and the
//! failure is logged at `warn`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::chaos::ChaosLevel;
use crate::scene::SceneConfig;
use crate::state::{AppState, RestoredState};

pub const THEME_KEY: &str = "tsDiceTheme";
pub const CHAOS_KEY: &str = "tsDiceChaos";
pub const LAST_CONFIG_KEY: &str = "tsDiceLastConfig";

const THEME_DARK: &str = "dark";
const THEME_LIGHT: &str = "light";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend is unavailable")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A durable string key/value store.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key/value pairs kept in a single JSON object on disk.
///
/// The file is read on every `get` and rewritten on every mutation, so
/// several handles on the same path stay coherent.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Storage facade that degrades to memory instead of failing.
#[derive(Default)]
pub struct SafeStorage {
    backend: Option<Box<dyn StorageBackend>>,
    fallback: HashMap<String, String>,
}

impl std::fmt::Debug for SafeStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeStorage")
            .field("has_backend", &self.backend.is_some())
            .field("fallback_keys", &self.fallback.len())
            .finish()
    }
}

impl SafeStorage {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            fallback: HashMap::new(),
        }
    }

    /// Storage with no durable backend; everything lives in memory.
    #[must_use]
    pub fn memory_only() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn using_fallback(&self) -> bool {
        self.backend.is_none()
    }

    pub fn clear_fallback(&mut self) {
        self.fallback.clear();
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(backend) = self.backend.as_ref() {
            match backend.get(key) {
                Ok(value) => return value.or_else(|| self.fallback.get(key).cloned()),
                Err(err) => {
                    tracing::warn!(key, error = %err, "storage read failed, using fallback store");
                }
            }
        }
        self.fallback.get(key).cloned()
    }

    /// Store `value`. Returns `true` when it reached the durable backend.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if let Some(backend) = self.backend.as_mut() {
            match backend.set(key, value) {
                Ok(()) => {
                    self.fallback.remove(key);
                    return true;
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "storage write failed, using fallback store");
                }
            }
        }
        self.fallback.insert(key.to_owned(), value.to_owned());
        false
    }

    pub fn remove(&mut self, key: &str) {
        if let Some(backend) = self.backend.as_mut()
            && let Err(err) = backend.remove(key)
        {
            tracing::warn!(key, error = %err, "storage remove failed, using fallback store");
        }
        self.fallback.remove(key);
    }
}

/// Write the persisted slice of `state`. Returns `true` when every key
/// reached the durable backend.
pub fn persist_state(storage: &mut SafeStorage, state: &AppState) -> bool {
    let theme = if state.ui.dark_mode {
        THEME_DARK
    } else {
        THEME_LIGHT
    };
    let mut durable = storage.set(THEME_KEY, theme);
    durable &= storage.set(CHAOS_KEY, &state.particles.chaos.to_string());
    if let Some(config) = state.particles.current.as_ref() {
        match config.to_json() {
            Ok(raw) => durable &= storage.set(LAST_CONFIG_KEY, &raw),
            Err(err) => {
                tracing::warn!(error = %err, "could not serialize scene for storage");
                durable = false;
            }
        }
    }
    durable
}

/// Read back whatever was persisted. Unreadable or invalid entries are
/// skipped individually, and a stored scene that fails to parse is removed.
#[must_use]
pub fn restore_state(storage: &mut SafeStorage) -> RestoredState {
    let dark_mode = storage.get(THEME_KEY).and_then(|raw| match raw.as_str() {
        THEME_DARK => Some(true),
        THEME_LIGHT => Some(false),
        other => {
            tracing::debug!(value = other, "ignoring unknown stored theme");
            None
        }
    });
    let chaos = storage
        .get(CHAOS_KEY)
        .and_then(|raw| ChaosLevel::parse_strict(&raw));
    let config = match storage.get(LAST_CONFIG_KEY) {
        Some(raw) => match SceneConfig::from_json_str(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(error = %err, "discarding stored scene");
                storage.remove(LAST_CONFIG_KEY);
                None
            }
        },
        None => None,
    };
    RestoredState {
        dark_mode,
        chaos,
        config,
    }
}
