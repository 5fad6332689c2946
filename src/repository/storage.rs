//! Key/value storage backends for the session
//!
//! The storage plays the part of the browser's local storage: string keys to
//! string values, read once when the process starts and written through on
//! every mutation. Nothing watches the backend for outside changes.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use parking_lot::RwLock;

use crate::{
    config::{SessionConfig, StorageBackend},
    error::{AppError, AppResult},
};

/// String key/value storage
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// Process-local storage, lost on restart
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage prefilled with the given entries
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// Storage kept as a JSON object in a single file.
///
/// The file is read once by [`FileStorage::open`]; every mutation rewrites it.
/// A failed write leaves the cached map as it was before the call.
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        "Storage file {} is not a JSON object, starting empty: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened storage {} ({} keys)", path.display(), items.len());

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| AppError::Internal(format!("Failed to encode storage: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> AppResult<()> {
        let mut items = self.items.write();
        let mut next = items.clone();
        apply(&mut next);
        self.flush(&next)?;
        *items = next;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.mutate(|items| {
            items.remove(key);
        })
    }
}

/// Build the configured storage backend
pub fn open_storage(config: &SessionConfig) -> AppResult<Arc<dyn KeyValueStorage>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Session storage: memory");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::File => {
            tracing::info!("Session storage: {}", config.path);
            Ok(Arc::new(FileStorage::open(&config.path)?))
        }
    }
}
