//! Namespaced string key/value persistence.
//!
//! A namespace is always written as a whole, so readers never observe a
//! half-updated record.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use linesdk_domain::{LineSdkError, Result};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::InfraError;

type Namespaces = BTreeMap<String, BTreeMap<String, String>>;

/// Preference-style storage the token cache and salt live in.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// Replace every entry of `namespace` with `entries`.
    fn replace(&self, namespace: &str, entries: BTreeMap<String, String>) -> Result<()>;

    fn clear(&self, namespace: &str) -> Result<()>;
}

/// Process-local store, mostly for tests and ephemeral hosts.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    namespaces: Mutex<Namespaces>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self.namespaces.lock().get(namespace).and_then(|entries| entries.get(key)).cloned())
    }

    fn replace(&self, namespace: &str, entries: BTreeMap<String, String>) -> Result<()> {
        self.namespaces.lock().insert(namespace.to_owned(), entries);
        Ok(())
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        self.namespaces.lock().remove(namespace);
        Ok(())
    }
}

/// Store backed by one JSON file.
///
/// Every write serializes all namespaces to a uniquely named temp file in the
/// same directory and renames it over the original.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    namespaces: Mutex<Namespaces>,
}

impl JsonFileKeyValueStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let namespaces = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                LineSdkError::Internal(format!(
                    "Preference file {} is not valid JSON: {e}",
                    path.display()
                ))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Namespaces::new(),
            Err(err) => return Err(InfraError::from(err).into()),
        };
        debug!(path = %path.display(), "Opened preference file");
        Ok(Self { path, namespaces: Mutex::new(namespaces) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, namespaces: &Namespaces) -> Result<()> {
        let contents = serde_json::to_vec_pretty(namespaces)
            .map_err(|e| LineSdkError::Internal(format!("Failed to encode preferences: {e}")))?;

        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(InfraError::from)?;
                parent
            }
            None => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(parent).map_err(InfraError::from)?;
        temp.write_all(&contents).map_err(InfraError::from)?;
        temp.persist(&self.path).map_err(|e| InfraError::from(e.error))?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Namespaces)) -> Result<()> {
        let mut namespaces = self.namespaces.lock();
        let mut next = namespaces.clone();
        apply(&mut next);
        self.persist(&next)?;
        *namespaces = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self.namespaces.lock().get(namespace).and_then(|entries| entries.get(key)).cloned())
    }

    fn replace(&self, namespace: &str, entries: BTreeMap<String, String>) -> Result<()> {
        self.update(|namespaces| {
            namespaces.insert(namespace.to_owned(), entries);
        })
    }

    fn clear(&self, namespace: &str) -> Result<()> {
        self.update(|namespaces| {
            namespaces.remove(namespace);
        })
    }
}
