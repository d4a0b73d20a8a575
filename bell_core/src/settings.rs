// Persisted key-value settings. Each namespace holds one typed, versioned
// settings object which is always read and written as a whole: the last
// writer wins.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::{Error, Result};

/// Raw storage backend: namespace -> JSON object.
pub trait SettingsStore: Send + Sync {
    fn fetch(&self, namespace: &str) -> Result<Option<Value>>;
    fn push(&self, namespace: &str, value: Value) -> Result<()>;
}

/// A settings object owned by one namespace.
pub trait Settings: Serialize + DeserializeOwned + Default {
    const NAMESPACE: &'static str;
    /// Current layout version. Stored objects with another version are rejected.
    const VERSION: u32;
}

/// Fetch typed settings, falling back to defaults when nothing is stored yet.
pub fn fetch_settings<T: Settings>(store: &dyn SettingsStore) -> Result<T> {
    Ok(fetch_stored_settings(store)?.unwrap_or_default())
}

/// Fetch typed settings without defaults.
pub fn fetch_stored_settings<T: Settings>(store: &dyn SettingsStore) -> Result<Option<T>> {
    let Some(value) = store.fetch(T::NAMESPACE)? else {
        return Ok(None);
    };

    let found = value.get("version").and_then(Value::as_u64).unwrap_or(0);
    if found != u64::from(T::VERSION) {
        return Err(Error::SettingsVersion {
            namespace: T::NAMESPACE.to_string(),
            found,
            expected: T::VERSION,
        });
    }

    serde_path_to_error::deserialize(value).map(Some).map_err(|err| Error::SettingsShape {
        namespace: T::NAMESPACE.to_string(),
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

pub fn push_settings<T: Settings>(store: &dyn SettingsStore, settings: &T) -> Result<()> {
    let mut value = serde_json::to_value(settings)?;
    if let Value::Object(map) = &mut value {
        map.insert("version".to_string(), Value::from(T::VERSION));
    }
    store.push(T::NAMESPACE, value)
}

// MARK: Stores

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: RwLock<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn fetch(&self, namespace: &str) -> Result<Option<Value>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.get(namespace).cloned())
    }

    fn push(&self, namespace: &str, value: Value) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.insert(namespace.to_string(), value);
        Ok(())
    }
}

/// All namespaces in one pretty-printed JSON file. Writes go to a sibling
/// `.tmp` file first and replace the original by rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Map::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn fetch(&self, namespace: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(namespace))
    }

    fn push(&self, namespace: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.read_all()?;
        all.insert(namespace.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.temp_path();
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(&serde_json::to_vec_pretty(&all)?)?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &self.path)?;
        tracing::debug!("Saved settings `{}` to {}", namespace, self.path.display());
        Ok(())
    }
}
