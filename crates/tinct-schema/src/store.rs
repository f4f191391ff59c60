//! Theme mod stores.
//!
//! Setting instances live in an external key-value store that the rest of
//! the pipeline only reads and writes through [`ModStore`]. The store is
//! owned by the host; nothing here locks it, and concurrent writers are
//! last-write-wins per key.

use std::cell::{Ref, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StoreError;

/// The external key-value store holding setting overrides.
///
/// Methods take `&self`; implementations that hold state use interior
/// mutability, since every consumer shares one store.
pub trait ModStore {
    /// The stored value, if any.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// The stored value, or `default` when unset.
    fn get(&self, key: &str, default: Value) -> Value {
        self.get_raw(key).unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Every stored key, in insertion order.
    fn keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }
}

impl<S: ModStore + ?Sized> ModStore for &S {
    fn get_raw(&self, key: &str) -> Option<Value> {
        (**self).get_raw(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// In-memory store, for tests and previews.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_schema::{MemoryModStore, ModStore};
///
/// let store = MemoryModStore::new().with("display_archive_view", json!("full"));
/// assert_eq!(store.get("display_archive_view", json!("excerpt")), json!("full"));
/// assert_eq!(store.get("header_sticky", json!(true)), json!(true));
/// ```
#[derive(Debug, Default)]
pub struct MemoryModStore {
    values: RefCell<IndexMap<String, Value>>,
}

impl MemoryModStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, key: impl Into<String>, value: Value) -> Self {
        self.values.borrow_mut().insert(key.into(), value);
        self
    }

    /// A copy of every stored pair.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.values.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl ModStore for MemoryModStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}

/// Prefixes every key with `"{prefix}_"` before delegating.
///
/// [`keys`](ModStore::keys) only lists keys inside the namespace, with the
/// prefix stripped.
#[derive(Debug)]
pub struct NamespacedStore<S> {
    inner: S,
    prefix: String,
}

impl<S: ModStore> NamespacedStore<S> {
    pub fn new(prefix: impl Into<String>, inner: S) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}_{}", self.prefix, key)
        }
    }
}

impl<S: ModStore> ModStore for NamespacedStore<S> {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.inner.get_raw(&self.full_key(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(&self.full_key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.full_key(key))
    }

    fn keys(&self) -> Vec<String> {
        if self.prefix.is_empty() {
            return self.inner.keys();
        }
        let namespace = format!("{}_", self.prefix);
        self.inner
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&namespace).map(str::to_string))
            .collect()
    }
}

/// A store persisted as one JSON object in a file.
///
/// The file is read on open (a missing file is an empty store) and rewritten
/// after every successful `set` or `remove`.
#[derive(Debug)]
pub struct JsonFileModStore {
    path: PathBuf,
    values: RefCell<IndexMap<String, Value>>,
}

impl JsonFileModStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => IndexMap::new(),
            Ok(content) => serde_json::from_str::<IndexMap<String, Value>>(&content).map_err(
                |e| StoreError::Format {
                    path: path.clone(),
                    message: e.to_string(),
                },
            )?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened theme mods file");
        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow of the in-memory values.
    pub fn values(&self) -> Ref<'_, IndexMap<String, Value>> {
        self.values.borrow()
    }

    /// Writes the current values to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&*self.values.borrow()).map_err(|e| {
            StoreError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, body + "\n").map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl ModStore for JsonFileModStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.borrow_mut().insert(key.to_string(), value);
        self.save()
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.values.borrow_mut().shift_remove(key).is_some();
        if removed {
            self.save()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}
