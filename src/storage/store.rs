//! Key-value stores.
//!
//! Repositories only need `get`/`put`/`list`/`delete` on string keys holding
//! JSON text. `MemoryStore` backs tests; `FileStore` keeps one `<key>.json`
//! file per key in a directory on the local device.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageError;

/// String-keyed store of JSON documents.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// All keys currently stored, sorted.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Remove `key`. Returns whether it existed.
    fn delete(&mut self, key: &str) -> Result<bool, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        (**self).list()
    }

    fn delete(&mut self, key: &str) -> Result<bool, StorageError> {
        (**self).delete(key)
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<_> = self.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn delete(&mut self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// Directory-backed store, one `<key>.json` file per key.
///
/// Keys are restricted to ASCII letters, digits, `-`, `_` and `.` so they
/// always map to a file inside the directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory backing this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path(key)?;
        // Write to a sibling file first so a crash never leaves half a document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::Io {
                key: key.to_owned(),
                source,
            })
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let io_err = |source| StorageError::Io {
            key: self.dir.display().to_string(),
            source,
        };

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let name = entry.map_err(io_err)?.file_name();
            if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                keys.push(key.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&mut self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// Read a JSON document, treating every failure as the default value.
///
/// Missing keys are silent; I/O errors and corrupt JSON are logged.
pub(crate) fn read_json_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return T::default(),
        Err(err) => {
            warn!(key, error = %err, "store read failed, using defaults");
            return T::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|source| {
        let err = StorageError::Json {
            key: key.to_owned(),
            source,
        };
        warn!(key, error = %err, "stored data is corrupt, using defaults");
        T::default()
    })
}

/// Serialize `value` as JSON under `key`.
pub(crate) fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })?;
    debug!(key, bytes = text.len(), "writing store entry");
    store.put(key, text)
}
