use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Easy alias for storage results
pub type Result<T> = std::result::Result<T, Error>;

/// Problems talking to a storage backend.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't read or write the backing file, for example because of
    /// permissions.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Values couldn't be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key/value store, the same shape as browser local storage. Every
/// call goes straight to the backend; implementations must not cache reads
/// across calls.
pub trait Storage {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is fine.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    /// Everything stored so far
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk. The file is read on every
/// `get` and rewritten in full on every change.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Where the JSON object lives
    path: PathBuf,
}

impl FileStorage {
    /// Name of the file we keep inside the data directory.
    pub const FILE_NAME: &'static str = "storage.json";

    /// Use `storage.json` inside `data_dir`. Nothing is touched on disk until
    /// the first write.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(Self::FILE_NAME),
        }
    }

    /// Where the values are kept.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole object. A missing file is an empty store, and so is one
    /// that isn't a JSON object of strings; the next write replaces it.
    fn read_all(&self) -> Result<HashMap<String, String>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(values) => Ok(values),
            Err(err) => {
                tracing::warn!(?err, path = ?self.path, "storage file is malformed; treating as empty");
                Ok(HashMap::new())
            }
        }
    }

    /// Replace the whole object.
    fn write_all(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, data)?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, path = ?self.path, "writing value");

        let mut values = self.read_all()?;
        values.insert(key.to_owned(), value.to_owned());
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.read_all()?;

        if values.remove(key).is_some() {
            tracing::debug!(key, path = ?self.path, "removing value");
            self.write_all(&values)?;
        }

        Ok(())
    }
}
