use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage io failed for key {key:?}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Minimal string key/value persistence used by the balance store.
pub trait State {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn insert(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: State + ?Sized> State for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn insert(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).insert(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

/// In-process state; lost when dropped.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    state: HashMap<String, String>,
}

impl State for Memory {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.state.get(key).cloned())
    }

    fn insert(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.state.remove(key);
        Ok(())
    }
}

/// Directory-backed state storing one file per key.
///
/// Writes go through a temporary sibling file and a rename so a crash mid-write never
/// leaves a truncated value behind.
#[derive(Clone, Debug)]
pub struct FileState {
    dir: PathBuf,
}

impl FileState {
    /// Open (and create if needed) a state directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl State for FileState {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn insert(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value.as_bytes()).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
