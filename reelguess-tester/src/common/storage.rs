use reelguess_game::SessionStorage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("session file {path}: {source}")]
pub struct FileStorageError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Keeps each session snapshot in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FileStorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileStorageError {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl SessionStorage for FileStorage {
    type Error = FileStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStorageError { path, source }),
        }
    }

    fn set(&self, key: &str, snapshot: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        fs::write(&path, snapshot).map_err(|source| FileStorageError { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                Err(FileStorageError { path, source: err })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::util::temp_path;

    #[test]
    fn stores_one_file_per_key() {
        let storage = FileStorage::new(temp_path("storage")).unwrap();
        assert_eq!(storage.get("daily-2026-10-16").unwrap(), None);

        storage.set("daily-2026-10-16", "{}").unwrap();
        assert!(storage.dir().join("daily-2026-10-16.json").exists());
        assert_eq!(
            storage.get("daily-2026-10-16").unwrap().as_deref(),
            Some("{}")
        );

        storage.remove("daily-2026-10-16").unwrap();
        storage.remove("daily-2026-10-16").unwrap();
        assert_eq!(storage.get("daily-2026-10-16").unwrap(), None);
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let storage = FileStorage::new(temp_path("escape")).unwrap();
        storage.set("../outside", "x").unwrap();
        assert!(storage.dir().join("___outside.json").exists());
    }
}
