//! JSON document reads and atomic writes.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{PersistenceError, Result};

/// Schema version written into every store file.
pub const SCHEMA_VERSION: u32 = 1;

/// Reads and decodes `path`; `None` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })
}

/// Rejects documents written by a newer schema.
pub fn check_version(found: u32, path: &Path) -> Result<()> {
    if found > SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found,
            max_supported: SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Encodes `value` as pretty JSON and writes it atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Serialization { source })?;
    atomic_write(path, &bytes)
}

/// Exclusive lock on a store file, held until dropped.
///
/// The lock lives on a sidecar `<name>.json.lock` file so the data file
/// itself can be replaced by rename while the lock is held. It is an OS
/// advisory lock, shared by every handle and process on the same path.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

/// Blocks until the exclusive lock for `path` is acquired.
pub fn lock_exclusive(path: &Path) -> Result<StoreLock> {
    let lock_path = path.with_extension("json.lock");
    create_parent(path)?;
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| PersistenceError::Io {
            operation: "open",
            path: lock_path.clone(),
            source: e,
        })?;
    file.lock().map_err(|e| PersistenceError::Io {
        operation: "lock",
        path: lock_path,
        source: e,
    })?;
    Ok(StoreLock { _file: file })
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

fn create_parent(path: &Path) -> Result<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
        operation: "create directory",
        path: parent.to_path_buf(),
        source: e,
    })
}

/// Writes `bytes` to a uniquely named temp file next to `path`, then
/// renames it over `path`. Readers never observe a half-written file.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    create_parent(path)?;
    let dir = parent_dir(path);

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: dir.to_path_buf(),
        source: e,
    })?;
    let temp_path = temp.path().to_path_buf();

    temp.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    temp.as_file().sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    temp.persist(path)
        .map_err(|e| PersistenceError::AtomicWriteFailed {
            temp_path,
            target_path: path.to_path_buf(),
            source: e.error,
        })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "store file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = read_json(&path).unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let back: Option<Vec<i32>> = read_json(&dir.path().join("absent.json")).unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_corrupt_file_is_deserialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = read_json::<Vec<i32>>(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Deserialization { .. }));
    }

    #[test]
    fn test_lock_is_exclusive_across_handles() {
        use std::sync::mpsc;
        use std::time::Duration;

        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let held = lock_exclusive(&path).unwrap();

        let (sent, received) = mpsc::channel();
        let waiter = {
            let path = path.clone();
            std::thread::spawn(move || {
                let _lock = lock_exclusive(&path).unwrap();
                sent.send(()).unwrap();
            })
        };
        assert!(received.recv_timeout(Duration::from_millis(200)).is_err());
        drop(held);
        received.recv_timeout(Duration::from_secs(10)).unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let err = check_version(SCHEMA_VERSION + 1, Path::new("x.json")).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
