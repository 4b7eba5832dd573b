//! Opening and closing the backing file.

use crate::error::StorageResult;
use crate::options::EngineOptions;
use crate::transaction::{Transaction, TxMode};
use redb::{Builder, Database, Durability};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An open handle on the embedded engine's backing file.
///
/// The file stays locked for as long as the `Engine` is alive and is
/// released when it is dropped. Nothing in this crate caches an `Engine`;
/// callers are expected to open one per unit of work.
///
/// # Example
///
/// ```rust
/// use nutz_storage::{Engine, EngineOptions, TxMode};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("data.db");
///
/// let engine = Engine::open(&path, 0o600, &EngineOptions::default()).unwrap();
/// let mut txn = engine.begin(TxMode::Write).unwrap();
/// let bucket = txn.create_bucket_if_not_exists(None, "base").unwrap();
/// txn.put(&bucket, "k", b"v").unwrap();
/// txn.commit().unwrap();
/// ```
pub struct Engine {
    path: PathBuf,
    db: Database,
    sync_on_commit: bool,
}

impl Engine {
    /// Opens the backing file at `path`.
    ///
    /// When the file is created, it gets the unix permission bits in `mode`.
    /// An existing file keeps its permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file doesn't exist and `create_if_missing` is false
    /// - The file cannot be opened (permissions, missing directory)
    /// - The file exists but is not a valid database
    pub fn open(path: &Path, mode: u32, options: &EngineOptions) -> StorageResult<Self> {
        let file = open_file(path, mode, options.create_if_missing)?;

        let mut builder = Builder::new();
        if let Some(bytes) = options.cache_size {
            builder.set_cache_size(bytes);
        }
        let db = builder.create_file(file)?;

        debug!(path = %path.display(), "engine opened");
        Ok(Self {
            path: path.to_path_buf(),
            db,
            sync_on_commit: options.sync_on_commit,
        })
    }

    /// Begins a transaction in the given mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot start the transaction.
    pub fn begin(&self, mode: TxMode) -> StorageResult<Transaction> {
        trace!(?mode, "begin transaction");
        match mode {
            TxMode::Read => Ok(Transaction::read(self.db.begin_read()?)),
            TxMode::Write => {
                let mut txn = self.db.begin_write()?;
                if !self.sync_on_commit {
                    txn.set_durability(Durability::Eventual);
                }
                Ok(Transaction::write(txn))
            }
        }
    }

    /// Returns the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("path", &self.path)
            .field("sync_on_commit", &self.sync_on_commit)
            .finish_non_exhaustive()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "engine closed");
    }
}

/// Removes the backing file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be removed, including when it
/// does not exist.
pub fn remove_file(path: &Path) -> StorageResult<()> {
    std::fs::remove_file(path)?;
    debug!(path = %path.display(), "backing file removed");
    Ok(())
}

fn open_file(path: &Path, mode: u32, create: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(create).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let engine = Engine::open(&path, 0o600, &EngineOptions::default()).unwrap();
        assert_eq!(engine.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn open_missing_without_create_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");
        let options = EngineOptions::new().create_if_missing(false);

        let result = Engine::open(&path, 0o600, &options);
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.db");

        let result = Engine::open(&path, 0o600, &EngineOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn open_garbage_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![0xAB; 8192]).unwrap();

        let result = Engine::open(&path, 0o600, &EngineOptions::default());
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn open_applies_mode_on_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("mode.db");

        drop(Engine::open(&path, 0o600, &EngineOptions::default()).unwrap());

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn reopen_sees_committed_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let options = EngineOptions::default();

        {
            let engine = Engine::open(&path, 0o600, &options).unwrap();
            let mut txn = engine.begin(TxMode::Write).unwrap();
            let bucket = txn.create_bucket_if_not_exists(None, "base").unwrap();
            txn.put(&bucket, "k", b"v").unwrap();
            txn.commit().unwrap();
        }

        let engine = Engine::open(&path, 0o600, &options).unwrap();
        let txn = engine.begin(TxMode::Read).unwrap();
        let bucket = txn.bucket(None, "base").unwrap().unwrap();
        assert_eq!(txn.get(&bucket, "k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn remove_file_deletes_backing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.db");
        drop(Engine::open(&path, 0o600, &EngineOptions::default()).unwrap());

        remove_file(&path).unwrap();
        assert!(!path.exists());
        assert!(matches!(remove_file(&path), Err(StorageError::Io(_))));
    }
}
