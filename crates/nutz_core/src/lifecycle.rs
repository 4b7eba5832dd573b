//! Scoped engine access: one open file, one transaction, always closed.

use crate::config::StoreConfig;
use crate::error::CoreResult;
use nutz_storage::{Engine, Transaction, TxMode};
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

type FileLock = Arc<ReentrantMutex<()>>;

/// One lock per backing file, shared by every session in the process.
static FILE_LOCKS: Mutex<BTreeMap<PathBuf, FileLock>> = Mutex::new(BTreeMap::new());

/// Returns the in-process lock for the file at `path`.
///
/// The engine refuses a second open of a file that is already open instead
/// of waiting for it, so callers queue here first. The parent directory is
/// canonicalized when it exists, so `dir/./a.db` and `dir/a.db` share a lock.
fn file_lock(path: &Path) -> FileLock {
    let key = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let dir = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            std::fs::canonicalize(dir).map_or_else(|_| path.to_path_buf(), |dir| dir.join(name))
        }
        _ => path.to_path_buf(),
    };
    Arc::clone(FILE_LOCKS.lock().entry(key).or_default())
}

/// Opens the backing file, runs `body` inside one transaction, and closes
/// the file again.
///
/// The transaction is committed when `body` succeeds and rolled back when
/// it fails. The engine handle is released on every exit path, including
/// a panic inside `body`. If the file cannot be opened, `body` is never
/// invoked.
///
/// Calls for the same file from different threads run one after another.
/// A nested call for the same file from inside `body` does not block; it
/// fails to open the file instead.
///
/// # Errors
///
/// Returns the open failure, the body's own error unchanged, or the commit
/// failure.
pub fn with_transaction<T, F>(config: &StoreConfig, mode: TxMode, body: F) -> CoreResult<T>
where
    F: FnOnce(&mut Transaction) -> CoreResult<T>,
{
    let lock = file_lock(config.path());
    let _guard = lock.lock();
    trace!(path = %config.path().display(), "file lock acquired");

    let engine = Engine::open(config.path(), config.file_mode, &config.engine)?;
    let mut txn = engine.begin(mode)?;

    match body(&mut txn) {
        Ok(value) => {
            txn.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback() {
                debug!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}
