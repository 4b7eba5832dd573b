//! Namespace resolution.
//!
//! Walks a chain of bucket names inside an open transaction, one level at a
//! time, either strictly (every bucket must already exist) or creating the
//! buckets that are missing. Both policies share a single walk. Nothing here
//! reads or writes keys.

use crate::error::{CoreError, CoreResult};
use crate::path::NamespacePath;
use nutz_storage::{Bucket, Transaction};
use tracing::trace;

/// How a walk treats buckets that do not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Every bucket must exist. The first missing one aborts the walk.
    Strict,
    /// Missing buckets are created, existing ones are reused.
    CreateMissing,
}

/// Opens the top-level bucket `name`.
///
/// # Errors
///
/// Returns [`CoreError::NamespaceNotFound`] at position 0 when walking
/// strictly and the bucket is missing, or [`CoreError::Engine`] if the
/// engine fails.
pub fn open_root(txn: &mut Transaction, name: &str, walk: Walk) -> CoreResult<Bucket> {
    step(txn, None, name, walk)
}

/// Walks `path` below `root` and returns the last bucket reached.
///
/// An empty `path` returns `root` unchanged.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] for an empty name,
/// [`CoreError::NamespaceNotFound`] for the first missing bucket of a strict
/// walk (no later segment is looked at), or [`CoreError::Engine`] if the
/// engine fails.
pub fn resolve<S>(txn: &mut Transaction, root: Bucket, path: &[S], walk: Walk) -> CoreResult<Bucket>
where
    S: AsRef<str>,
{
    path.iter()
        .try_fold(root, |parent, name| step(txn, Some(&parent), name.as_ref(), walk))
}

/// Opens the root of `path` and walks its nested buckets.
///
/// # Errors
///
/// Same as [`open_root`] followed by [`resolve`].
pub fn resolve_chain(txn: &mut Transaction, path: &NamespacePath, walk: Walk) -> CoreResult<Bucket> {
    let root = open_root(txn, path.root(), walk)?;
    resolve(txn, root, path.nested(), walk)
}

fn step(txn: &mut Transaction, parent: Option<&Bucket>, name: &str, walk: Walk) -> CoreResult<Bucket> {
    // The parent's depth is the position of `name` in the full chain.
    let position = parent.map_or(0, Bucket::depth);
    if name.is_empty() {
        return Err(CoreError::invalid_argument(format!(
            "namespace name at position {position} must not be empty"
        )));
    }

    let bucket = match walk {
        Walk::CreateMissing => txn.create_bucket_if_not_exists(parent, name)?,
        Walk::Strict => txn
            .bucket(parent, name)?
            .ok_or_else(|| CoreError::namespace_not_found(name, position))?,
    };
    trace!(name, position, "namespace resolved");
    Ok(bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use nutz_storage::{Engine, EngineOptions, TxMode};
    use tempfile::{tempdir, TempDir};

    fn open_engine() -> (TempDir, Engine) {
        let dir = tempdir().unwrap();
        let engine = Engine::open(&dir.path().join("resolve.db"), 0o600, &EngineOptions::default())
            .unwrap();
        (dir, engine)
    }

    fn seed(engine: &Engine, root: &str, nested: &[&str]) {
        let mut txn = engine.begin(TxMode::Write).unwrap();
        let path = NamespacePath::new(root, nested).unwrap();
        resolve_chain(&mut txn, &path, Walk::CreateMissing).unwrap();
        txn.commit().unwrap();
    }

    #[test]
    fn empty_path_returns_root() {
        let (_dir, engine) = open_engine();
        let mut txn = engine.begin(TxMode::Write).unwrap();
        let root = open_root(&mut txn, "base", Walk::CreateMissing).unwrap();

        let resolved = resolve::<&str>(&mut txn, root.clone(), &[], Walk::Strict).unwrap();
        assert_eq!(resolved, root);
    }

    #[test]
    fn create_walk_builds_chain() {
        let (_dir, engine) = open_engine();
        seed(&engine, "base", &["a", "b"]);

        let mut txn = engine.begin(TxMode::Read).unwrap();
        let path = NamespacePath::new("base", &["a", "b"]).unwrap();
        let bucket = resolve_chain(&mut txn, &path, Walk::Strict).unwrap();
        assert_eq!(bucket.path(), &["base", "a", "b"]);
    }

    #[test]
    fn create_walk_is_idempotent() {
        let (_dir, engine) = open_engine();
        seed(&engine, "base", &["a", "b"]);
        seed(&engine, "base", &["a", "b"]);
        seed(&engine, "base", &["a", "b", "c"]);

        let mut txn = engine.begin(TxMode::Read).unwrap();
        let path = NamespacePath::new("base", &["a", "b", "c"]).unwrap();
        assert!(resolve_chain(&mut txn, &path, Walk::Strict).is_ok());
    }

    #[test]
    fn strict_walk_missing_root() {
        let (_dir, engine) = open_engine();
        let mut txn = engine.begin(TxMode::Read).unwrap();

        let err = open_root(&mut txn, "base", Walk::Strict).unwrap_err();
        match err {
            CoreError::NamespaceNotFound { name, position } => {
                assert_eq!(name, "base");
                assert_eq!(position, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_walk_reports_first_missing_segment() {
        let (_dir, engine) = open_engine();
        seed(&engine, "base", &["a", "b"]);

        let mut txn = engine.begin(TxMode::Read).unwrap();
        let path = NamespacePath::new("base", &["a", "x", "y"]).unwrap();
        let err = resolve_chain(&mut txn, &path, Walk::Strict).unwrap_err();
        match err {
            CoreError::NamespaceNotFound { name, position } => {
                assert_eq!(name, "x");
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_walk_rejects_wrong_order() {
        let (_dir, engine) = open_engine();
        seed(&engine, "base", &["a", "b"]);

        let mut txn = engine.begin(TxMode::Read).unwrap();
        let path = NamespacePath::new("base", &["b", "a"]).unwrap();
        let err = resolve_chain(&mut txn, &path, Walk::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NamespaceNotFound);
    }

    #[test]
    fn strict_walk_in_write_transaction_never_creates() {
        let (_dir, engine) = open_engine();
        {
            let mut txn = engine.begin(TxMode::Write).unwrap();
            let path = NamespacePath::new("base", &["a"]).unwrap();
            assert!(resolve_chain(&mut txn, &path, Walk::Strict).is_err());
            txn.commit().unwrap();
        }

        let txn = engine.begin(TxMode::Read).unwrap();
        assert!(txn.bucket(None, "base").unwrap().is_none());
    }

    #[test]
    fn empty_segment_is_invalid() {
        let (_dir, engine) = open_engine();
        let mut txn = engine.begin(TxMode::Write).unwrap();
        let root = open_root(&mut txn, "base", Walk::CreateMissing).unwrap();

        let err = resolve(&mut txn, root, &["a", ""], Walk::CreateMissing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn create_walk_in_read_transaction_fails() {
        let (_dir, engine) = open_engine();
        let mut txn = engine.begin(TxMode::Read).unwrap();

        let err = open_root(&mut txn, "base", Walk::CreateMissing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
    }
}
