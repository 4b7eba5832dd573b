//! The session value returned by every façade operation.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::lifecycle::with_transaction;
use crate::ops::{self, Entries, Outcome};
use crate::path::{validate_key, NamespacePath};
use nutz_storage::{Transaction, TxMode};
use std::sync::Arc;
use tracing::{debug, debug_span};

/// Arguments handed to a custom [`Session::execute`] body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Request<'a> {
    /// Root bucket name.
    pub root: &'a str,
    /// Record key.
    pub key: &'a str,
    /// Record value.
    pub value: &'a [u8],
    /// Nested bucket names below the root, outermost first.
    pub path: &'a [&'a str],
}

impl<'a> Request<'a> {
    /// Creates a request for the root bucket `root`.
    #[must_use]
    pub const fn new(root: &'a str) -> Self {
        Self {
            root,
            key: "",
            value: &[],
            path: &[],
        }
    }

    /// Sets the record key.
    #[must_use]
    pub const fn key(mut self, key: &'a str) -> Self {
        self.key = key;
        self
    }

    /// Sets the record value.
    #[must_use]
    pub const fn value(mut self, value: &'a [u8]) -> Self {
        self.value = value;
        self
    }

    /// Sets the nested bucket names.
    #[must_use]
    pub const fn path(mut self, path: &'a [&'a str]) -> Self {
        self.path = path;
        self
    }

    /// Validates the root and nested names into a [`NamespacePath`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if any name is empty.
    pub fn namespace(&self) -> CoreResult<NamespacePath> {
        NamespacePath::new(self.root, self.path)
    }
}

/// Outcome of the last operation plus the configuration it ran against.
///
/// A `Session` is an immutable snapshot. Every operation leaves the session
/// it was called on untouched and returns a new one, so calls chain by
/// value:
///
/// ```rust
/// use nutz_core::{Session, StoreConfig};
///
/// let dir = tempfile::tempdir().unwrap();
/// let session = Session::new(StoreConfig::new(dir.path().join("data.db")));
///
/// let created = session.create("tenants", "acme", b"{}", &["users"]);
/// assert!(created.is_ok());
///
/// let fetched = created.get("tenants", "acme", &["users"]);
/// assert_eq!(fetched.payload(), Some(&b"{}"[..]));
///
/// let missing = fetched.get("tenants", "acme", &["groups"]);
/// assert!(missing.last_error().is_some());
/// assert!(missing.payload().is_none());
/// ```
///
/// No engine handle lives in a session. Each operation opens the backing
/// file, runs one transaction, and closes it again. Whenever `last_error`
/// is set, both `payload` and `enumerated` are absent.
#[derive(Debug)]
pub struct Session {
    config: Arc<StoreConfig>,
    payload: Option<Vec<u8>>,
    enumerated: Option<Entries>,
    last_error: Option<CoreError>,
}

impl Session {
    /// Creates an empty session for the given configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
            payload: None,
            enumerated: None,
            last_error: None,
        }
    }

    /// Returns the configuration this session runs against.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the bytes produced by the last operation.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Takes ownership of the payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Option<Vec<u8>> {
        self.payload
    }

    /// Returns the entries collected by the last [`Session::enumerate`].
    #[must_use]
    pub fn enumerated(&self) -> Option<&Entries> {
        self.enumerated.as_ref()
    }

    /// Takes ownership of the enumerated entries.
    #[must_use]
    pub fn into_enumerated(self) -> Option<Entries> {
        self.enumerated
    }

    /// Returns the error the last operation ended with, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    /// Returns true if the last operation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.last_error.is_none()
    }

    /// Converts the session into a `Result`, for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns the error the last operation ended with.
    pub fn into_result(self) -> CoreResult<Outcome> {
        match self.last_error {
            Some(err) => Err(err),
            None => Ok(Outcome {
                payload: self.payload,
                enumerated: self.enumerated,
            }),
        }
    }

    /// Stores `value` under `key` in the bucket chain `root > path...`,
    /// creating any bucket that is missing and replacing any existing value.
    ///
    /// On success the payload is the value read back from the store.
    #[must_use]
    pub fn create(&self, root: &str, key: &str, value: &[u8], path: &[&str]) -> Self {
        self.run("create", TxMode::Write, target(root, Some(key), path), |txn, path| {
            ops::create(txn, path, key, value)
        })
    }

    /// Fetches the value under `key` in the existing chain `root > path...`.
    ///
    /// Fails with [`CoreError::NamespaceNotFound`] or [`CoreError::KeyNotFound`].
    #[must_use]
    pub fn get(&self, root: &str, key: &str, path: &[&str]) -> Self {
        self.run("get", TxMode::Read, target(root, Some(key), path), |txn, path| {
            ops::get(txn, path, key)
        })
    }

    /// Replaces the value of an existing `key`. Never creates buckets or keys.
    ///
    /// On success the payload is the new value.
    #[must_use]
    pub fn update(&self, root: &str, key: &str, value: &[u8], path: &[&str]) -> Self {
        self.run("update", TxMode::Write, target(root, Some(key), path), |txn, path| {
            ops::update(txn, path, key, value)
        })
    }

    /// Collects every entry held directly by the bucket `root > path...`.
    #[must_use]
    pub fn enumerate(&self, root: &str, path: &[&str]) -> Self {
        self.run("enumerate", TxMode::Read, target(root, None, path), |txn, path| {
            ops::enumerate(txn, path)
        })
    }

    /// Removes `key` from the bucket `root > path...`.
    ///
    /// Removing an absent key succeeds. On success the payload is the key.
    #[must_use]
    pub fn delete(&self, root: &str, key: &str, path: &[&str]) -> Self {
        self.run("delete", TxMode::Write, target(root, Some(key), path), |txn, path| {
            ops::delete(txn, path, key)
        })
    }

    /// Runs a caller-supplied body inside one transaction of the given mode.
    ///
    /// The body receives the open transaction, the request, and this
    /// session. Its outcome is normalized like any other operation.
    ///
    /// The root and nested names of `request` are validated first, and so is
    /// its key when one is set. An invalid request, or a backing file that
    /// cannot be opened, ends the call before the body runs.
    ///
    /// This is the way to batch several writes into one transaction:
    ///
    /// ```rust
    /// use nutz_core::{ops, Outcome, Request, Session, StoreConfig, TxMode};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let session = Session::new(StoreConfig::new(dir.path().join("data.db")));
    ///
    /// let request = Request::new("metrics").path(&["cpu"]);
    /// let batched = session.execute(TxMode::Write, request, |txn, request, _| {
    ///     let path = request.namespace()?;
    ///     for (key, value) in [("a", b"1"), ("b", b"2")] {
    ///         ops::create(txn, &path, key, value)?;
    ///     }
    ///     Ok(Outcome::empty())
    /// });
    /// assert!(batched.is_ok());
    /// assert_eq!(batched.enumerate("metrics", &["cpu"]).enumerated().unwrap().len(), 2);
    /// ```
    #[must_use]
    pub fn execute<F>(&self, mode: TxMode, request: Request<'_>, body: F) -> Self
    where
        F: FnOnce(&mut Transaction, &Request<'_>, &Self) -> CoreResult<Outcome>,
    {
        let key = (!request.key.is_empty()).then_some(request.key);
        let target = target(request.root, key, request.path);
        self.run("execute", mode, target, |txn, _| body(txn, &request, self))
    }

    /// Removes the backing file from disk. Not transactional.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Engine`] if the file cannot be removed.
    pub fn delete_backing_store(&self) -> CoreResult<()> {
        nutz_storage::remove_file(self.config.path())?;
        Ok(())
    }

    fn run<F>(
        &self,
        operation: &'static str,
        mode: TxMode,
        target: CoreResult<NamespacePath>,
        body: F,
    ) -> Self
    where
        F: FnOnce(&mut Transaction, &NamespacePath) -> CoreResult<Outcome>,
    {
        let root = target.as_ref().map_or("", NamespacePath::root);
        let _span = debug_span!("nutz", op = operation, root).entered();

        let result =
            target.and_then(|path| with_transaction(&self.config, mode, |txn| body(txn, &path)));
        self.settle(result)
    }

    fn settle(&self, result: CoreResult<Outcome>) -> Self {
        let config = Arc::clone(&self.config);
        match result {
            Ok(outcome) => Self {
                config,
                payload: outcome.payload,
                enumerated: outcome.enumerated,
                last_error: None,
            },
            Err(err) => {
                debug!(error = %err, "operation failed");
                Self {
                    config,
                    payload: None,
                    enumerated: None,
                    last_error: Some(err),
                }
            }
        }
    }
}

/// Validates arguments before anything touches the engine.
fn target(root: &str, key: Option<&str>, path: &[&str]) -> CoreResult<NamespacePath> {
    let path = NamespacePath::new(root, path)?;
    if let Some(key) = key {
        validate_key(key)?;
    }
    Ok(path)
}
