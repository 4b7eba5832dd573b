//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up temporary stores
//! and common test scenarios.

use nutz_core::{Session, StoreConfig};
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

/// A session over a backing file in its own temporary directory.
///
/// The directory, and the file with it, is removed when the fixture drops.
pub struct TestStore {
    /// The session, configured for the temporary file.
    pub session: Session,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestStore {
    /// Creates a store with default configuration.
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Creates a store, letting `configure` adjust the default configuration.
    pub fn with_config<F>(configure: F) -> Self
    where
        F: FnOnce(StoreConfig) -> StoreConfig,
    {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = configure(StoreConfig::new(temp_dir.path().join("test.db")));

        Self {
            session: Session::new(config),
            _temp_dir: temp_dir,
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        self.session.config().path()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

/// Runs a test with a session over a temporary file.
///
/// # Example
///
/// ```rust
/// use nutz_testkit::with_temp_store;
///
/// with_temp_store(|session| {
///     assert!(session.create("base", "k", b"v", &[]).is_ok());
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Session) -> R,
{
    let store = TestStore::new();
    f(&store.session)
}

/// Installs a `tracing` subscriber for tests, once per process.
///
/// Honors `RUST_LOG`; output goes through the test harness capture.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a store holding `count` records `key_{i}` under `base > items`.
    pub fn populated_store(count: usize) -> TestStore {
        let store = TestStore::new();

        for i in 0..count {
            let key = format!("key_{i}");
            let value = format!(r#"{{"index":{i}}}"#).into_bytes();
            let created = store.create("base", &key, &value, &["items"]);
            assert!(created.is_ok(), "Failed to create record: {:?}", created.last_error());
        }

        store
    }

    /// Creates the three-record layout used to check enumeration scope:
    /// `k1`, `k2` under `base > a > b` and `k3` under `base > a > c`.
    pub fn sibling_buckets() -> TestStore {
        let store = TestStore::new();
        let session = store
            .create("base", "k1", b"v1", &["a", "b"])
            .create("base", "k2", b"v2", &["a", "b"])
            .create("base", "k3", b"v3", &["a", "c"]);
        assert!(session.is_ok(), "Failed to seed: {:?}", session.last_error());
        store
    }
}
