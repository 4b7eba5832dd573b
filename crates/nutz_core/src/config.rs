//! Store configuration.

use nutz_storage::EngineOptions;
use std::path::{Path, PathBuf};

/// Permission bits given to a newly created backing file.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Configuration of one backing file.
///
/// Captured once when a [`crate::Session`] is built and never changed
/// afterwards. No engine handle is kept alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the backing file.
    pub path: PathBuf,

    /// Unix permission bits applied when the file is created.
    pub file_mode: u32,

    /// Options passed to the engine on every open.
    pub engine: EngineOptions,
}

impl StoreConfig {
    /// Creates a configuration for the file at `path` with default values.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_mode: DEFAULT_FILE_MODE,
            engine: EngineOptions::default(),
        }
    }

    /// Sets the permission bits for a newly created file.
    #[must_use]
    pub const fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Sets whether to create the file if it doesn't exist.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.engine.create_if_missing = value;
        self
    }

    /// Sets the engine page cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.engine.cache_size = Some(bytes);
        self
    }

    /// Sets whether every write commit is synced to disk.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.engine.sync_on_commit = value;
        self
    }

    /// Replaces all engine options at once.
    #[must_use]
    pub fn engine_options(mut self, options: EngineOptions) -> Self {
        self.engine = options;
        self
    }

    /// Returns the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
