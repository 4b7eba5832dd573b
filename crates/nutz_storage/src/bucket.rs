//! Bucket handles and their table naming.

use crate::error::{StorageError, StorageResult};
use std::fmt::Write;

/// A handle to a bucket (namespace) inside an open transaction.
///
/// A bucket is identified purely by its position: the ordered chain of
/// names from the top-level bucket down to itself. Each chain is stored in
/// its own engine table, so the rows of that table are exactly the entries
/// held directly by the bucket. Nested buckets never show up there.
///
/// Handles are plain values. They carry no borrow of the transaction that
/// produced them and are only meaningful inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bucket {
    path: Vec<String>,
    table: String,
}

impl Bucket {
    /// Builds the handle for `name` below `parent` (or at the top level).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidBucket`] if `name` is empty.
    pub(crate) fn child_of(parent: Option<&Self>, name: &str) -> StorageResult<Self> {
        if name.is_empty() {
            return Err(StorageError::InvalidBucket(
                "bucket name must not be empty".to_string(),
            ));
        }

        let (mut path, mut table) = match parent {
            Some(parent) => (parent.path.clone(), parent.table.clone()),
            None => (Vec::with_capacity(1), String::new()),
        };
        // Length-prefixed segments keep `["a/b"]` and `["a", "b"]` apart.
        let _ = write!(table, "/{}:{}", name.len(), name);
        path.push(name.to_string());

        Ok(Self { path, table })
    }

    /// Returns the bucket's own name (the last segment of its chain).
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Returns the full chain of names, top-level bucket first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns how many buckets deep this one sits (1 for a top-level bucket).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub(crate) fn table_name(&self) -> &str {
        &self.table
    }
}
