//! Namespace paths and argument validation.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// An ordered chain of bucket names: a mandatory root followed by any
/// number of nested buckets.
///
/// Identity is positional. `["a", "b"]` and `["b", "a"]` below the same
/// root name two unrelated buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePath {
    root: String,
    nested: Vec<String>,
}

impl NamespacePath {
    /// Builds a path from a root name and the nested names below it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if the root or any nested
    /// name is empty.
    pub fn new(root: &str, nested: &[&str]) -> CoreResult<Self> {
        if root.is_empty() {
            return Err(CoreError::invalid_argument(
                "root namespace name must not be empty",
            ));
        }
        if let Some(position) = nested.iter().position(|name| name.is_empty()) {
            return Err(CoreError::invalid_argument(format!(
                "nested namespace name at position {} must not be empty",
                position + 1
            )));
        }

        Ok(Self {
            root: root.to_string(),
            nested: nested.iter().map(|name| (*name).to_string()).collect(),
        })
    }

    /// Returns the root bucket name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the nested bucket names, outermost first.
    #[must_use]
    pub fn nested(&self) -> &[String] {
        &self.nested
    }

    /// Returns the number of buckets in the chain, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.nested.len()
    }

    /// Iterates over every bucket name in the chain, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.root.as_str()).chain(self.nested.iter().map(String::as_str))
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<&str> = self.segments().collect();
        write!(f, "{}", segments.join(" > "))
    }
}

/// Rejects an empty key.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if `key` is empty.
pub fn validate_key(key: &str) -> CoreResult<()> {
    if key.is_empty() {
        return Err(CoreError::invalid_argument("key must not be empty"));
    }
    Ok(())
}
