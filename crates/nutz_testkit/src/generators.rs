//! Property-based test generators using proptest.
//!
//! Provides strategies for generating bucket names, keys, values and
//! operation sequences that satisfy the façade's argument rules.

use proptest::prelude::*;

/// Strategy for generating non-empty bucket names.
pub fn bucket_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating non-empty record keys, including non-ASCII ones.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::string::string_regex("[a-zA-Z0-9_:.-]{1,24}").expect("Invalid regex"),
        1 => "\\PC{1,8}",
    ]
}

/// Strategy for generating record values (arbitrary bytes, possibly empty).
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for generating nested bucket paths of up to `max_depth` names.
pub fn nested_path_strategy(max_depth: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(bucket_name_strategy(), 0..=max_depth)
}

/// A façade operation against a fixed root bucket.
#[derive(Debug, Clone)]
pub enum RecordOperation {
    /// Create or overwrite a record.
    Create {
        /// Nested bucket path
        path: Vec<String>,
        /// Record key
        key: String,
        /// Record value
        value: Vec<u8>,
    },
    /// Fetch a record.
    Get {
        /// Nested bucket path
        path: Vec<String>,
        /// Record key
        key: String,
    },
    /// Replace an existing record.
    Update {
        /// Nested bucket path
        path: Vec<String>,
        /// Record key
        key: String,
        /// Record value
        value: Vec<u8>,
    },
    /// List the direct entries of a bucket.
    Enumerate {
        /// Nested bucket path
        path: Vec<String>,
    },
    /// Remove a record.
    Delete {
        /// Nested bucket path
        path: Vec<String>,
        /// Record key
        key: String,
    },
}

/// Strategy for generating operations over a small universe of paths and
/// keys, so that hits and misses both happen often.
pub fn record_operation_strategy() -> impl Strategy<Value = RecordOperation> {
    let path = prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..3)
        .prop_map(|names| names.into_iter().map(str::to_string).collect::<Vec<_>>());
    let key = prop::sample::select(vec!["k1", "k2", "k3"]).prop_map(str::to_string);
    let value = prop::collection::vec(any::<u8>(), 0..16);

    prop_oneof![
        3 => (path.clone(), key.clone(), value.clone())
            .prop_map(|(path, key, value)| RecordOperation::Create { path, key, value }),
        2 => (path.clone(), key.clone())
            .prop_map(|(path, key)| RecordOperation::Get { path, key }),
        2 => (path.clone(), key.clone(), value)
            .prop_map(|(path, key, value)| RecordOperation::Update { path, key, value }),
        1 => path.clone().prop_map(|path| RecordOperation::Enumerate { path }),
        1 => (path, key).prop_map(|(path, key)| RecordOperation::Delete { path, key }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<RecordOperation>> {
    prop::collection::vec(record_operation_strategy(), min_ops..max_ops)
}

/// Borrows a generated path as the `&[&str]` the façade takes.
pub fn as_path(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 64,
            max_shrink_iters: 500,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 16,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
