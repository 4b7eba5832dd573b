//! Model-checking harness.
//!
//! Applies façade operations to a real store and to a small in-memory model
//! of nested buckets at the same time, and checks that both agree.

use crate::fixtures::TestStore;
use crate::generators::{as_path, RecordOperation};
use nutz_core::{CoreError, ErrorKind, Session};
use std::collections::{BTreeMap, BTreeSet};

/// Root bucket every harness operation runs under.
pub const HARNESS_ROOT: &str = "root";

/// What the model expects an operation to end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// Success with this payload (and no entries).
    Payload(Vec<u8>),
    /// Success with these entries (and no payload).
    Entries(BTreeMap<String, Vec<u8>>),
    /// Failure of this kind; for a missing bucket, its position.
    Failure(ErrorKind, Option<usize>),
}

/// A test harness pairing a temporary store with an in-memory model.
pub struct ModelHarness {
    /// The store under test.
    pub store: TestStore,
    buckets: BTreeSet<Vec<String>>,
    records: BTreeMap<(Vec<String>, String), Vec<u8>>,
}

impl ModelHarness {
    /// Creates a harness over an empty temporary store.
    pub fn new() -> Self {
        Self {
            store: TestStore::new(),
            buckets: BTreeSet::new(),
            records: BTreeMap::new(),
        }
    }

    /// Applies `op` to the store and the model and asserts they agree.
    ///
    /// # Panics
    ///
    /// Panics when the store's session disagrees with the model.
    pub fn apply(&mut self, op: &RecordOperation) {
        let expected = self.expect(op);
        let actual = self.run(op);
        Self::check(op, &expected, &actual);
        self.commit(op, &expected);
    }

    /// Applies every operation in order.
    pub fn apply_all(&mut self, ops: &[RecordOperation]) {
        for op in ops {
            self.apply(op);
        }
    }

    /// Returns the number of records the model currently holds.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    fn run(&self, op: &RecordOperation) -> Session {
        let session = &self.store.session;
        match op {
            RecordOperation::Create { path, key, value } => {
                session.create(HARNESS_ROOT, key, value, &as_path(path))
            }
            RecordOperation::Get { path, key } => session.get(HARNESS_ROOT, key, &as_path(path)),
            RecordOperation::Update { path, key, value } => {
                session.update(HARNESS_ROOT, key, value, &as_path(path))
            }
            RecordOperation::Enumerate { path } => session.enumerate(HARNESS_ROOT, &as_path(path)),
            RecordOperation::Delete { path, key } => {
                session.delete(HARNESS_ROOT, key, &as_path(path))
            }
        }
    }

    fn expect(&self, op: &RecordOperation) -> Expected {
        match op {
            RecordOperation::Create { value, .. } => Expected::Payload(value.clone()),
            RecordOperation::Get { path, key } => match self.missing_bucket(path) {
                Some(position) => Expected::Failure(ErrorKind::NamespaceNotFound, Some(position)),
                None => match self.records.get(&(chain(path), key.clone())) {
                    Some(value) => Expected::Payload(value.clone()),
                    None => Expected::Failure(ErrorKind::KeyNotFound, None),
                },
            },
            RecordOperation::Update { path, key, value } => match self.missing_bucket(path) {
                Some(position) => Expected::Failure(ErrorKind::NamespaceNotFound, Some(position)),
                None if self.records.contains_key(&(chain(path), key.clone())) => {
                    Expected::Payload(value.clone())
                }
                None => Expected::Failure(ErrorKind::KeyNotFound, None),
            },
            RecordOperation::Enumerate { path } => match self.missing_bucket(path) {
                Some(position) => Expected::Failure(ErrorKind::NamespaceNotFound, Some(position)),
                None => {
                    let target = chain(path);
                    let entries = self
                        .records
                        .iter()
                        .filter(|((bucket, _), _)| *bucket == target)
                        .map(|((_, key), value)| (key.clone(), value.clone()))
                        .collect();
                    Expected::Entries(entries)
                }
            },
            RecordOperation::Delete { path, key } => match self.missing_bucket(path) {
                Some(position) => Expected::Failure(ErrorKind::NamespaceNotFound, Some(position)),
                None => Expected::Payload(key.as_bytes().to_vec()),
            },
        }
    }

    fn check(op: &RecordOperation, expected: &Expected, actual: &Session) {
        match expected {
            Expected::Payload(payload) => {
                assert!(actual.is_ok(), "{op:?} failed: {:?}", actual.last_error());
                assert_eq!(actual.payload(), Some(payload.as_slice()), "{op:?}");
                assert!(actual.enumerated().is_none(), "{op:?}");
            }
            Expected::Entries(entries) => {
                assert!(actual.is_ok(), "{op:?} failed: {:?}", actual.last_error());
                assert_eq!(actual.enumerated(), Some(entries), "{op:?}");
                assert!(actual.payload().is_none(), "{op:?}");
            }
            Expected::Failure(kind, position) => {
                let err = actual
                    .last_error()
                    .unwrap_or_else(|| panic!("{op:?} succeeded, expected {kind:?}"));
                assert_eq!(err.kind(), *kind, "{op:?}");
                if let (Some(expected), CoreError::NamespaceNotFound { position, .. }) =
                    (position, err)
                {
                    assert_eq!(position, expected, "{op:?}");
                }
                assert!(actual.payload().is_none(), "{op:?}");
                assert!(actual.enumerated().is_none(), "{op:?}");
            }
        }
    }

    fn commit(&mut self, op: &RecordOperation, expected: &Expected) {
        if matches!(expected, Expected::Failure(..)) {
            return;
        }
        match op {
            RecordOperation::Create { path, key, value } => {
                let full = chain(path);
                for depth in 1..=full.len() {
                    self.buckets.insert(full[..depth].to_vec());
                }
                self.records.insert((full, key.clone()), value.clone());
            }
            RecordOperation::Update { path, key, value } => {
                self.records.insert((chain(path), key.clone()), value.clone());
            }
            RecordOperation::Delete { path, key } => {
                self.records.remove(&(chain(path), key.clone()));
            }
            RecordOperation::Get { .. } | RecordOperation::Enumerate { .. } => {}
        }
    }

    /// Position of the first bucket of `root > path` the model doesn't hold.
    fn missing_bucket(&self, path: &[String]) -> Option<usize> {
        let full = chain(path);
        (1..=full.len())
            .find(|depth| !self.buckets.contains(&full[..*depth]))
            .map(|depth| depth - 1)
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn chain(path: &[String]) -> Vec<String> {
    std::iter::once(HARNESS_ROOT.to_string())
        .chain(path.iter().cloned())
        .collect()
}
