//! Record operations over an already open transaction.
//!
//! These are the bodies the [`crate::Session`] methods run. They are public
//! so a custom [`crate::Session::execute`] body can combine several of them
//! in one transaction.

use crate::error::{CoreError, CoreResult};
use crate::path::{validate_key, NamespacePath};
use crate::resolver::{resolve_chain, Walk};
use nutz_storage::Transaction;
use std::collections::BTreeMap;

/// Entries of one bucket, keyed by record key.
pub type Entries = BTreeMap<String, Vec<u8>>;

/// What a successful operation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Bytes returned by the operation, if any.
    pub payload: Option<Vec<u8>>,
    /// Entries collected by an enumeration, if any.
    pub enumerated: Option<Entries>,
}

impl Outcome {
    /// An outcome carrying nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// An outcome carrying `payload`.
    #[must_use]
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
            enumerated: None,
        }
    }

    /// An outcome carrying enumerated `entries`.
    #[must_use]
    pub fn with_entries(entries: Entries) -> Self {
        Self {
            payload: None,
            enumerated: Some(entries),
        }
    }
}

/// Creates every missing bucket of `path`, then stores `value` under `key`,
/// replacing any previous value.
///
/// The stored value is read back in the same transaction and returned as
/// the payload.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] for an empty key or
/// [`CoreError::Engine`] if a bucket cannot be created or the write fails.
pub fn create(
    txn: &mut Transaction,
    path: &NamespacePath,
    key: &str,
    value: &[u8],
) -> CoreResult<Outcome> {
    validate_key(key)?;
    let bucket = resolve_chain(txn, path, Walk::CreateMissing)?;
    txn.put(&bucket, key, value)?;

    let stored = txn
        .get(&bucket, key)?
        .ok_or_else(|| CoreError::key_not_found(key))?;
    Ok(Outcome::with_payload(stored))
}

/// Returns the value stored under `key`.
///
/// # Errors
///
/// Returns [`CoreError::NamespaceNotFound`] if any bucket of `path` is
/// missing and [`CoreError::KeyNotFound`] if the key is absent.
pub fn get(txn: &mut Transaction, path: &NamespacePath, key: &str) -> CoreResult<Outcome> {
    validate_key(key)?;
    let bucket = resolve_chain(txn, path, Walk::Strict)?;

    let value = txn
        .get(&bucket, key)?
        .ok_or_else(|| CoreError::key_not_found(key))?;
    Ok(Outcome::with_payload(value))
}

/// Replaces the value of an existing `key`.
///
/// Never creates buckets or keys. The new value is returned as the payload.
///
/// # Errors
///
/// Returns [`CoreError::NamespaceNotFound`] if any bucket of `path` is
/// missing and [`CoreError::KeyNotFound`] if the key is absent.
pub fn update(
    txn: &mut Transaction,
    path: &NamespacePath,
    key: &str,
    value: &[u8],
) -> CoreResult<Outcome> {
    validate_key(key)?;
    let bucket = resolve_chain(txn, path, Walk::Strict)?;

    if txn.get(&bucket, key)?.is_none() {
        return Err(CoreError::key_not_found(key));
    }
    txn.put(&bucket, key, value)?;
    Ok(Outcome::with_payload(value.to_vec()))
}

/// Collects every entry held directly by the last bucket of `path`.
///
/// Entries of deeper buckets are not included. An existing bucket without
/// entries yields an empty map.
///
/// # Errors
///
/// Returns [`CoreError::NamespaceNotFound`] if any bucket of `path` is missing.
pub fn enumerate(txn: &mut Transaction, path: &NamespacePath) -> CoreResult<Outcome> {
    let bucket = resolve_chain(txn, path, Walk::Strict)?;

    let mut entries = Entries::new();
    txn.for_each::<CoreError, _>(&bucket, |key, value| {
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    })?;
    Ok(Outcome::with_entries(entries))
}

/// Removes `key`. Removing an absent key succeeds.
///
/// The key's bytes are returned as the payload.
///
/// # Errors
///
/// Returns [`CoreError::NamespaceNotFound`] if any bucket of `path` is missing.
pub fn delete(txn: &mut Transaction, path: &NamespacePath, key: &str) -> CoreResult<Outcome> {
    validate_key(key)?;
    let bucket = resolve_chain(txn, path, Walk::Strict)?;

    txn.delete(&bucket, key)?;
    Ok(Outcome::with_payload(key.as_bytes().to_vec()))
}
