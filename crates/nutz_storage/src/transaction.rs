//! Transactions and the bucket primitives they expose.

use crate::bucket::Bucket;
use crate::error::{StorageError, StorageResult};
use redb::{ReadTransaction, ReadableTable, TableDefinition, TableError, WriteTransaction};
use std::fmt;
use tracing::trace;

type KeyType = &'static str;
type ValueType = &'static [u8];

/// Names of every bucket table, so a write transaction can look a bucket up
/// without opening (and thereby creating) its table. Bucket table names
/// start with `/`, so this name never collides with one.
const REGISTRY: TableDefinition<'static, KeyType, ()> = TableDefinition::new("nutz:buckets");

fn definition(bucket: &Bucket) -> TableDefinition<'_, KeyType, ValueType> {
    TableDefinition::new(bucket.table_name())
}

/// The mode a transaction is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Read-only snapshot. Write primitives fail with [`StorageError::ReadOnly`].
    Read,
    /// Read-write. Changes become visible on [`Transaction::commit`].
    Write,
}

enum Inner {
    Read(ReadTransaction),
    Write(WriteTransaction),
}

/// A single all-or-nothing unit of work against one backing file.
///
/// Dropping a write transaction without committing discards its changes.
pub struct Transaction {
    inner: Inner,
}

impl Transaction {
    pub(crate) fn read(txn: ReadTransaction) -> Self {
        Self {
            inner: Inner::Read(txn),
        }
    }

    pub(crate) fn write(txn: WriteTransaction) -> Self {
        Self {
            inner: Inner::Write(txn),
        }
    }

    /// Returns the mode this transaction was opened in.
    #[must_use]
    pub fn mode(&self) -> TxMode {
        match self.inner {
            Inner::Read(_) => TxMode::Read,
            Inner::Write(_) => TxMode::Write,
        }
    }

    /// Looks up the bucket `name` under `parent` (or at the top level).
    ///
    /// Returns `Ok(None)` if the bucket does not exist. Never creates.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is empty or the engine fails.
    pub fn bucket(&self, parent: Option<&Bucket>, name: &str) -> StorageResult<Option<Bucket>> {
        let bucket = Bucket::child_of(parent, name)?;
        if self.table_exists(&bucket)? {
            Ok(Some(bucket))
        } else {
            Ok(None)
        }
    }

    /// Returns the bucket `name` under `parent`, creating it if needed.
    ///
    /// Calling this for a bucket that already exists is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is read-only, `name` is empty,
    /// or the engine fails.
    pub fn create_bucket_if_not_exists(
        &mut self,
        parent: Option<&Bucket>,
        name: &str,
    ) -> StorageResult<Bucket> {
        let bucket = Bucket::child_of(parent, name)?;
        let txn = self.writable()?;
        txn.open_table(definition(&bucket))?;
        let mut registry = txn.open_table(REGISTRY)?;
        registry.insert(bucket.table_name(), ())?;
        trace!(bucket = bucket.name(), depth = bucket.depth(), "bucket ensured");
        Ok(bucket)
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is read-only or the engine fails.
    pub fn put(&mut self, bucket: &Bucket, key: &str, value: &[u8]) -> StorageResult<()> {
        let txn = self.writable()?;
        let mut table = txn.open_table(definition(bucket))?;
        table.insert(key, value)?;
        Ok(())
    }

    /// Returns an owned copy of the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot be opened or the engine fails.
    pub fn get(&self, bucket: &Bucket, key: &str) -> StorageResult<Option<Vec<u8>>> {
        match &self.inner {
            Inner::Read(txn) => read_value(&txn.open_table(definition(bucket))?, key),
            Inner::Write(txn) => read_value(&txn.open_table(definition(bucket))?, key),
        }
    }

    /// Removes `key` from the bucket. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is read-only or the engine fails.
    pub fn delete(&mut self, bucket: &Bucket, key: &str) -> StorageResult<()> {
        let txn = self.writable()?;
        let mut table = txn.open_table(definition(bucket))?;
        table.remove(key)?;
        Ok(())
    }

    /// Visits every entry held directly by the bucket, in key order.
    ///
    /// Entries of nested buckets are not visited. The first error returned
    /// by `visit` stops the walk and is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails or `visit` fails.
    pub fn for_each<E, F>(&self, bucket: &Bucket, visit: F) -> Result<(), E>
    where
        E: From<StorageError>,
        F: FnMut(&str, &[u8]) -> Result<(), E>,
    {
        match &self.inner {
            Inner::Read(txn) => {
                let table = txn.open_table(definition(bucket)).map_err(StorageError::from)?;
                visit_all(&table, visit)
            }
            Inner::Write(txn) => {
                let table = txn.open_table(definition(bucket)).map_err(StorageError::from)?;
                visit_all(&table, visit)
            }
        }
    }

    /// Commits the transaction. For a read transaction this just releases it.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails to commit.
    pub fn commit(self) -> StorageResult<()> {
        match self.inner {
            Inner::Read(_) => {}
            Inner::Write(txn) => txn.commit()?,
        }
        trace!("transaction committed");
        Ok(())
    }

    /// Discards every change made in the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails while discarding.
    pub fn rollback(self) -> StorageResult<()> {
        match self.inner {
            Inner::Read(_) => {}
            Inner::Write(txn) => txn.abort()?,
        }
        trace!("transaction rolled back");
        Ok(())
    }

    fn writable(&self) -> StorageResult<&WriteTransaction> {
        match &self.inner {
            Inner::Write(txn) => Ok(txn),
            Inner::Read(_) => Err(StorageError::ReadOnly),
        }
    }

    fn table_exists(&self, bucket: &Bucket) -> StorageResult<bool> {
        match &self.inner {
            Inner::Read(txn) => match txn.open_table(definition(bucket)) {
                Ok(_) => Ok(true),
                Err(TableError::TableDoesNotExist(_)) => Ok(false),
                Err(err) => Err(err.into()),
            },
            Inner::Write(txn) => {
                let registry = txn.open_table(REGISTRY)?;
                let found = registry.get(bucket.table_name())?.is_some();
                Ok(found)
            }
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}

fn read_value<T>(table: &T, key: &str) -> StorageResult<Option<Vec<u8>>>
where
    T: ReadableTable<KeyType, ValueType>,
{
    Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
}

fn visit_all<T, E, F>(table: &T, mut visit: F) -> Result<(), E>
where
    T: ReadableTable<KeyType, ValueType>,
    E: From<StorageError>,
    F: FnMut(&str, &[u8]) -> Result<(), E>,
{
    for entry in table.iter().map_err(StorageError::from)? {
        let (key, value) = entry.map_err(StorageError::from)?;
        visit(key.value(), value.value())?;
    }
    Ok(())
}
