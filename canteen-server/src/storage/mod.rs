//! redb-based record store
//!
//! Every service persists typed records through [`RecordStore`]. Records are
//! JSON-encoded and keyed by `"<kind>:<id>"` so a kind can be scanned by prefix.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `records` | `kind:id` | JSON bytes | Menu items, orders, reviews, users, ... |
//! | `counters` | name | `u64` | Monotonic counters (daily pickup tokens) |
//!
//! # Concurrency
//!
//! redb serializes write transactions, so [`RecordStore::increment`] and
//! [`RecordStore::update`] are atomic within one process. Separate processes
//! opening separate files share nothing.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// JSON records: key = "kind:id", value = serialized record
const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// Counters: key = counter name, value = current count
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage failure");
        shared::error::AppError::database(err.to_string())
    }
}

/// Record store backed by redb
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the write survives a crash.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RECORDS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Records ==========

    /// Get a record by key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS_TABLE)?;

        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or overwrite a record
    pub fn put<T: Serialize>(&self, key: &str, record: &T) -> StorageResult<()> {
        let value = serde_json::to_vec(record)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            table.insert(key, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove a record, returns whether it existed
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            table.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    /// All records whose key starts with `prefix`, in key order
    pub fn scan<T: DeserializeOwned>(&self, prefix: &str) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS_TABLE)?;

        let mut records = Vec::new();
        for entry in table.range(prefix..)? {
            let (key, value) = entry?;
            if !key.value().starts_with(prefix) {
                break;
            }
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }

    /// Read-modify-write a record inside one write transaction
    ///
    /// Returns `Ok(None)` when the key is absent. If `apply` fails the
    /// transaction is dropped and nothing is written.
    pub fn update<T, E, F>(&self, key: &str, apply: F) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StorageError>,
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let updated = {
            let mut table = txn.open_table(RECORDS_TABLE).map_err(StorageError::from)?;
            let current: Option<T> = match table.get(key).map_err(StorageError::from)? {
                Some(value) => Some(serde_json::from_slice(value.value()).map_err(StorageError::from)?),
                None => None,
            };
            let Some(mut record) = current else {
                return Ok(None);
            };
            apply(&mut record)?;
            let value = serde_json::to_vec(&record).map_err(StorageError::from)?;
            table
                .insert(key, value.as_slice())
                .map_err(StorageError::from)?;
            record
        };
        txn.commit().map_err(StorageError::from)?;
        Ok(Some(updated))
    }

    // ========== Counters ==========

    /// Atomically increment a counter and return the new value (first call returns 1)
    pub fn increment(&self, name: &str) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(name)?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(name, next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    /// Current counter value (0 when never incremented)
    pub fn counter(&self, name: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(name)?.map(|g| g.value()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Dish {
        name: String,
        price: f64,
    }

    fn dish(name: &str, price: f64) -> Dish {
        Dish {
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn test_put_get_remove() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), None);

        store.put("dish:1", &dish("Dosa", 60.0)).unwrap();
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), Some(dish("Dosa", 60.0)));

        assert!(store.remove("dish:1").unwrap());
        assert!(!store.remove("dish:1").unwrap());
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), None);
    }

    #[test]
    fn test_scan_stays_within_prefix() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put("dish:a", &dish("A", 1.0)).unwrap();
        store.put("dish:b", &dish("B", 2.0)).unwrap();
        store.put("dishes:c", &dish("C", 3.0)).unwrap();
        store.put("order:x", &dish("X", 4.0)).unwrap();

        let dishes: Vec<Dish> = store.scan("dish:").unwrap();
        assert_eq!(dishes, vec![dish("A", 1.0), dish("B", 2.0)]);
        assert!(store.scan::<Dish>("review:").unwrap().is_empty());
    }

    #[test]
    fn test_update_applies_and_persists() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put("dish:1", &dish("Dosa", 60.0)).unwrap();

        let updated = store
            .update::<Dish, StorageError, _>("dish:1", |d| {
                d.price = 65.0;
                Ok(())
            })
            .unwrap();
        assert_eq!(updated, Some(dish("Dosa", 65.0)));
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), Some(dish("Dosa", 65.0)));

        let missing = store
            .update::<Dish, StorageError, _>("dish:404", |_| Ok(()))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_update_failure_writes_nothing() {
        #[derive(Debug)]
        enum Rejected {
            No,
            Storage,
        }
        impl From<StorageError> for Rejected {
            fn from(_: StorageError) -> Self {
                Rejected::Storage
            }
        }

        let store = RecordStore::open_in_memory().unwrap();
        store.put("dish:1", &dish("Dosa", 60.0)).unwrap();
        let result = store.update::<Dish, Rejected, _>("dish:1", |d| {
            d.price = 0.0;
            Err(Rejected::No)
        });
        assert!(matches!(result, Err(Rejected::No)));
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), Some(dish("Dosa", 60.0)));
    }

    #[test]
    fn test_counters_start_at_one() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(store.counter("tokens").unwrap(), 0);
        assert_eq!(store.increment("tokens").unwrap(), 1);
        assert_eq!(store.increment("tokens").unwrap(), 2);
        assert_eq!(store.increment("other").unwrap(), 1);
        assert_eq!(store.counter("tokens").unwrap(), 2);
    }

    #[test]
    fn test_file_backed_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canteen.redb");
        {
            let store = RecordStore::open(&path).unwrap();
            store.put("dish:1", &dish("Dosa", 60.0)).unwrap();
            store.increment("tokens").unwrap();
        }
        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.get::<Dish>("dish:1").unwrap(), Some(dish("Dosa", 60.0)));
        assert_eq!(store.increment("tokens").unwrap(), 2);
    }
}
