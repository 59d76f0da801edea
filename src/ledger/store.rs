//! Persistence of the visited list under a single storage key.
//!
//! The stored value is a JSON array of locations. Saves replace it whole.
//! A missing or unparseable value loads as an empty list.

use super::storage::Storage;
use crate::location::Location;

/// Key the ledger lives under.
pub const STORAGE_KEY: &str = "footprint_visited_cities";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("cannot read stored ledger: {0}")]
    Read(#[source] std::io::Error),
    #[error("stored ledger is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("cannot encode ledger: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("cannot write ledger: {0}")]
    Write(#[source] std::io::Error),
}

/// Loads and saves the ledger through a [`Storage`].
#[derive(Debug)]
pub struct LedgerStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> LedgerStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored locations in order. Read and parse failures are logged and
    /// yield an empty list.
    pub fn load(&self) -> Vec<Location> {
        match self.try_load() {
            Ok(locations) => locations,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding stored ledger");
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<Location>, PersistError> {
        match self.storage.get(&self.key).map_err(PersistError::Read)? {
            Some(raw) => serde_json::from_str(&raw).map_err(PersistError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the stored value with `locations`.
    pub fn save(&mut self, locations: &[Location]) -> Result<(), PersistError> {
        let json = serde_json::to_string(locations).map_err(PersistError::Encode)?;
        self.storage.set(&self.key, &json).map_err(PersistError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn sample() -> Vec<Location> {
        vec![
            Location::city("北京市", (39.9042, 116.4074), "北京"),
            Location::province("广东"),
            Location::city("成都", (30.5728, 104.0668), "四川"),
        ]
    }

    #[test]
    fn test_round_trip() {
        let mut store = LedgerStore::new(MemoryStorage::new());
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        LedgerStore::new(FileStorage::new(dir.path())).save(&sample()).unwrap();

        let reopened = LedgerStore::new(FileStorage::new(dir.path()));
        assert_eq!(reopened.load(), sample());
    }

    #[test]
    fn test_missing_value_loads_empty() {
        let store = LedgerStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "{ definitely not json").unwrap();
        let store = LedgerStore::new(storage);

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(PersistError::Corrupt(_))));
    }

    #[test]
    fn test_wrong_schema_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, r#"[{"name":"北京","type":"village"}]"#)
            .unwrap();
        assert!(LedgerStore::new(storage).load().is_empty());
    }

    #[test]
    fn test_stored_format() {
        let mut store = LedgerStore::new(MemoryStorage::new());
        store.save(&[Location::province("广东")]).unwrap();
        let raw = store.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"type":"province","name":"广东"}]"#);
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let mut store = LedgerStore::new(MemoryStorage::new());
        store.save(&sample()).unwrap();
        store.save(&[]).unwrap();
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_custom_key() {
        let mut store = LedgerStore::with_key(MemoryStorage::new(), "other");
        store.save(&sample()).unwrap();
        assert!(store.storage().get(STORAGE_KEY).unwrap().is_none());
        assert_eq!(store.load().len(), 3);
    }
}
