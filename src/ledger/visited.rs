//! The visited ledger: ordered, deduplicated by name, written through to storage.

use super::storage::Storage;
use super::store::LedgerStore;
use crate::location::{Location, LocationKind};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("City {0} is already added!")]
    Duplicate(String),
}

/// Counts shown on the stats card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub cities: usize,
    pub provinces: usize,
    /// Every province touched, directly or through one of its cities. Sorted.
    pub regions: Vec<String>,
}

/// Insertion-ordered list of visited locations with pairwise distinct names.
///
/// Every mutation re-saves the full list. A failed save is logged and the
/// in-memory list stays authoritative until the next successful save.
#[derive(Debug)]
pub struct VisitedLedger<S> {
    entries: Vec<Location>,
    store: LedgerStore<S>,
}

impl<S: Storage> VisitedLedger<S> {
    /// Open the ledger with whatever the store holds.
    pub fn open(store: LedgerStore<S>) -> Self {
        let mut seen = HashSet::new();
        let mut entries = store.load();
        entries.retain(|loc| {
            let fresh = seen.insert(loc.name().to_string());
            if !fresh {
                tracing::warn!(name = loc.name(), "dropping duplicate stored entry");
            }
            fresh
        });
        tracing::debug!(count = entries.len(), "opened ledger");
        Self { entries, store }
    }

    /// Append `location` unless its name is already present.
    pub fn add(&mut self, location: Location) -> Result<(), LedgerError> {
        if self.contains(location.name()) {
            return Err(LedgerError::Duplicate(location.name().to_string()));
        }
        tracing::info!(name = location.name(), kind = %location.kind(), "added location");
        self.entries.push(location);
        self.persist();
        Ok(())
    }

    /// Drop every entry. Callers confirm with the user first.
    pub fn clear(&mut self) {
        tracing::info!(count = self.entries.len(), "cleared ledger");
        self.entries.clear();
        self.persist();
    }

    pub fn list(&self) -> &[Location] {
        &self.entries
    }

    /// Case-sensitive name lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|loc| loc.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &LedgerStore<S> {
        &self.store
    }

    pub fn stats(&self) -> LedgerStats {
        let mut stats = LedgerStats::default();
        let mut regions = BTreeSet::new();
        for loc in &self.entries {
            match loc.kind() {
                LocationKind::City => {
                    stats.cities += 1;
                    if let Some(p) = loc.province_name() {
                        regions.insert(p.to_string());
                    }
                }
                LocationKind::Province => {
                    stats.provinces += 1;
                    regions.insert(loc.name().to_string());
                }
            }
        }
        stats.regions = regions.into_iter().collect();
        stats
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.entries) {
            tracing::warn!(error = %e, "failed to save ledger; keeping in-memory copy");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::storage::{FileStorage, MemoryStorage};
    use crate::ledger::store::STORAGE_KEY;
    use std::io;
    use tempfile::TempDir;

    fn beijing() -> Location {
        Location::city("北京市", (39.9042, 116.4074), "北京")
    }

    fn empty_ledger() -> VisitedLedger<MemoryStorage> {
        VisitedLedger::open(LedgerStore::new(MemoryStorage::new()))
    }

    fn stored(ledger: &VisitedLedger<MemoryStorage>) -> Vec<Location> {
        ledger.store().try_load().unwrap()
    }

    /// Storage whose writes always fail.
    struct ReadOnly;

    impl Storage for ReadOnly {
        fn get(&self, _key: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_add_appends_in_order_and_persists() {
        let mut ledger = empty_ledger();
        ledger.add(beijing()).unwrap();
        ledger.add(Location::province("广东")).unwrap();

        let names: Vec<&str> = ledger.list().iter().map(Location::name).collect();
        assert_eq!(names, vec!["北京市", "广东"]);
        assert_eq!(stored(&ledger), ledger.list());
    }

    #[test]
    fn test_duplicate_rejected_and_ledger_unchanged() {
        let mut ledger = empty_ledger();
        ledger.add(beijing()).unwrap();
        let before = ledger.list().to_vec();

        let err = ledger.add(beijing()).unwrap_err();
        assert_eq!(err, LedgerError::Duplicate("北京市".into()));
        assert_eq!(ledger.list(), before.as_slice());
    }

    #[test]
    fn test_duplicate_is_by_name_only() {
        let mut ledger = empty_ledger();
        ledger.add(Location::province("北京")).unwrap();
        assert!(ledger
            .add(Location::city("北京", (39.9, 116.4), "北京"))
            .is_err());
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut ledger = empty_ledger();
        ledger.add(Location::city("Paris", (48.85, 2.35), "IDF")).unwrap();
        ledger.add(Location::city("paris", (48.85, 2.35), "IDF")).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let mut ledger = empty_ledger();
        ledger.add(beijing()).unwrap();
        ledger.add(Location::province("广东")).unwrap();

        ledger.clear();

        assert!(ledger.is_empty());
        let raw = ledger.store().storage().get(STORAGE_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_on_empty_ledger_still_persists() {
        let mut ledger = empty_ledger();
        ledger.clear();
        assert_eq!(
            ledger.store().storage().get(STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_reopen_restores_order() {
        let dir = TempDir::new().unwrap();
        {
            let mut ledger = VisitedLedger::open(LedgerStore::new(FileStorage::new(dir.path())));
            ledger.add(Location::province("广东")).unwrap();
            ledger.add(beijing()).unwrap();
        }

        let ledger = VisitedLedger::open(LedgerStore::new(FileStorage::new(dir.path())));
        assert_eq!(ledger.list(), &[Location::province("广东"), beijing()]);
    }

    #[test]
    fn test_open_drops_stored_duplicates() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                STORAGE_KEY,
                r#"[{"type":"province","name":"广东"},{"type":"province","name":"广东"}]"#,
            )
            .unwrap();
        let ledger = VisitedLedger::open(LedgerStore::new(storage));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_memory_authoritative() {
        let mut ledger = VisitedLedger::open(LedgerStore::new(ReadOnly));
        ledger.add(beijing()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("北京市"));
    }

    #[test]
    fn test_stats() {
        let mut ledger = empty_ledger();
        ledger.add(beijing()).unwrap();
        ledger.add(Location::city("深圳", (22.54, 114.06), "广东")).unwrap();
        ledger.add(Location::province("广东")).unwrap();
        ledger.add(Location::province("云南")).unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.provinces, 2);
        let mut expected = vec!["云南".to_string(), "北京".to_string(), "广东".to_string()];
        expected.sort();
        assert_eq!(stats.regions, expected);
    }

    #[test]
    fn test_stats_json() {
        let mut ledger = empty_ledger();
        ledger.add(Location::province("广东")).unwrap();
        let json = serde_json::to_value(ledger.stats()).unwrap();
        assert_eq!(json["cities"], 0);
        assert_eq!(json["provinces"], 1);
        assert_eq!(json["regions"][0], "广东");
    }
}
