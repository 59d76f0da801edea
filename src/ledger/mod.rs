//! Visited-location ledger and its persistence.

pub mod storage;
pub mod store;
pub mod visited;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{LedgerStore, PersistError, STORAGE_KEY};
pub use visited::{LedgerError, LedgerStats, VisitedLedger};
