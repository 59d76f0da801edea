//! The add/clear flow the UI drives: resolve a typed name, dedupe, record.
//!
//! Mutation goes through `&mut self`, so the duplicate check and the append
//! can never interleave with another add. To drive a `Footprint` from several
//! threads, wrap it in `Arc<Mutex<_>>`.

use crate::ledger::{LedgerError, LedgerStore, Storage, VisitedLedger};
use crate::location::{Location, LocationError, LocationResolver};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FootprintError {
    #[error(transparent)]
    NotFound(#[from] LocationError),
    #[error(transparent)]
    Duplicate(#[from] LedgerError),
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added(Location),
    /// The query resolved to a name already in the ledger (e.g. "广东省"
    /// after "广东"); nothing changed.
    AlreadyVisited(Location),
}

pub struct Footprint<S> {
    resolver: LocationResolver,
    ledger: VisitedLedger<S>,
}

impl<S: Storage> Footprint<S> {
    pub fn new(resolver: LocationResolver, ledger: VisitedLedger<S>) -> Self {
        Self { resolver, ledger }
    }

    /// Open the ledger stored in `storage`.
    pub fn open(resolver: LocationResolver, storage: S) -> Self {
        Self::new(resolver, VisitedLedger::open(LedgerStore::new(storage)))
    }

    /// Record `query` as visited.
    ///
    /// Fails when the query itself is already a ledger name or does not
    /// resolve. A query that resolves onto an existing name is a no-op.
    pub fn submit(&mut self, query: &str) -> Result<SubmitOutcome, FootprintError> {
        if self.ledger.contains(query) {
            return Err(LedgerError::Duplicate(query.to_string()).into());
        }

        let location = self.resolver.resolve(query)?;
        if self.ledger.contains(location.name()) {
            tracing::debug!(query, name = location.name(), "already visited");
            return Ok(SubmitOutcome::AlreadyVisited(location));
        }

        self.ledger.add(location.clone())?;
        Ok(SubmitOutcome::Added(location))
    }

    /// Resolve without recording.
    pub fn resolve(&self, query: &str) -> Result<Location, LocationError> {
        self.resolver.resolve(query)
    }

    /// Forget every visited location. Confirm with the user before calling.
    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    pub fn ledger(&self) -> &VisitedLedger<S> {
        &self.ledger
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }
}
