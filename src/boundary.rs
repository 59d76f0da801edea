//! Boundary dataset (China province outlines as GeoJSON) and its
//! process-wide cache.
//!
//! The cache fetches at most once at a time: callers arriving while a fetch
//! is in flight wait on that same fetch and see its result. Only successes
//! are memoized; after a failure the next caller starts a fresh fetch.
//!
//! The fetch runs on its own task, which also records the outcome, so a
//! finished fetch settles the cache even if every waiting caller was dropped.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const DEFAULT_BOUNDARY_URL: &str = "https://geo.datav.aliyun.com/areas_v3/bound/100000_full.json";

const USER_AGENT: &str = "Footprint/0.1 (travel-ledger)";

// ─── Dataset ────────────────────────────────────────────────────

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryDataset {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub geometry: serde_json::Value,
}

impl BoundaryFeature {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name")?.as_str()
    }
}

impl BoundaryDataset {
    /// Names of all named features, in document order.
    pub fn region_names(&self) -> Vec<&str> {
        self.features.iter().filter_map(BoundaryFeature::name).collect()
    }

    pub fn feature(&self, name: &str) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryFetchError {
    #[error("Failed to load map data: {0}")]
    Transport(String),
    #[error("Failed to load map data: HTTP {0}")]
    Status(u16),
    #[error("Failed to load map data: {0}")]
    Decode(String),
}

// ─── Sources ────────────────────────────────────────────────────

/// Where the dataset comes from. `fetch` may block.
pub trait BoundarySource: Send + Sync + 'static {
    fn fetch(&self) -> Result<BoundaryDataset, BoundaryFetchError>;
}

/// Fetches the dataset over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    url: String,
    timeout: Duration,
}

impl HttpBoundarySource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpBoundarySource {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_URL)
    }
}

impl BoundarySource for HttpBoundarySource {
    fn fetch(&self) -> Result<BoundaryDataset, BoundaryFetchError> {
        tracing::debug!(url = %self.url, "fetching boundary dataset");
        let response = ureq::get(&self.url)
            .set("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => BoundaryFetchError::Status(code),
                other => BoundaryFetchError::Transport(other.to_string()),
            })?;

        response
            .into_json()
            .map_err(|e| BoundaryFetchError::Decode(e.to_string()))
    }
}

// ─── Cache ──────────────────────────────────────────────────────

type FetchResult = Result<Arc<BoundaryDataset>, BoundaryFetchError>;
type Flight = Shared<BoxFuture<'static, FetchResult>>;

enum Slot {
    Empty,
    Fetching { id: u64, flight: Flight },
    Ready(Arc<BoundaryDataset>),
}

struct State {
    slot: Slot,
    flights: u64,
}

/// Lazily fetched, never invalidated boundary dataset.
///
/// Create one per process and share it (`Arc<BoundaryCache>`) with every
/// collaborator that draws the map.
pub struct BoundaryCache {
    source: Arc<dyn BoundarySource>,
    state: Arc<Mutex<State>>,
}

impl BoundaryCache {
    pub fn new(source: impl BoundarySource) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(State { slot: Slot::Empty, flights: 0 })),
        }
    }

    /// The dataset, fetching it first if no fetch has succeeded yet.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn get(&self) -> FetchResult {
        let flight = {
            let mut guard = lock(&self.state);
            let state = &mut *guard;
            match &state.slot {
                Slot::Ready(dataset) => return Ok(Arc::clone(dataset)),
                Slot::Fetching { flight, .. } => flight.clone(),
                Slot::Empty => {
                    state.flights += 1;
                    let id = state.flights;
                    let flight = self.start_fetch(id);
                    state.slot = Slot::Fetching { id, flight: flight.clone() };
                    flight
                }
            }
        };

        flight.await
    }

    /// The memoized dataset, without triggering a fetch.
    pub fn cached(&self) -> Option<Arc<BoundaryDataset>> {
        match &lock(&self.state).slot {
            Slot::Ready(dataset) => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    /// Spawn the fetch for flight `id`. The task settles the slot itself.
    /// Called with the state lock held, so the task cannot settle before
    /// the slot records this flight.
    fn start_fetch(&self, id: u64) -> Flight {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || source.fetch()).await {
                Ok(result) => result.map(Arc::new),
                Err(e) => Err(BoundaryFetchError::Transport(e.to_string())),
            };
            settle(&state, id, &result);
            result
        });

        let state = Arc::clone(&self.state);
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    let result = Err(BoundaryFetchError::Transport(e.to_string()));
                    settle(&state, id, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record the outcome of flight `id`, unless a newer flight replaced it.
fn settle(state: &Mutex<State>, id: u64, result: &FetchResult) {
    let mut state = lock(state);
    if !matches!(&state.slot, Slot::Fetching { id: current, .. } if *current == id) {
        return;
    }
    state.slot = match result {
        Ok(dataset) => {
            tracing::info!(features = dataset.features.len(), "boundary dataset cached");
            Slot::Ready(Arc::clone(dataset))
        }
        Err(e) => {
            tracing::warn!(error = %e, "boundary fetch failed");
            Slot::Empty
        }
    };
}
