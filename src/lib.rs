//! Footprint — a personal ledger of visited Chinese cities and provinces.
//!
//! Typed names are resolved against a built-in gazetteer, deduplicated, and
//! kept in a durable, insertion-ordered history. The province boundary
//! dataset used to draw the map is fetched once and shared.

pub mod boundary;
pub mod footprint;
pub mod ledger;
pub mod location;
pub mod notice;

pub use boundary::{BoundaryCache, BoundaryDataset, BoundaryFetchError, HttpBoundarySource};
pub use footprint::{Footprint, FootprintError, SubmitOutcome};
pub use ledger::{FileStorage, LedgerStats, VisitedLedger};
pub use location::{Location, LocationKind, LocationResolver};
pub use notice::{Notice, NoticeKind};
