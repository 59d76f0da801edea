//! Location subsystem: name normalization, reference tables, and the
//! table-driven resolver that turns a typed name into a [`Location`].

pub mod gazetteer;
pub mod normalize;
pub mod resolver;
pub mod types;

pub use gazetteer::{CityRecord, Gazetteer, GazetteerError};
pub use resolver::LocationResolver;
pub use types::{Coordinates, Location, LocationError, LocationKind};
