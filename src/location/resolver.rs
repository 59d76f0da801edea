//! Location resolver — matches a typed name against the gazetteer.
//!
//! Flow: exact city → city with "市" stripped → province (alias / canonical /
//! admin-suffix stripped) → error. First hit wins.

use super::gazetteer::Gazetteer;
use super::normalize::{strip_admin_suffix, strip_suffix};
use super::types::{Location, LocationError};

/// Table-driven resolver. Pure and network-free.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    gazetteer: Gazetteer,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationResolver {
    /// Resolver over the built-in dataset.
    pub fn new() -> Self {
        Self::with_gazetteer(Gazetteer::builtin())
    }

    pub fn with_gazetteer(gazetteer: Gazetteer) -> Self {
        Self { gazetteer }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Resolve a user-entered name (already trimmed by the caller).
    pub fn resolve(&self, query: &str) -> Result<Location, LocationError> {
        // Exact before stripped, so a key that itself ends in "市" is never truncated.
        let city = self
            .gazetteer
            .city(query)
            .or_else(|| self.gazetteer.city(strip_suffix(query)));

        if let Some(record) = city {
            tracing::debug!(query, province = %record.province, "resolved as city");
            return Ok(Location::City {
                name: query.to_string(),
                coordinates: record.coordinates,
                province: Some(record.province.clone()),
            });
        }

        if let Some(short) = self.province_short_name(query) {
            tracing::debug!(query, short, "resolved as province");
            return Ok(Location::province(short));
        }

        Err(LocationError::NotFound(query.to_string()))
    }

    /// Canonical short name if `query` denotes a province.
    ///
    /// Precedence: alias value for `query` as a key, then `query` itself when
    /// already canonical, then the admin-suffix-stripped form.
    fn province_short_name<'a>(&'a self, query: &'a str) -> Option<&'a str> {
        if let Some(short) = self.gazetteer.alias(query) {
            return Some(short);
        }
        if self.gazetteer.is_canonical(query) {
            return Some(query);
        }
        let stripped = strip_admin_suffix(query);
        if self.gazetteer.is_canonical(stripped) {
            return Some(stripped);
        }
        None
    }
}
