//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of place a location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    City,
    Province,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City => write!(f, "city"),
            Self::Province => write!(f, "province"),
        }
    }
}

/// Latitude/longitude pair in degrees. Serialized as `[lat, lon]`.
pub type Coordinates = (f64, f64);

/// A resolved place the user can mark as visited.
///
/// Cities always carry coordinates, provinces never do. Stored form:
/// `{"name": "...", "type": "city", "coordinates": [lat, lon], "province": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    City {
        /// The query as the user typed it.
        name: String,
        coordinates: Coordinates,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        province: Option<String>,
    },
    Province {
        /// Canonical short name (e.g. "广东").
        name: String,
    },
}

impl Location {
    pub fn city(name: impl Into<String>, coordinates: Coordinates, province: impl Into<String>) -> Self {
        Self::City {
            name: name.into(),
            coordinates,
            province: Some(province.into()),
        }
    }

    pub fn province(name: impl Into<String>) -> Self {
        Self::Province { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::City { name, .. } | Self::Province { name } => name,
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            Self::City { .. } => LocationKind::City,
            Self::Province { .. } => LocationKind::Province,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::City { coordinates, .. } => Some(*coordinates),
            Self::Province { .. } => None,
        }
    }

    /// Containing province for a city; a province has none.
    pub fn province_name(&self) -> Option<&str> {
        match self {
            Self::City { province, .. } => province.as_deref(),
            Self::Province { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City { name, province: Some(p), .. } => write!(f, "{} (city, {})", name, p),
            Self::City { name, province: None, .. } => write!(f, "{} (city)", name),
            Self::Province { name } => write!(f, "{} (province)", name),
        }
    }
}

/// Location resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("City '{0}' not found. Please try a major city.")]
    NotFound(String),
}
