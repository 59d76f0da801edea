//! Transient user-facing messages.
//!
//! The core only stamps them; whoever displays a notice decides when to
//! hide it by checking [`Notice::is_expired`].

use crate::boundary::BoundaryFetchError;
use crate::footprint::FootprintError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Display time for errors raised while adding a location.
pub const ADD_ERROR_TTL: Duration = Duration::from_secs(3);

/// Display time for errors raised by the map layer.
pub const MAP_ERROR_TTL: Duration = Duration::from_secs(4);

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Duplicate,
    NotFound,
    BoundaryFetch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    #[serde(with = "ttl_millis")]
    pub ttl: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self::at(kind, message, ttl, Utc::now())
    }

    pub fn at(
        kind: NoticeKind,
        message: impl Into<String>,
        ttl: Duration,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    /// Notice for a failed add (duplicate or unknown name).
    pub fn from_error(err: &FootprintError) -> Self {
        let kind = match err {
            FootprintError::Duplicate(_) => NoticeKind::Duplicate,
            FootprintError::NotFound(_) => NoticeKind::NotFound,
        };
        Self::new(kind, err.to_string(), ADD_ERROR_TTL)
    }

    /// Notice for a boundary fetch failure reported by the map layer.
    pub fn map_error(err: &BoundaryFetchError) -> Self {
        Self::new(NoticeKind::BoundaryFetch, err.to_string(), MAP_ERROR_TTL)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

mod ttl_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerError;
    use crate::location::LocationError;
    use chrono::TimeZone;

    #[test]
    fn test_expiry() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let notice = Notice::at(NoticeKind::NotFound, "boom", ADD_ERROR_TTL, t0);

        assert!(!notice.is_expired(t0));
        assert!(!notice.is_expired(t0 + chrono::Duration::milliseconds(2999)));
        assert!(notice.is_expired(t0 + chrono::Duration::seconds(3)));
    }

    #[test]
    fn test_not_found_notice() {
        let err = FootprintError::from(LocationError::NotFound("Atlantis".into()));
        let notice = Notice::from_error(&err);
        assert_eq!(notice.kind, NoticeKind::NotFound);
        assert!(notice.message.contains("Atlantis"));
        assert_eq!(notice.ttl, ADD_ERROR_TTL);
    }

    #[test]
    fn test_duplicate_notice() {
        let err = FootprintError::from(LedgerError::Duplicate("北京市".into()));
        let notice = Notice::from_error(&err);
        assert_eq!(notice.kind, NoticeKind::Duplicate);
        assert_eq!(notice.message, "City 北京市 is already added!");
        assert_eq!(notice.ttl, ADD_ERROR_TTL);
    }

    #[test]
    fn test_boundary_notice() {
        let notice = Notice::map_error(&BoundaryFetchError::Status(500));
        assert_eq!(notice.kind, NoticeKind::BoundaryFetch);
        assert_eq!(notice.ttl, MAP_ERROR_TTL);
    }

    #[test]
    fn test_serialized_form() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_value(Notice::at(NoticeKind::BoundaryFetch, "x", MAP_ERROR_TTL, t0)).unwrap();
        assert_eq!(json["kind"], "boundary_fetch");
        assert_eq!(json["ttl"], 4000);
        assert_eq!(json["message"], "x");
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let notice = Notice::at(NoticeKind::NotFound, "x", Duration::MAX, t0);
        let json = serde_json::to_value(notice).unwrap();
        assert_eq!(json["ttl"], u64::MAX);
    }
}
