//! Payment history queries with keyset pagination.
//!
//! Pages are addressed by an opaque cursor encoding the boundary row's
//! `(created_at, id)` pair. Keyset predicates keep page walks stable under
//! concurrent inserts, unlike offset pagination. The per-request summary is
//! always computed over the whole filtered set, not the current page.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    payment::{Payment, PaymentStatus},
    store::{PaymentQuery, PaymentStore, PaymentSummary},
};

/// A decoded pagination boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// `created_at` of the last row on the previous page.
    pub created_at: DateTime<Utc>,
    /// Id of the last row on the previous page.
    pub id: i64,
}

impl PageCursor {
    /// Encodes the cursor as unpadded base64url.
    #[must_use]
    pub fn encode(&self) -> String {
        let raw = format!(
            "{}:{}",
            self.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.id
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decodes a client-supplied cursor.
    ///
    /// The timestamp itself contains colons, so the id is split off at the
    /// last colon. Any malformed input yields `None`, which callers treat
    /// as a first-page request rather than an error.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        let (timestamp, id) = raw.rsplit_once(':')?;
        let created_at = DateTime::parse_from_rfc3339(timestamp).ok()?.with_timezone(&Utc);
        let id = id.parse().ok()?;
        Some(Self { created_at, id })
    }
}

/// Filter parameters for a history query.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    /// Restrict to one partner.
    pub partner_id: Option<i64>,
    /// Restrict to one status.
    pub status: Option<PaymentStatus>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Opaque cursor from a previous page; malformed values are ignored.
    pub cursor: Option<String>,
    /// Requested page size; clamped to `[1, 100]`, default 20.
    pub limit: Option<u32>,
}

/// One page of results plus the whole-set summary.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The page rows, newest first.
    pub items: Vec<Payment>,
    /// Aggregates over the entire filtered set.
    pub summary: PaymentSummary,
    /// Whether another page exists.
    pub has_next: bool,
    /// Cursor for the next page, when `has_next`.
    pub next_cursor: Option<String>,
}

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Read-side service over the payment store.
#[derive(Clone)]
pub struct QueryService {
    payments: std::sync::Arc<dyn PaymentStore>,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService").finish_non_exhaustive()
    }
}

impl QueryService {
    /// Creates a query service over the given store.
    #[must_use]
    pub fn new(payments: std::sync::Arc<dyn PaymentStore>) -> Self {
        Self { payments }
    }

    /// Runs a filtered, paginated history query.
    ///
    /// The summary is recomputed per call over the whole filtered set, so
    /// every page of a walk reports identical aggregates (absent writes).
    #[must_use]
    pub fn query(&self, filter: &QueryFilter) -> QueryResult {
        let cursor = filter.cursor.as_deref().and_then(PageCursor::decode);
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let store_query = PaymentQuery {
            partner_id: filter.partner_id,
            status: filter.status,
            from: filter.from,
            to: filter.to,
            cursor_created_at: cursor.map(|c| c.created_at),
            cursor_id: cursor.map(|c| c.id),
            limit,
        };

        let page = self.payments.find_by(&store_query);
        let summary = self
            .payments
            .summary(&PaymentQuery { cursor_created_at: None, cursor_id: None, ..store_query });

        let next_cursor = if page.has_next {
            match (page.next_cursor_created_at, page.next_cursor_id) {
                (Some(created_at), Some(id)) => Some(PageCursor { created_at, id }.encode()),
                _ => None,
            }
        } else {
            None
        };

        QueryResult { items: page.items, summary, has_next: page.has_next, next_cursor }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = PageCursor {
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            id: 42,
        };
        let decoded = PageCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_round_trip_whole_second() {
        let cursor =
            PageCursor { created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), id: 1 };
        assert_eq!(PageCursor::decode(&cursor.encode()), Some(cursor));
    }

    #[test]
    fn test_malformed_cursors_decode_to_none() {
        // Not base64.
        assert!(PageCursor::decode("!!!").is_none());
        // Base64 of non-UTF-8.
        assert!(PageCursor::decode(&URL_SAFE_NO_PAD.encode([0xff, 0xfe])).is_none());
        // No colon.
        assert!(PageCursor::decode(&URL_SAFE_NO_PAD.encode("nocolon")).is_none());
        // Bad timestamp.
        assert!(PageCursor::decode(&URL_SAFE_NO_PAD.encode("yesterday:5")).is_none());
        // Bad id.
        assert!(
            PageCursor::decode(&URL_SAFE_NO_PAD.encode("2024-03-01T00:00:00Z:abc")).is_none()
        );
    }
}
