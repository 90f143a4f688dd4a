//! Outbound ports: persistence stores and the metrics sink.
//!
//! The core owns no storage. Everything it reads or writes goes through the
//! traits in this module; [`crate::in_memory`] provides reference
//! implementations used by the tests. A real deployment plugs in its own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    partner::{FeePolicy, Partner},
    payment::{Payment, PaymentStatus},
};

/// Read access to partners.
pub trait PartnerStore: Send + Sync {
    /// Looks up a partner by id.
    fn find_by_id(&self, id: i64) -> Option<Partner>;
}

/// Read access to fee policies.
pub trait FeePolicyStore: Send + Sync {
    /// Returns the policy with the greatest `effective_from <= at` for the
    /// partner, or `None` when no policy applies yet.
    fn find_effective_policy(&self, partner_id: i64, at: DateTime<Utc>) -> Option<FeePolicy>;
}

/// Filter and keyset bound for payment page/summary queries.
///
/// `cursor_created_at`/`cursor_id` carry the decoded keyset position; they are
/// only honored by [`PaymentStore::find_by`]. Summaries are computed over the
/// full filtered set regardless of the page position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    /// Restrict to one partner.
    pub partner_id: Option<i64>,
    /// Restrict to one status.
    pub status: Option<PaymentStatus>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Keyset bound: only rows strictly older than this position.
    pub cursor_created_at: Option<DateTime<Utc>>,
    /// Keyset bound: id tie-breaker at `cursor_created_at`.
    pub cursor_id: Option<i64>,
    /// Maximum number of rows to return. Stores treat zero as one so every
    /// non-empty page can carry its cursor boundary.
    pub limit: u32,
}

/// One page of payments plus the raw components of the next cursor.
///
/// Items are ordered by `created_at` descending, id descending — the fixed
/// ordering required for stable keyset pagination. The cursor components are
/// present only when `has_next` is true and refer to the last *returned* row.
#[derive(Debug, Clone)]
pub struct PaymentPage {
    /// Rows of this page, at most `limit`.
    pub items: Vec<Payment>,
    /// Whether at least one more row matches beyond this page.
    pub has_next: bool,
    /// `created_at` of the last returned row, when `has_next`.
    pub next_cursor_created_at: Option<DateTime<Utc>>,
    /// Id of the last returned row, when `has_next`.
    pub next_cursor_id: Option<i64>,
}

/// Aggregate over the entire filtered set (never just a page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSummary {
    /// Number of matching payments.
    pub count: u64,
    /// Sum of `amount` over the matching set.
    pub total_amount: Decimal,
    /// Sum of `net_amount` over the matching set.
    pub total_net_amount: Decimal,
}

/// Persistence for payments.
pub trait PaymentStore: Send + Sync {
    /// Persists a payment, assigning its id. Returns the stored record.
    fn save(&self, payment: Payment) -> Payment;

    /// Fetches one page per the filter and keyset bound in `query`.
    fn find_by(&self, query: &PaymentQuery) -> PaymentPage;

    /// Computes the aggregate over the full set matching `query`'s filter.
    /// Keyset fields in `query` are ignored.
    fn summary(&self, query: &PaymentQuery) -> PaymentSummary;
}

/// Domain metric observations (value distributions).
///
/// Fire-and-forget by contract: implementations must not fail the calling
/// operation, which is why the method is infallible.
pub trait MetricsSink: Send + Sync {
    /// Records one observation of a value distribution.
    ///
    /// `name` is the metric name (e.g. `payment.amount`), `tags` are
    /// key/value dimensions (e.g. `partner_id`).
    fn record_value(&self, name: &str, value: f64, tags: &[(&str, &str)]);
}
