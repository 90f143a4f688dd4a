//! Partner and fee-policy domain types.
//!
//! Partners are administered outside this crate and are read-only here except
//! for the `active` flag. Fee policies are append-only: new rates are added
//! with a later `effective_from`, existing rows are never mutated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A partner merchant on whose behalf payments are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    /// Partner identifier.
    pub id: i64,
    /// Short partner code (e.g. "TEST").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the partner may currently transact.
    pub active: bool,
}

/// A dated fee rule: percentage of the amount plus a fixed fee.
///
/// For any instant `t`, the effective policy is the one with the greatest
/// `effective_from <= t`. The data invariant says two policies of one partner
/// never share an `effective_from`; should that occur anyway, the highest id
/// wins so selection stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeePolicy {
    /// Policy identifier.
    pub id: i64,
    /// Owning partner.
    pub partner_id: i64,
    /// Instant from which this policy applies.
    pub effective_from: DateTime<Utc>,
    /// Fee rate as a decimal fraction (0.0300 = 3%).
    pub percentage: Decimal,
    /// Fixed fee added on top of the percentage.
    pub fixed_fee: Decimal,
}

/// Picks the effective policy out of a slice of candidate policies.
///
/// Candidates from other partners or with `effective_from` in the future of
/// `at` are ignored. Returns `None` when nothing applies — absence is not an
/// error at this level; the caller decides whether it is fatal.
#[must_use]
pub fn effective_policy(
    policies: &[FeePolicy],
    partner_id: i64,
    at: DateTime<Utc>,
) -> Option<&FeePolicy> {
    policies
        .iter()
        .filter(|p| p.partner_id == partner_id && p.effective_from <= at)
        .max_by_key(|p| (p.effective_from, p.id))
}
