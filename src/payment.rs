//! Payment domain types and fee computation.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Terminal status of a payment.
///
/// The wire form (and stored string form) is SCREAMING_SNAKE, matching the
/// provider protocol (`"APPROVED"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// The provider approved the charge.
    Approved,
    /// The charge was canceled after approval (by out-of-scope processes).
    Canceled,
}

/// A persisted payment outcome.
///
/// Created once per successful approval and immutable thereafter except for
/// status transitions performed by out-of-scope processes. `id` is `None`
/// until the store assigns one on save.
///
/// Invariant: `fee_amount == round(amount * applied_fee_rate + fixed_fee)` at
/// the scale of `amount`, and `net_amount == amount - fee_amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Store-assigned identifier; `None` before persistence.
    pub id: Option<i64>,
    /// Partner the payment belongs to.
    pub partner_id: i64,
    /// Charged amount.
    pub amount: Decimal,
    /// Card BIN (first six digits), when supplied.
    pub card_bin: Option<String>,
    /// Last four card digits, when supplied.
    pub card_last4: Option<String>,
    /// Provider approval code.
    pub approval_code: String,
    /// Provider approval timestamp.
    pub approved_at: DateTime<Utc>,
    /// Terminal status from the approval result.
    pub status: PaymentStatus,
    /// Fee rate that was in effect when the payment was made.
    pub applied_fee_rate: Decimal,
    /// Computed fee.
    pub fee_amount: Decimal,
    /// Amount minus fee.
    pub net_amount: Decimal,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Record update time.
    pub updated_at: DateTime<Utc>,
}

/// Computes the partner fee for `amount` under the given policy terms.
///
/// The raw fee `amount * percentage + fixed_fee` is rounded half-up
/// (midpoint away from zero) to the decimal scale of the input amount, so an
/// integer amount yields an integer fee. Half-up was chosen over banker's
/// rounding to match how the fee table is published to partners.
#[must_use]
pub fn compute_fee(amount: Decimal, percentage: Decimal, fixed_fee: Decimal) -> Decimal {
    (amount * percentage + fixed_fee)
        .round_dp_with_strategy(amount.scale(), RoundingStrategy::MidpointAwayFromZero)
}
