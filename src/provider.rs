//! Provider adapter abstraction and registry.
//!
//! Every external payment gateway is wrapped in one adapter implementing
//! [`PgProvider`]. The [`ProviderRegistry`] holds the adapters as an ordered
//! list — ordering is configuration-significant — and selects the first one
//! whose `supports` accepts the partner. Exactly one adapter is invoked per
//! payment; an adapter failure propagates as a failed payment and never
//! triggers a fallback to another adapter.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{GatewayError, Result},
    payment::PaymentStatus,
};

/// Approval request handed to a provider adapter.
///
/// Transient value object; not persisted. Card identifiers are optional at
/// this level — individual adapters decide whether they require them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgApproveRequest {
    /// Partner the charge is made for.
    pub partner_id: i64,
    /// Amount to authorize.
    pub amount: Decimal,
    /// Card BIN (first six digits).
    pub card_bin: Option<String>,
    /// Last four card digits.
    pub card_last4: Option<String>,
    /// Optional product description forwarded to the provider.
    pub product_name: Option<String>,
}

/// Result of a successful provider approval call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgApproveResult {
    /// Provider approval code.
    pub approval_code: String,
    /// Approval timestamp reported by the provider.
    pub approved_at: DateTime<Utc>,
    /// Status mapped from the provider response.
    pub status: PaymentStatus,
}

/// Capability interface of one payment-gateway adapter.
#[async_trait]
pub trait PgProvider: Send + Sync {
    /// Whether this adapter handles payments for the partner.
    fn supports(&self, partner_id: i64) -> bool;

    /// Executes one approval call against the external gateway.
    ///
    /// # Errors
    ///
    /// Adapter-specific; see [`crate::error::GatewayError`] for the
    /// classification contract. Errors propagate unmodified to the caller.
    async fn approve(&self, request: &PgApproveRequest) -> Result<PgApproveResult>;
}

/// Ordered set of provider adapters with first-match selection.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PgProvider>>,
}

impl ProviderRegistry {
    /// Creates a registry over the given adapters, preserving order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PgProvider>>) -> Self {
        Self { providers }
    }

    /// Selects the first adapter supporting the partner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NoProviderAvailable`] when no adapter matches.
    pub fn select(&self, partner_id: i64) -> Result<&Arc<dyn PgProvider>> {
        self.providers
            .iter()
            .find(|p| p.supports(partner_id))
            .ok_or(GatewayError::NoProviderAvailable(partner_id))
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry").field("providers", &self.providers.len()).finish()
    }
}
