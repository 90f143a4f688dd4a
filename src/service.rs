//! Payment orchestration.
//!
//! [`PaymentService::pay`] drives the full approval flow: partner lookup,
//! fee-policy resolution, provider selection, gateway approval, fee
//! computation, persistence, and metrics. Any failure before persistence
//! leaves no record behind.

use std::{fmt, sync::Arc};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::{
    error::{GatewayError, Result},
    payment::{self, Payment},
    provider::{PgApproveRequest, ProviderRegistry},
    store::{FeePolicyStore, MetricsSink, PartnerStore, PaymentStore},
};

/// A request to charge a partner's customer.
#[derive(Debug, Clone)]
pub struct PaymentCommand {
    /// The partner initiating the charge.
    pub partner_id: i64,
    /// Charge amount.
    pub amount: Decimal,
    /// First six digits of the card, if captured.
    pub card_bin: Option<String>,
    /// Last four digits of the card, if captured.
    pub card_last4: Option<String>,
    /// Optional product label, recorded for display only.
    pub product_name: Option<String>,
}

/// Orchestrates payment approval across stores, providers, and metrics.
pub struct PaymentService {
    partners: Arc<dyn PartnerStore>,
    fee_policies: Arc<dyn FeePolicyStore>,
    payments: Arc<dyn PaymentStore>,
    providers: ProviderRegistry,
    metrics: Arc<dyn MetricsSink>,
}

impl fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentService")
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}

impl PaymentService {
    /// Wires the service together.
    #[must_use]
    pub fn new(
        partners: Arc<dyn PartnerStore>,
        fee_policies: Arc<dyn FeePolicyStore>,
        payments: Arc<dyn PaymentStore>,
        providers: ProviderRegistry,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self { partners, fee_policies, payments, providers, metrics }
    }

    /// Executes a payment end to end and returns the persisted record.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::PartnerNotFound`] / [`GatewayError::PartnerInactive`]
    ///   for an unknown or disabled partner.
    /// - [`GatewayError::NoFeePolicy`] if no policy is effective now.
    /// - [`GatewayError::NoProviderAvailable`] if no adapter serves the
    ///   partner.
    /// - Any error surfaced by the selected provider's approval call, in
    ///   which case nothing is persisted.
    #[instrument(skip(self, command), fields(partner_id = command.partner_id))]
    pub async fn pay(&self, command: &PaymentCommand) -> Result<Payment> {
        let now = chrono::Utc::now();

        let partner = self
            .partners
            .find_by_id(command.partner_id)
            .ok_or(GatewayError::PartnerNotFound(command.partner_id))?;
        if !partner.active {
            return Err(GatewayError::PartnerInactive(partner.id));
        }

        let policy = self
            .fee_policies
            .find_effective_policy(partner.id, now)
            .ok_or(GatewayError::NoFeePolicy(partner.id))?;

        let provider = self.providers.select(partner.id)?;

        let approval = provider
            .approve(&PgApproveRequest {
                partner_id: partner.id,
                amount: command.amount,
                card_bin: command.card_bin.clone(),
                card_last4: command.card_last4.clone(),
                product_name: command.product_name.clone(),
            })
            .await?;

        let fee_amount = payment::compute_fee(command.amount, policy.percentage, policy.fixed_fee);
        let net_amount = command.amount - fee_amount;

        let record = Payment {
            id: None,
            partner_id: partner.id,
            amount: command.amount,
            card_bin: command.card_bin.clone(),
            card_last4: command.card_last4.clone(),
            approval_code: approval.approval_code,
            approved_at: approval.approved_at,
            status: approval.status,
            applied_fee_rate: policy.percentage,
            fee_amount,
            net_amount,
            created_at: now,
            updated_at: now,
        };
        let saved = self.payments.save(record);

        let partner_tag = partner.id.to_string();
        let tags = [("partner_id", partner_tag.as_str())];
        self.metrics.record_value(
            "payment.amount",
            command.amount.to_f64().unwrap_or_default(),
            &tags,
        );
        self.metrics.record_value("payment.fee", fee_amount.to_f64().unwrap_or_default(), &tags);

        info!(
            payment_id = saved.id,
            approval_code = %saved.approval_code,
            "payment approved and recorded"
        );

        Ok(saved)
    }
}
