//! In-memory store implementations.
//!
//! Thread-safe map/vec-backed stores used by the test suite and by
//! embedders that want the orchestration logic without a database.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    partner::{self, FeePolicy, Partner},
    payment::Payment,
    store::{
        FeePolicyStore, PartnerStore, PaymentPage, PaymentQuery, PaymentStore, PaymentSummary,
    },
};

/// Map-backed [`PartnerStore`].
#[derive(Debug, Default)]
pub struct InMemoryPartnerStore {
    partners: Mutex<HashMap<i64, Partner>>,
}

impl InMemoryPartnerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a partner.
    pub fn insert(&self, partner: Partner) {
        self.partners
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(partner.id, partner);
    }
}

impl PartnerStore for InMemoryPartnerStore {
    fn find_by_id(&self, id: i64) -> Option<Partner> {
        self.partners
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

/// Vec-backed [`FeePolicyStore`].
#[derive(Debug, Default)]
pub struct InMemoryFeePolicyStore {
    policies: Mutex<Vec<FeePolicy>>,
}

impl InMemoryFeePolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a policy version.
    pub fn insert(&self, policy: FeePolicy) {
        self.policies.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(policy);
    }
}

impl FeePolicyStore for InMemoryFeePolicyStore {
    fn find_effective_policy(&self, partner_id: i64, at: DateTime<Utc>) -> Option<FeePolicy> {
        let policies = self.policies.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        partner::effective_policy(&policies, partner_id, at).cloned()
    }
}

/// Vec-backed [`PaymentStore`] with id assignment and keyset pagination.
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    payments: Mutex<Vec<Payment>>,
    next_id: AtomicI64,
}

impl InMemoryPaymentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { payments: Mutex::new(Vec::new()), next_id: AtomicI64::new(1) }
    }

    fn matches_filter(payment: &Payment, query: &PaymentQuery) -> bool {
        if query.partner_id.is_some_and(|p| p != payment.partner_id) {
            return false;
        }
        if query.status.is_some_and(|s| s != payment.status) {
            return false;
        }
        if query.from.is_some_and(|from| payment.created_at < from) {
            return false;
        }
        if query.to.is_some_and(|to| payment.created_at > to) {
            return false;
        }
        true
    }

    fn before_cursor(payment: &Payment, query: &PaymentQuery) -> bool {
        match (query.cursor_created_at, query.cursor_id) {
            (Some(created_at), Some(id)) => {
                payment.created_at < created_at
                    || (payment.created_at == created_at && payment.id.unwrap_or(0) < id)
            }
            _ => true,
        }
    }
}

impl PaymentStore for InMemoryPaymentStore {
    fn save(&self, mut payment: Payment) -> Payment {
        if payment.id.is_none() {
            payment.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst));
        }
        let mut payments =
            self.payments.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        payments.push(payment.clone());
        payment
    }

    fn find_by(&self, query: &PaymentQuery) -> PaymentPage {
        let payments = self.payments.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut matched: Vec<Payment> = payments
            .iter()
            .filter(|p| Self::matches_filter(p, query))
            .filter(|p| Self::before_cursor(p, query))
            .cloned()
            .collect();
        // Newest first; ids break timestamp ties deterministically.
        matched.sort_by(|a, b| {
            (b.created_at, b.id.unwrap_or(0)).cmp(&(a.created_at, a.id.unwrap_or(0)))
        });

        // Floor of 1 so a page can always carry its own cursor boundary.
        let limit = query.limit.max(1) as usize;
        let has_next = matched.len() > limit;
        matched.truncate(limit);

        let boundary = if has_next { matched.last() } else { None };
        PaymentPage {
            next_cursor_created_at: boundary.map(|p| p.created_at),
            next_cursor_id: boundary.and_then(|p| p.id),
            items: matched,
            has_next,
        }
    }

    fn summary(&self, query: &PaymentQuery) -> PaymentSummary {
        let payments = self.payments.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut count = 0u64;
        let mut total_amount = Decimal::ZERO;
        let mut total_net_amount = Decimal::ZERO;
        for payment in payments.iter().filter(|p| Self::matches_filter(p, query)) {
            count += 1;
            total_amount += payment.amount;
            total_net_amount += payment.net_amount;
        }

        PaymentSummary { count, total_amount, total_net_amount }
    }
}
