//! Partner payment orchestration with pluggable payment-gateway adapters.
//!
//! This crate charges cards on behalf of registered partners and answers
//! history queries over the resulting records:
//!
//! - [`service::PaymentService`] runs the approval flow: partner lookup,
//!   time-versioned fee-policy resolution, provider selection, gateway
//!   approval, fee computation, and persistence.
//! - [`provider::ProviderRegistry`] routes each partner to the first
//!   registered adapter that claims it; [`testpg::TestPgProvider`] is the
//!   built-in adapter for the TestPG sandbox gateway and its encrypted
//!   request protocol.
//! - [`query::QueryService`] serves filtered, cursor-paginated history
//!   pages with whole-set aggregates.
//!
//! Storage and metrics are traits ([`store`]); [`in_memory`] provides
//! embeddable implementations.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use paygate::{
//!     PaymentCommand, PaymentService, ProviderRegistry, TestPgConfig, TestPgProvider,
//!     in_memory::{InMemoryFeePolicyStore, InMemoryPartnerStore, InMemoryPaymentStore},
//!     observability::TracingMetricsSink,
//!     transport::HttpTransport,
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn run() -> paygate::Result<()> {
//! paygate::observability::init_logging_from_env();
//!
//! let config = TestPgConfig::default();
//! config.validate()?;
//! let provider = TestPgProvider::new(config, Arc::new(HttpTransport::new()));
//! let registry = ProviderRegistry::new(vec![Arc::new(provider)]);
//!
//! let service = PaymentService::new(
//!     Arc::new(InMemoryPartnerStore::new()),
//!     Arc::new(InMemoryFeePolicyStore::new()),
//!     Arc::new(InMemoryPaymentStore::new()),
//!     registry,
//!     Arc::new(TracingMetricsSink::new()),
//! );
//!
//! let payment = service
//!     .pay(&PaymentCommand {
//!         partner_id: 2,
//!         amount: Decimal::new(10000, 0),
//!         card_bin: Some("111111".to_owned()),
//!         card_last4: Some("1111".to_owned()),
//!         product_name: None,
//!     })
//!     .await?;
//! println!("approved: {}", payment.approval_code);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod in_memory;
pub mod observability;
pub mod partner;
pub mod payment;
pub mod provider;
pub mod query;
pub mod service;
pub mod store;
pub mod testpg;
pub mod transport;

pub use error::{GatewayError, Result};
pub use payment::{Payment, PaymentStatus};
pub use provider::{PgApproveRequest, PgApproveResult, PgProvider, ProviderRegistry};
pub use query::{QueryFilter, QueryResult, QueryService};
pub use service::{PaymentCommand, PaymentService};
pub use testpg::{TestPgConfig, TestPgProvider};
