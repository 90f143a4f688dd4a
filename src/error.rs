//! Error types for the payment gateway core.
//!
//! All fallible operations in this crate return [`Result`], built on a single
//! [`GatewayError`] enum via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Lookup failures** ([`GatewayError::PartnerNotFound`]): the referenced
//!   entity does not exist.
//! - **Precondition failures** ([`GatewayError::PartnerInactive`],
//!   [`GatewayError::NoFeePolicy`], [`GatewayError::NoProviderAvailable`]):
//!   the request is well-formed but the system state forbids it.
//! - **Provider failures** ([`GatewayError::InvalidRequest`],
//!   [`GatewayError::AuthenticationFailed`], [`GatewayError::Declined`],
//!   [`GatewayError::UnexpectedProvider`]): outcomes of the external PG call,
//!   classified by HTTP status.
//! - **Transport/crypto failures** ([`GatewayError::HttpError`],
//!   [`GatewayError::CryptoError`]): infrastructure-level problems.
//!
//! None of these are retried anywhere in the crate; a single approval attempt
//! is made per payment and the error propagates to the caller unchanged.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while orchestrating or querying payments.
///
/// Variants carry enough context for the boundary layer to map them to a
/// response; the core never translates one variant into another except where
/// the provider adapter classifies raw HTTP failures.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No partner exists with the given id.
    #[error("partner not found: {0}")]
    PartnerNotFound(i64),

    /// The partner exists but has been deactivated.
    ///
    /// Deactivation is administered outside this crate; payments for an
    /// inactive partner are rejected before any provider is contacted.
    #[error("partner {0} is inactive")]
    PartnerInactive(i64),

    /// No fee policy is effective for the partner at the requested instant.
    #[error("no effective fee policy for partner {0}")]
    NoFeePolicy(i64),

    /// No registered provider adapter supports the partner.
    ///
    /// Provider selection is a first-match scan over a configured, ordered
    /// list; this error is business-fatal and never triggers a fallback.
    #[error("no payment provider supports partner {0}")]
    NoProviderAvailable(i64),

    /// The provider request could not be built or was rejected as malformed
    /// (missing card fields, bad IV configuration, HTTP 400 from the provider).
    #[error("invalid provider request: {0}")]
    InvalidRequest(String),

    /// The provider rejected our credentials (HTTP 401).
    ///
    /// Credentials are static configuration, so this is a deployment problem
    /// and is never retried automatically.
    #[error("provider authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider declined the payment (HTTP 422).
    ///
    /// This is an expected, frequent business outcome rather than a system
    /// fault. `code` and `reason` come from the provider's decline taxonomy.
    #[error("payment declined: [{code}] {reason}: {message}")]
    Declined {
        /// Numeric decline code (e.g. 1002).
        code: i32,
        /// Symbolic decline reason (e.g. `INSUFFICIENT_LIMIT`).
        reason: String,
        /// Human-readable decline message.
        message: String,
    },

    /// The provider returned a status outside the classified set, or the
    /// response body could not be decoded.
    #[error("unexpected provider error: status {status}, body: {body}")]
    UnexpectedProvider {
        /// Raw HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// HTTP transport failure (timeout, connection refused, TLS error).
    ///
    /// Timeouts are bounded by the transport configuration and surface here;
    /// they are terminal for the containing request.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// A cryptographic operation failed.
    #[error("cryptographic operation failed: {0}")]
    CryptoError(String),

    /// Invalid static configuration.
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GatewayError::PartnerNotFound(7);
        assert_eq!(error.to_string(), "partner not found: 7");
    }

    #[test]
    fn test_declined_display_carries_code_and_reason() {
        let error = GatewayError::Declined {
            code: 1002,
            reason: "INSUFFICIENT_LIMIT".to_owned(),
            message: "card limit exceeded".to_owned(),
        };
        let text = error.to_string();
        assert!(text.contains("1002"));
        assert!(text.contains("INSUFFICIENT_LIMIT"));
    }

    #[test]
    fn test_unexpected_provider_display() {
        let error = GatewayError::UnexpectedProvider { status: 503, body: "oops".to_owned() };
        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("oops"));
    }
}
