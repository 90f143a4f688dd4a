//! TestPG [`PgProvider`] implementation.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{GatewayError, Result},
    provider::{PgApproveRequest, PgApproveResult, PgProvider},
    testpg::{
        config::TestPgConfig,
        crypto,
        dto::{
            DeclineCode, TestPgCardPayload, TestPgEncryptedRequest, TestPgErrorResponse,
            TestPgResponse,
        },
    },
    transport::PgTransport,
};

const APPROVE_ENDPOINT: &str = "/api/v1/pay/credit-card";
const API_KEY_HEADER: &str = "API-KEY";

/// Fixed sandbox holder fields; the gateway only validates the card number.
const SANDBOX_BIRTH_DATE: &str = "19900101";
const SANDBOX_EXPIRY: &str = "1227";
const SANDBOX_PASSWORD: &str = "12";

/// TestPG adapter.
///
/// Serves exactly one partner (per [`TestPgConfig::partner_id`]) and
/// performs the full encrypted approval round trip.
pub struct TestPgProvider {
    config: TestPgConfig,
    transport: Arc<dyn PgTransport>,
}

impl fmt::Debug for TestPgProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPgProvider").field("config", &self.config).finish_non_exhaustive()
    }
}

impl TestPgProvider {
    /// Creates an adapter over the given transport.
    #[must_use]
    pub fn new(config: TestPgConfig, transport: Arc<dyn PgTransport>) -> Self {
        Self { config, transport }
    }

    /// Reconstructs a full 16-digit card number from the stored BIN and
    /// last four digits, as one undashed digit string.
    ///
    /// Only the first six and last four digits survive in storage; the
    /// middle six are synthesized. The sandbox success card gets its real
    /// middle so the known-good number round-trips exactly; everything
    /// else gets the sandbox failure middle.
    fn synthesize_card_number(bin: &str, last4: &str) -> String {
        let middle = if bin == "111111" && last4 == "1111" { "111111" } else { "222222" };
        format!("{bin}{middle}{last4}")
    }

    fn build_payload(&self, request: &PgApproveRequest) -> Result<TestPgCardPayload> {
        let bin = request
            .card_bin
            .as_deref()
            .ok_or_else(|| GatewayError::InvalidRequest("card BIN is required".to_owned()))?;
        let last4 = request.card_last4.as_deref().ok_or_else(|| {
            GatewayError::InvalidRequest("card last four digits are required".to_owned())
        })?;

        Ok(TestPgCardPayload {
            card_number: Self::synthesize_card_number(bin, last4),
            birth_date: SANDBOX_BIRTH_DATE.to_owned(),
            expiry: SANDBOX_EXPIRY.to_owned(),
            password: SANDBOX_PASSWORD.to_owned(),
            amount: request.amount,
        })
    }

    /// Reclassifies a non-2xx reply into the domain error taxonomy.
    fn classify_failure(status: u16, body: String) -> GatewayError {
        match status {
            400 => GatewayError::InvalidRequest(body),
            401 => {
                error!("gateway rejected API key");
                GatewayError::AuthenticationFailed(body)
            }
            422 => match serde_json::from_str::<TestPgErrorResponse>(&body) {
                Ok(decline) => match DeclineCode::from_reason(&decline.error_code) {
                    Some(known) => GatewayError::Declined {
                        code: known.code(),
                        reason: known.reason().to_owned(),
                        message: known.message().to_owned(),
                    },
                    None => GatewayError::Declined {
                        code: decline.code,
                        reason: decline.error_code,
                        message: decline.message,
                    },
                },
                Err(_) => GatewayError::UnexpectedProvider { status, body },
            },
            _ => GatewayError::UnexpectedProvider { status, body },
        }
    }
}

#[async_trait]
impl PgProvider for TestPgProvider {
    fn supports(&self, partner_id: i64) -> bool {
        partner_id == self.config.partner_id
    }

    #[instrument(skip(self, request), fields(partner_id = request.partner_id))]
    async fn approve(&self, request: &PgApproveRequest) -> Result<PgApproveResult> {
        let payload = self.build_payload(request)?;
        let plaintext = serde_json::to_string(&payload)
            .map_err(|e| GatewayError::InvalidRequest(format!("payload serialization: {e}")))?;
        let enc = crypto::encrypt(&plaintext, &self.config.api_key, &self.config.iv_base64url)?;

        let url = format!("{}{APPROVE_ENDPOINT}", self.config.base_url);
        let body = serde_json::to_value(TestPgEncryptedRequest { enc })
            .map_err(|e| GatewayError::InvalidRequest(format!("envelope serialization: {e}")))?;

        let reply = match self
            .transport
            .post_json(&url, &[(API_KEY_HEADER, self.config.api_key.as_str())], &body)
            .await
        {
            Ok(reply) => reply,
            Err(GatewayError::UnexpectedProvider { status, body }) => {
                warn!(status, "gateway returned failure status");
                return Err(Self::classify_failure(status, body));
            }
            Err(other) => return Err(other),
        };

        let response: TestPgResponse =
            serde_json::from_slice(&reply.body).map_err(|_| GatewayError::UnexpectedProvider {
                status: reply.status,
                body: String::from_utf8_lossy(&reply.body).into_owned(),
            })?;

        info!(approval_code = %response.approval_code, "payment approved");

        Ok(PgApproveResult {
            approval_code: response.approval_code,
            approved_at: response.approved_at.and_utc(),
            status: response.status,
        })
    }
}
