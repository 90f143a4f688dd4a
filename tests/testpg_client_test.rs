//! TestPG adapter tests against a stub transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use paygate::{
    GatewayError, PaymentStatus, PgApproveRequest, PgProvider, TestPgConfig, TestPgProvider,
    transport::{PgTransport, TransportReply},
};
use rust_decimal_macros::dec;

type RecordedCall = (String, Vec<(String, String)>, serde_json::Value);

#[derive(Default)]
struct StubTransport {
    reply: Mutex<Option<paygate::Result<TransportReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTransport {
    fn replying(reply: paygate::Result<TransportReply>) -> Arc<Self> {
        Arc::new(Self { reply: Mutex::new(Some(reply)), calls: Mutex::new(Vec::new()) })
    }

    fn success(body: &str) -> Arc<Self> {
        Self::replying(Ok(TransportReply { status: 200, body: body.as_bytes().to_vec() }))
    }

    fn failure(status: u16, body: &str) -> Arc<Self> {
        Self::replying(Err(GatewayError::UnexpectedProvider { status, body: body.to_owned() }))
    }
}

#[async_trait]
impl PgTransport for StubTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> paygate::Result<TransportReply> {
        self.calls.lock().unwrap().push((
            url.to_owned(),
            headers.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
            body.clone(),
        ));
        self.reply.lock().unwrap().take().unwrap_or_else(|| {
            Ok(TransportReply { status: 200, body: Vec::new() })
        })
    }
}

const SUCCESS_BODY: &str = r#"{
    "approvalCode": "AP-778899",
    "approvedAt": "2024-01-15T10:30:00",
    "maskedCardLast4": "1111",
    "amount": 10000,
    "status": "APPROVED"
}"#;

fn provider(transport: Arc<StubTransport>) -> TestPgProvider {
    TestPgProvider::new(TestPgConfig::default(), transport)
}

fn request() -> PgApproveRequest {
    PgApproveRequest {
        partner_id: 2,
        amount: dec!(10000),
        card_bin: Some("111111".to_owned()),
        card_last4: Some("1111".to_owned()),
        product_name: None,
    }
}

#[tokio::test]
async fn test_successful_approval_maps_response() {
    let transport = StubTransport::success(SUCCESS_BODY);
    let result = provider(transport.clone()).approve(&request()).await.unwrap();

    assert_eq!(result.approval_code, "AP-778899");
    assert_eq!(result.status, PaymentStatus::Approved);
    assert_eq!(result.approved_at.to_rfc3339(), "2024-01-15T10:30:00+00:00");
}

#[tokio::test]
async fn test_request_carries_api_key_header_and_encrypted_envelope() {
    let transport = StubTransport::success(SUCCESS_BODY);
    provider(transport.clone()).approve(&request()).await.unwrap();

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (url, headers, body) = &calls[0];

    assert_eq!(url, "https://api-test-pg.bigs.im/api/v1/pay/credit-card");
    assert_eq!(
        headers,
        &vec![("API-KEY".to_owned(), "11111111-1111-4111-8111-111111111111".to_owned())]
    );

    // The body is a single-field envelope holding unpadded base64url.
    let envelope = body.as_object().unwrap();
    assert_eq!(envelope.len(), 1);
    let enc = envelope["enc"].as_str().unwrap();
    assert!(!enc.contains('='));
    assert!(URL_SAFE_NO_PAD.decode(enc).is_ok());
}

#[tokio::test]
async fn test_400_maps_to_invalid_request() {
    let transport = StubTransport::failure(400, "malformed enc");
    let err = provider(transport).approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_401_maps_to_authentication_failed() {
    let transport = StubTransport::failure(401, "bad api key");
    let err = provider(transport).approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_422_known_reason_maps_to_canonical_decline() {
    let body = r#"{"code": 1002, "errorCode": "INSUFFICIENT_LIMIT", "message": "limit hit"}"#;
    let transport = StubTransport::failure(422, body);
    let err = provider(transport).approve(&request()).await.unwrap_err();

    match err {
        GatewayError::Declined { code, reason, message } => {
            assert_eq!(code, 1002);
            assert_eq!(reason, "INSUFFICIENT_LIMIT");
            assert_eq!(message, "card limit exceeded");
        }
        other => panic!("expected Declined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_422_unknown_reason_keeps_gateway_fields() {
    let body = r#"{"code": 77, "errorCode": "VELOCITY_LIMIT", "message": "slow down"}"#;
    let transport = StubTransport::failure(422, body);
    let err = provider(transport).approve(&request()).await.unwrap_err();

    match err {
        GatewayError::Declined { code, reason, message } => {
            assert_eq!(code, 77);
            assert_eq!(reason, "VELOCITY_LIMIT");
            assert_eq!(message, "slow down");
        }
        other => panic!("expected Declined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_422_with_unparsable_body_stays_unexpected() {
    let transport = StubTransport::failure(422, "<html>oops</html>");
    let err = provider(transport).approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::UnexpectedProvider { status: 422, .. }));
}

#[tokio::test]
async fn test_500_stays_unexpected() {
    let transport = StubTransport::failure(500, "internal");
    let err = provider(transport).approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::UnexpectedProvider { status: 500, .. }));
}

#[tokio::test]
async fn test_unparsable_success_body_is_unexpected() {
    let transport = StubTransport::success("not json");
    let err = provider(transport).approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::UnexpectedProvider { status: 200, .. }));
}

#[tokio::test]
async fn test_supports_only_configured_partner() {
    let transport = StubTransport::success(SUCCESS_BODY);
    let provider = provider(transport);
    assert!(provider.supports(2));
    assert!(!provider.supports(1));
    assert!(!provider.supports(3));
}

#[tokio::test]
async fn test_missing_card_fields_fail_before_any_network_call() {
    let transport = StubTransport::success(SUCCESS_BODY);
    let provider = provider(transport.clone());

    let mut incomplete = request();
    incomplete.card_bin = None;
    let err = provider.approve(&incomplete).await.unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRequest(_)));
    assert!(transport.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_iv_config_fails_before_any_network_call() {
    let transport = StubTransport::success(SUCCESS_BODY);
    let config = TestPgConfig {
        iv_base64url: "short".to_owned(),
        ..TestPgConfig::default()
    };
    let provider = TestPgProvider::new(config, transport.clone());

    let err = provider.approve(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidRequest(_)));
    assert!(transport.calls.lock().unwrap().is_empty());
}
