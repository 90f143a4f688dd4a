//! TestPG wire-format types.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment::PaymentStatus;

/// Card payload encrypted into the request envelope.
///
/// The sandbox only validates the card number, so the remaining holder
/// fields carry fixed sandbox values supplied by the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPgCardPayload {
    /// Dash-separated 16-digit card number.
    pub card_number: String,
    /// Cardholder birth date, `yyyyMMdd`.
    pub birth_date: String,
    /// Card expiry, `MMyy`.
    pub expiry: String,
    /// First two digits of the card password.
    pub password: String,
    /// Charge amount.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

/// The outer request body: a single base64url ciphertext field.
#[derive(Debug, Clone, Serialize)]
pub struct TestPgEncryptedRequest {
    /// Encrypted [`TestPgCardPayload`] JSON.
    pub enc: String,
}

/// Successful approval response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPgResponse {
    /// Gateway-issued approval code.
    pub approval_code: String,
    /// Approval timestamp, naive gateway-local time.
    pub approved_at: NaiveDateTime,
    /// Last four digits echoed back masked.
    pub masked_card_last4: String,
    /// Approved amount.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Resulting payment status.
    pub status: PaymentStatus,
}

/// Error body returned with 4xx statuses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPgErrorResponse {
    /// Numeric gateway error code.
    pub code: i32,
    /// Symbolic decline reason, e.g. `INSUFFICIENT_LIMIT`.
    pub error_code: String,
    /// Human-readable gateway message.
    pub message: String,
    /// Gateway-side correlation id.
    #[serde(default)]
    pub reference_id: Option<String>,
}

/// Known decline reasons and their canonical codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineCode {
    /// 1001
    StolenOrLost,
    /// 1002
    InsufficientLimit,
    /// 1003
    ExpiredOrBlocked,
    /// 1004
    TamperedCard,
    /// 1005
    TamperedCardNotAccepted,
}

impl DeclineCode {
    /// Maps a symbolic reason string to a known decline code.
    #[must_use]
    pub fn from_reason(reason: &str) -> Option<Self> {
        match reason {
            "STOLEN_OR_LOST" => Some(Self::StolenOrLost),
            "INSUFFICIENT_LIMIT" => Some(Self::InsufficientLimit),
            "EXPIRED_OR_BLOCKED" => Some(Self::ExpiredOrBlocked),
            "TAMPERED_CARD" => Some(Self::TamperedCard),
            "TAMPERED_CARD_NOT_ACCEPTED" => Some(Self::TamperedCardNotAccepted),
            _ => None,
        }
    }

    /// The canonical numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::StolenOrLost => 1001,
            Self::InsufficientLimit => 1002,
            Self::ExpiredOrBlocked => 1003,
            Self::TamperedCard => 1004,
            Self::TamperedCardNotAccepted => 1005,
        }
    }

    /// The symbolic reason string.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::StolenOrLost => "STOLEN_OR_LOST",
            Self::InsufficientLimit => "INSUFFICIENT_LIMIT",
            Self::ExpiredOrBlocked => "EXPIRED_OR_BLOCKED",
            Self::TamperedCard => "TAMPERED_CARD",
            Self::TamperedCardNotAccepted => "TAMPERED_CARD_NOT_ACCEPTED",
        }
    }

    /// Canonical English description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StolenOrLost => "stolen or lost card",
            Self::InsufficientLimit => "card limit exceeded",
            Self::ExpiredOrBlocked => "expired or suspended card",
            Self::TamperedCard => "counterfeit or tampered card",
            Self::TamperedCardNotAccepted => "counterfeit or tampered card (not accepted)",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_decline_code_table() {
        let cases = [
            ("STOLEN_OR_LOST", 1001),
            ("INSUFFICIENT_LIMIT", 1002),
            ("EXPIRED_OR_BLOCKED", 1003),
            ("TAMPERED_CARD", 1004),
            ("TAMPERED_CARD_NOT_ACCEPTED", 1005),
        ];
        for (reason, code) in cases {
            let decline = DeclineCode::from_reason(reason).unwrap();
            assert_eq!(decline.code(), code);
            assert_eq!(decline.reason(), reason);
        }
        assert!(DeclineCode::from_reason("SOMETHING_ELSE").is_none());
    }

    #[test]
    fn test_card_payload_serializes_numeric_amount() {
        let payload = TestPgCardPayload {
            card_number: "1111111111111111".to_owned(),
            birth_date: "19900101".to_owned(),
            expiry: "1227".to_owned(),
            password: "12".to_owned(),
            amount: dec!(10000),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            "{\"cardNumber\":\"1111111111111111\",\"birthDate\":\"19900101\",\"expiry\":\"1227\",\"password\":\"12\",\"amount\":10000}"
        );
    }

    #[test]
    fn test_response_deserializes() {
        let body = r#"{
            "approvalCode": "A12345",
            "approvedAt": "2024-01-15T10:30:00",
            "maskedCardLast4": "1111",
            "amount": 10000,
            "status": "APPROVED"
        }"#;
        let response: TestPgResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.approval_code, "A12345");
        assert_eq!(response.masked_card_last4, "1111");
        assert_eq!(response.amount, dec!(10000));
        assert_eq!(response.status, PaymentStatus::Approved);
    }

    #[test]
    fn test_error_response_deserializes_without_reference_id() {
        let body = r#"{"code": 1002, "errorCode": "INSUFFICIENT_LIMIT", "message": "limit"}"#;
        let error: TestPgErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(error.code, 1002);
        assert_eq!(error.error_code, "INSUFFICIENT_LIMIT");
        assert!(error.reference_id.is_none());
    }
}
