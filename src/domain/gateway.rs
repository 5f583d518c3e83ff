//! Wire-level request and response shapes exchanged with the gateway.
//!
//! Responses come from an untrusted party, so every field is optional; a missing
//! field fails verification instead of failing deserialization.

use serde::{Deserialize, Serialize};

/// Signed `createPaymentSession` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCommandRequest {
    #[serde(rename = "eshopGoId")]
    pub eshop_go_id: u64,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "totalPrice")]
    pub total_price: u64,
    #[serde(rename = "variableSymbol")]
    pub variable_symbol: String,
    #[serde(rename = "successURL")]
    pub success_url: String,
    #[serde(rename = "failedURL")]
    pub failed_url: String,
    #[serde(rename = "encryptedSignature")]
    pub encrypted_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSessionResponse {
    pub result: Option<String>,
    pub result_description: Option<String>,
    pub payment_session_id: Option<u64>,
    pub variable_symbol: Option<String>,
    pub product_name: Option<String>,
    pub total_price: Option<u64>,
    pub eshop_go_id: Option<u64>,
    pub buyer_go_id: Option<u64>,
    pub encrypted_signature: Option<String>,
}

/// Signed `paymentStatus` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSessionRequest {
    #[serde(rename = "eshopGoId")]
    pub eshop_go_id: u64,
    #[serde(rename = "paymentSessionId")]
    pub payment_session_id: u64,
    #[serde(rename = "encryptedSignature")]
    pub encrypted_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub result: Option<String>,
    pub result_description: Option<String>,
    pub session_state: Option<String>,
    pub payment_channel: Option<String>,
    pub variable_symbol: Option<String>,
    pub product_name: Option<String>,
    pub total_price: Option<u64>,
    pub eshop_go_id: Option<u64>,
    pub encrypted_signature: Option<String>,
}

/// Notification the gateway sends to the merchant when a session changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    #[serde(rename = "targetGoId")]
    pub target_go_id: u64,
    #[serde(rename = "paymentSessionId")]
    pub payment_session_id: u64,
    #[serde(rename = "variableSymbol")]
    pub variable_symbol: String,
    #[serde(rename = "encryptedSignature")]
    pub encrypted_signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_request_field_names() {
        let request = PaymentCommandRequest {
            eshop_go_id: 1001,
            product_name: "Widget".to_string(),
            total_price: 1999,
            variable_symbol: "VS42".to_string(),
            success_url: "https://x/ok".to_string(),
            failed_url: "https://x/fail".to_string(),
            encrypted_signature: "ab".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        for key in [
            "eshopGoId",
            "productName",
            "totalPrice",
            "variableSymbol",
            "successURL",
            "failedURL",
            "encryptedSignature",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: PaymentSessionResponse =
            serde_json::from_str(r#"{"result": "CALL_COMPLETED"}"#).unwrap();
        assert_eq!(response.result.as_deref(), Some("CALL_COMPLETED"));
        assert!(response.encrypted_signature.is_none());
    }
}
