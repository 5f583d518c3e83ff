#![allow(dead_code)]

use async_trait::async_trait;
use gopay::application::lifecycle::PaymentLifecycle;
use gopay::application::signature::SignatureService;
use gopay::config::{Config, ConfigHandle, Secret};
use gopay::domain::gateway::{
    PaymentCommandRequest, PaymentSessionRequest, PaymentSessionResponse, PaymentStatusResponse,
};
use gopay::domain::message::PaymentResult;
use gopay::domain::payment::{CALL_COMPLETED, Payment, Price, SESSION_WAITING};
use gopay::domain::ports::GatewayClient;
use gopay::error::{PaymentError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MERCHANT_ID: u64 = 1001;
pub const SECRET: &str = "s3cr3t";

pub fn test_config() -> Config {
    Config::new(MERCHANT_ID, Secret::new(SECRET), "https://x/ok", "https://x/fail").unwrap()
}

pub fn widget() -> Payment {
    Payment::new("Widget", Price::from_cents(1999), "VS42")
}

/// Signature the gateway would send for `payment` in `state`, made with `secret`.
pub fn result_signature(payment: &Payment, state: &str, secret: &str) -> String {
    let result = PaymentResult::new(
        MERCHANT_ID,
        &payment.product_name,
        payment.total_price.cents(),
        &payment.variable_symbol,
        CALL_COMPLETED,
        state,
    );
    SignatureService::default()
        .sign(&result, &Secret::new(secret))
        .unwrap()
}

/// A response echoing `payment` exactly and signed with the merchant secret.
pub fn genuine_response(payment: &Payment) -> PaymentSessionResponse {
    PaymentSessionResponse {
        result: Some(CALL_COMPLETED.to_string()),
        result_description: Some(SESSION_WAITING.to_string()),
        payment_session_id: Some(3_000_000_001),
        variable_symbol: Some(payment.variable_symbol.clone()),
        product_name: Some(payment.product_name.clone()),
        total_price: Some(payment.total_price.cents()),
        eshop_go_id: Some(MERCHANT_ID),
        buyer_go_id: None,
        encrypted_signature: Some(result_signature(payment, SESSION_WAITING, SECRET)),
    }
}

/// Gateway double returning canned responses and recording what it was sent.
/// A `None` response simulates a transport failure.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    pub session_response: Option<PaymentSessionResponse>,
    pub status_response: Option<PaymentStatusResponse>,
    pub sent_commands: Arc<Mutex<Vec<PaymentCommandRequest>>>,
    pub sent_sessions: Arc<Mutex<Vec<PaymentSessionRequest>>>,
}

impl ScriptedGateway {
    pub fn answering(response: PaymentSessionResponse) -> Self {
        Self {
            session_response: Some(response),
            ..Default::default()
        }
    }

    pub fn answering_status(response: PaymentStatusResponse) -> Self {
        Self {
            status_response: Some(response),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GatewayClient for ScriptedGateway {
    async fn create_payment_session(
        &self,
        request: PaymentCommandRequest,
    ) -> Result<PaymentSessionResponse> {
        self.sent_commands.lock().await.push(request);
        self.session_response
            .clone()
            .ok_or_else(|| PaymentError::GatewayError("connection refused".to_string()))
    }

    async fn payment_status(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentStatusResponse> {
        self.sent_sessions.lock().await.push(request);
        self.status_response
            .clone()
            .ok_or_else(|| PaymentError::GatewayError("connection refused".to_string()))
    }
}

pub fn lifecycle_with(gateway: impl GatewayClient + 'static) -> PaymentLifecycle {
    PaymentLifecycle::new(
        Arc::new(ConfigHandle::new(test_config())),
        SignatureService::default(),
        Box::new(gateway),
    )
}
