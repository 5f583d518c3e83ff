use crate::application::signature::SignatureService;
use crate::config::Config;
use crate::domain::gateway::{
    PaymentCommandRequest, PaymentSessionRequest, PaymentSessionResponse, PaymentStatusResponse,
};
use crate::domain::message::{PaymentCommand, PaymentResult, PaymentSession, PaymentStatus};
use crate::domain::payment::{CALL_COMPLETED, SESSION_WAITING};
use crate::domain::ports::GatewayClient;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Result code returned for calls the gateway refuses.
pub const CALL_FAILED: &str = "FAILED";

const FIRST_SESSION_ID: u64 = 3_000_000_001;

#[derive(Debug, Clone)]
struct Session {
    product_name: String,
    total_price: u64,
    variable_symbol: String,
    state: String,
    payment_channel: String,
}

/// A gateway simulator that runs the gateway's side of the protocol in memory.
///
/// It checks the signature of every incoming request with the merchant's
/// secret and signs its answers the same way the real gateway does. Sessions
/// live in `Arc<RwLock<HashMap<..>>>`, so clones share state.
#[derive(Clone)]
pub struct InMemoryGateway {
    merchant: Arc<Config>,
    signer: Arc<SignatureService>,
    sessions: Arc<RwLock<HashMap<u64, Session>>>,
    next_session_id: Arc<AtomicU64>,
}

impl InMemoryGateway {
    /// Creates a gateway that knows a single merchant.
    pub fn new(merchant: Config) -> Self {
        Self::with_signer(merchant, SignatureService::default())
    }

    pub fn with_signer(merchant: Config, signer: SignatureService) -> Self {
        Self {
            merchant: Arc::new(merchant),
            signer: Arc::new(signer),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_session_id: Arc::new(AtomicU64::new(FIRST_SESSION_ID)),
        }
    }

    /// Moves a session to a new state, as the gateway does once the buyer pays
    /// or cancels. Returns `false` for unknown sessions.
    pub async fn set_session_state(
        &self,
        payment_session_id: u64,
        state: impl Into<String>,
        payment_channel: impl Into<String>,
    ) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&payment_session_id) {
            Some(session) => {
                session.state = state.into();
                session.payment_channel = payment_channel.into();
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn refused(description: &str) -> PaymentSessionResponse {
        PaymentSessionResponse {
            result: Some(CALL_FAILED.to_string()),
            result_description: Some(description.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl GatewayClient for InMemoryGateway {
    async fn create_payment_session(
        &self,
        request: PaymentCommandRequest,
    ) -> Result<PaymentSessionResponse> {
        let merchant = &self.merchant;
        if request.eshop_go_id != merchant.merchant_id {
            tracing::warn!(eshop_go_id = request.eshop_go_id, "Unknown merchant");
            return Ok(Self::refused("UNKNOWN_ESHOP"));
        }

        let command = PaymentCommand::new(
            request.eshop_go_id,
            &request.product_name,
            request.total_price,
            &request.variable_symbol,
            &request.failed_url,
            &request.success_url,
        );
        if !self
            .signer
            .verify(&command, &merchant.secret, &request.encrypted_signature)
        {
            tracing::warn!(variable_symbol = %request.variable_symbol, "Invalid command signature");
            return Ok(Self::refused("INVALID_SIGNATURE"));
        }

        let payment_session_id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
        let session = Session {
            product_name: request.product_name.trim().to_string(),
            total_price: request.total_price,
            variable_symbol: request.variable_symbol.trim().to_string(),
            state: SESSION_WAITING.to_string(),
            payment_channel: String::new(),
        };

        let result = PaymentResult::new(
            merchant.merchant_id,
            &session.product_name,
            session.total_price,
            &session.variable_symbol,
            CALL_COMPLETED,
            &session.state,
        );
        let encrypted_signature = self.signer.sign(&result, &merchant.secret)?;

        let response = PaymentSessionResponse {
            result: Some(CALL_COMPLETED.to_string()),
            result_description: Some(session.state.clone()),
            payment_session_id: Some(payment_session_id),
            variable_symbol: Some(session.variable_symbol.clone()),
            product_name: Some(session.product_name.clone()),
            total_price: Some(session.total_price),
            eshop_go_id: Some(merchant.merchant_id),
            buyer_go_id: None,
            encrypted_signature: Some(encrypted_signature),
        };

        self.sessions.write().await.insert(payment_session_id, session);
        tracing::debug!(payment_session_id, "Session opened");
        Ok(response)
    }

    async fn payment_status(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentStatusResponse> {
        let merchant = &self.merchant;
        let reference = PaymentSession::new(request.eshop_go_id, request.payment_session_id);
        if request.eshop_go_id != merchant.merchant_id
            || !self
                .signer
                .verify(&reference, &merchant.secret, &request.encrypted_signature)
        {
            return Ok(PaymentStatusResponse {
                result: Some(CALL_FAILED.to_string()),
                result_description: Some("INVALID_SIGNATURE".to_string()),
                ..Default::default()
            });
        }

        let sessions = self.sessions.read().await;
        let Some(session) = sessions.get(&request.payment_session_id) else {
            return Ok(PaymentStatusResponse {
                result: Some(CALL_FAILED.to_string()),
                result_description: Some("UNKNOWN_SESSION".to_string()),
                ..Default::default()
            });
        };

        let status = PaymentStatus::new(
            merchant.merchant_id,
            &session.product_name,
            session.total_price,
            &session.variable_symbol,
            CALL_COMPLETED,
            &session.state,
            &session.payment_channel,
        );

        Ok(PaymentStatusResponse {
            result: Some(CALL_COMPLETED.to_string()),
            result_description: Some(session.state.clone()),
            session_state: Some(session.state.clone()),
            payment_channel: Some(session.payment_channel.clone()),
            variable_symbol: Some(session.variable_symbol.clone()),
            product_name: Some(session.product_name.clone()),
            total_price: Some(session.total_price),
            eshop_go_id: Some(merchant.merchant_id),
            encrypted_signature: Some(self.signer.sign(&status, &merchant.secret)?),
        })
    }
}
