use super::gateway::{
    PaymentCommandRequest, PaymentSessionRequest, PaymentSessionResponse, PaymentStatusResponse,
};
use crate::config::Secret;
use crate::error::Result;
use async_trait::async_trait;

/// Remote gateway. Transport failures are returned as errors; the content of a
/// successful response is never trusted here.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn create_payment_session(
        &self,
        request: PaymentCommandRequest,
    ) -> Result<PaymentSessionResponse>;
    async fn payment_status(&self, request: PaymentSessionRequest) -> Result<PaymentStatusResponse>;
}

/// Symmetric cipher keyed by the shared secret.
///
/// Implementations must satisfy `decrypt(s, encrypt(s, x)) == x` and must not
/// let anyone without the secret produce a ciphertext that decrypts.
pub trait Cipher: Send + Sync {
    fn encrypt(&self, secret: &Secret, plaintext: &[u8]) -> Result<Vec<u8>>;
    fn decrypt(&self, secret: &Secret, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

pub type GatewayClientBox = Box<dyn GatewayClient>;
pub type CipherBox = Box<dyn Cipher>;
