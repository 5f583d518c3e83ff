use crate::config::Secret;
use crate::domain::message::Signable;
use crate::domain::ports::CipherBox;
use crate::error::Result;
use crate::infrastructure::crypto::{AesGcmCipher, sha1_digest};
use subtle::ConstantTimeEq;

/// Produces and checks message signatures.
///
/// A signature is the SHA-1 digest of the message's canonical string,
/// encrypted with the shared secret and hex-encoded. The service holds no
/// per-call state; the secret is passed in from the caller's configuration
/// snapshot.
pub struct SignatureService {
    cipher: CipherBox,
}

impl Default for SignatureService {
    fn default() -> Self {
        Self::new(Box::new(AesGcmCipher::new()))
    }
}

impl SignatureService {
    pub fn new(cipher: CipherBox) -> Self {
        Self { cipher }
    }

    pub fn sign<M: Signable + ?Sized>(&self, message: &M, secret: &Secret) -> Result<String> {
        let digest = sha1_digest(message.canonical_string(secret).as_bytes());
        let encrypted = self.cipher.encrypt(secret, &digest)?;
        Ok(hex::encode(encrypted))
    }

    /// Checks `presented` against the digest of `message`.
    ///
    /// `message` must be built from values the caller already trusts, never
    /// from the body that carried the signature.
    pub fn verify<M: Signable + ?Sized>(
        &self,
        message: &M,
        secret: &Secret,
        presented: &str,
    ) -> bool {
        let expected = sha1_digest(message.canonical_string(secret).as_bytes());

        let encrypted = match hex::decode(presented.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Signature is not valid hex: {}", e);
                return false;
            }
        };

        let decrypted = match self.cipher.decrypt(secret, &encrypted) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Failed to decrypt signature: {}", e);
                return false;
            }
        };

        let matches: bool = expected.as_slice().ct_eq(decrypted.as_slice()).into();
        if !matches {
            tracing::debug!("Signature digest does not match message");
        }
        matches
    }
}
