//! Digest and cipher primitives behind the signature protocol.
//!
//! `AesGcmCipher` is deterministic: the nonce is an HMAC of the plaintext under
//! the derived key, so signing the same message twice yields the same
//! signature and GCM's tag still rejects anything not produced with the secret.
//!
//! # Wire Format
//!
//! ```text
//! [12 bytes nonce][N bytes ciphertext][16 bytes auth tag]
//! ```

use crate::config::Secret;
use crate::domain::ports::Cipher;
use crate::error::{PaymentError, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const KEY_INFO: &[u8] = b"gopay-signature-key-v1";
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// SHA-1 digest of `data`.
pub fn sha1_digest(data: &[u8]) -> Vec<u8> {
    Sha1::digest(data).to_vec()
}

/// AES-256-GCM keyed by HKDF-SHA256 over the shared secret.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmCipher;

impl AesGcmCipher {
    pub fn new() -> Self {
        Self
    }

    fn derive_key(secret: &Secret) -> Result<[u8; 32]> {
        let hk = Hkdf::<Sha256>::new(None, secret.expose().as_bytes());
        let mut key = [0u8; 32];
        hk.expand(KEY_INFO, &mut key)
            .map_err(|e| PaymentError::CipherError(format!("key derivation failed: {}", e)))?;
        Ok(key)
    }

    fn derive_nonce(key: &[u8; 32], plaintext: &[u8]) -> Result<[u8; NONCE_SIZE]> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| PaymentError::CipherError(e.to_string()))?;
        mac.update(plaintext);
        let tag = mac.finalize().into_bytes();

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&tag[..NONCE_SIZE]);
        Ok(nonce)
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&self, secret: &Secret, plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = Self::derive_key(secret)?;
        let nonce = Self::derive_nonce(&key, plaintext)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| PaymentError::CipherError(format!("encryption failed: {}", e)))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decrypt(&self, secret: &Secret, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(PaymentError::CipherError(
                "ciphertext too short".to_string(),
            ));
        }
        let (nonce, body) = ciphertext.split_at(NONCE_SIZE);

        let key = Self::derive_key(secret)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|e| PaymentError::CipherError(format!("decryption failed: {}", e)))
    }
}
