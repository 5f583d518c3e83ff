//! The signable message family.
//!
//! Each type lists its fields in the order the gateway hashes them. That order
//! is part of the protocol: reordering fields changes every signature.

use super::canonical::encode;
use crate::config::Secret;
use crate::error::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A message whose fields participate, in a fixed order, in signing.
pub trait Signable {
    /// Returns the exact string that is hashed when signing this message.
    fn canonical_string(&self, secret: &Secret) -> String;
}

/// Builds a message from a JSON object holding exactly its declared fields.
///
/// Unknown keys are rejected rather than ignored.
pub fn from_fields<M>(fields: &str) -> Result<M>
where
    M: Signable + DeserializeOwned,
{
    Ok(serde_json::from_str(fields)?)
}

fn encode_trimmed<const N: usize>(fields: [&str; N], secret: &Secret) -> String {
    encode(fields.map(str::trim), secret.expose().trim())
}

/// Outgoing request that opens a payment session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentCommand {
    merchant_id: u64,
    product_name: String,
    total_price_in_cents: u64,
    variable_symbol: String,
    failed_url: String,
    success_url: String,
}

impl PaymentCommand {
    pub fn new(
        merchant_id: u64,
        product_name: impl Into<String>,
        total_price_in_cents: u64,
        variable_symbol: impl Into<String>,
        failed_url: impl Into<String>,
        success_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id,
            product_name: product_name.into(),
            total_price_in_cents,
            variable_symbol: variable_symbol.into(),
            failed_url: failed_url.into(),
            success_url: success_url.into(),
        }
    }

    pub fn merchant_id(&self) -> u64 {
        self.merchant_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn total_price_in_cents(&self) -> u64 {
        self.total_price_in_cents
    }

    pub fn variable_symbol(&self) -> &str {
        &self.variable_symbol
    }

    pub fn failed_url(&self) -> &str {
        &self.failed_url
    }

    pub fn success_url(&self) -> &str {
        &self.success_url
    }
}

impl Signable for PaymentCommand {
    // Only the product name and variable symbol are trimmed here, unlike every
    // other message. The live gateway hashes it this way.
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        let price = self.total_price_in_cents.to_string();
        encode(
            [
                merchant_id.as_str(),
                self.product_name.trim(),
                price.as_str(),
                self.variable_symbol.trim(),
                self.failed_url.as_str(),
                self.success_url.as_str(),
            ],
            secret.expose(),
        )
    }
}

/// Result of a payment session as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentResult {
    merchant_id: u64,
    product_name: String,
    total_price_in_cents: u64,
    variable_symbol: String,
    result: String,
    session_state: String,
}

impl PaymentResult {
    pub fn new(
        merchant_id: u64,
        product_name: impl Into<String>,
        total_price_in_cents: u64,
        variable_symbol: impl Into<String>,
        result: impl Into<String>,
        session_state: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id,
            product_name: product_name.into(),
            total_price_in_cents,
            variable_symbol: variable_symbol.into(),
            result: result.into(),
            session_state: session_state.into(),
        }
    }
}

impl Signable for PaymentResult {
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        let price = self.total_price_in_cents.to_string();
        encode_trimmed(
            [
                merchant_id.as_str(),
                self.product_name.as_str(),
                price.as_str(),
                self.variable_symbol.as_str(),
                self.result.as_str(),
                self.session_state.as_str(),
            ],
            secret,
        )
    }
}

/// Payment state returned by a status query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentStatus {
    merchant_id: u64,
    product_name: String,
    total_price_in_cents: u64,
    variable_symbol: String,
    result: String,
    session_state: String,
    payment_channel: String,
}

impl PaymentStatus {
    pub fn new(
        merchant_id: u64,
        product_name: impl Into<String>,
        total_price_in_cents: u64,
        variable_symbol: impl Into<String>,
        result: impl Into<String>,
        session_state: impl Into<String>,
        payment_channel: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id,
            product_name: product_name.into(),
            total_price_in_cents,
            variable_symbol: variable_symbol.into(),
            result: result.into(),
            session_state: session_state.into(),
            payment_channel: payment_channel.into(),
        }
    }
}

impl Signable for PaymentStatus {
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        let price = self.total_price_in_cents.to_string();
        encode_trimmed(
            [
                merchant_id.as_str(),
                self.product_name.as_str(),
                price.as_str(),
                self.variable_symbol.as_str(),
                self.result.as_str(),
                self.session_state.as_str(),
                self.payment_channel.as_str(),
            ],
            secret,
        )
    }
}

/// Reference to an open payment session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentSession {
    merchant_id: u64,
    payment_session_id: u64,
}

impl PaymentSession {
    pub fn new(merchant_id: u64, payment_session_id: u64) -> Self {
        Self {
            merchant_id,
            payment_session_id,
        }
    }

    pub fn merchant_id(&self) -> u64 {
        self.merchant_id
    }

    pub fn payment_session_id(&self) -> u64 {
        self.payment_session_id
    }
}

impl Signable for PaymentSession {
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        let session_id = self.payment_session_id.to_string();
        encode_trimmed([merchant_id.as_str(), session_id.as_str()], secret)
    }
}

/// Identifies a session in gateway notifications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentIdentity {
    merchant_id: u64,
    payment_session_id: u64,
    variable_symbol: String,
}

impl PaymentIdentity {
    pub fn new(
        merchant_id: u64,
        payment_session_id: u64,
        variable_symbol: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id,
            payment_session_id,
            variable_symbol: variable_symbol.into(),
        }
    }
}

impl Signable for PaymentIdentity {
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        let session_id = self.payment_session_id.to_string();
        encode_trimmed(
            [
                merchant_id.as_str(),
                session_id.as_str(),
                self.variable_symbol.as_str(),
            ],
            secret,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Buyer {
    merchant_id: u64,
    buyer_user_name: String,
    buyer_email: String,
}

impl Buyer {
    pub fn new(
        merchant_id: u64,
        buyer_user_name: impl Into<String>,
        buyer_email: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id,
            buyer_user_name: buyer_user_name.into(),
            buyer_email: buyer_email.into(),
        }
    }
}

impl Signable for Buyer {
    fn canonical_string(&self, secret: &Secret) -> String {
        let merchant_id = self.merchant_id.to_string();
        encode_trimmed(
            [
                merchant_id.as_str(),
                self.buyer_user_name.as_str(),
                self.buyer_email.as_str(),
            ],
            secret,
        )
    }
}
