//! Application layer: signing and the payment lifecycle.
//!
//! `SignatureService` turns any signable message into an encrypted digest and
//! checks presented signatures. `PaymentLifecycle` drives session creation
//! through the gateway port and decides whether the gateway's answers can be
//! trusted.

pub mod lifecycle;
pub mod signature;
