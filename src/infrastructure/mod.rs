//! Adapters for the domain ports: the crypto primitives and an in-memory
//! gateway.

pub mod crypto;
pub mod in_memory;
