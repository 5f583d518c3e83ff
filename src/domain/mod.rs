//! Domain layer: the signable message family, payment value objects and the
//! ports through which the application talks to the gateway and the cipher.

pub mod canonical;
pub mod gateway;
pub mod message;
pub mod payment;
pub mod ports;
