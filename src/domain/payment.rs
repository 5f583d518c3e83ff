use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result code the gateway reports for a successfully processed call.
pub const CALL_COMPLETED: &str = "CALL_COMPLETED";

/// Session state of a freshly created payment session.
pub const SESSION_WAITING: &str = "WAITING";

/// A total price in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Converts an amount in major units (e.g. `19.99`) into cents.
    ///
    /// Negative amounts and amounts with more than two decimal places are
    /// rejected rather than rounded.
    pub fn from_major_units(amount: Decimal) -> Result<Self, PaymentError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PaymentError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }
        let cents = amount.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(|| {
            PaymentError::ValidationError(format!("Price {} is out of range", amount))
        })?;
        if !cents.fract().is_zero() {
            return Err(PaymentError::ValidationError(format!(
                "Price {} has more than two decimal places",
                amount
            )));
        }
        u64::try_from(cents.trunc())
            .map(Self)
            .map_err(|_| PaymentError::ValidationError(format!("Price {} is out of range", amount)))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment order as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub product_name: String,
    pub total_price: Price,
    pub variable_symbol: String,
}

impl Payment {
    pub fn new(
        product_name: impl Into<String>,
        total_price: Price,
        variable_symbol: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            total_price,
            variable_symbol: variable_symbol.into(),
        }
    }
}

/// Lifecycle of a payment created through the gateway.
///
/// `Initiated -> Waiting -> {Confirmed | Rejected}`. Rejection is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Initiated,
    Waiting,
    Confirmed,
    Rejected,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Waiting => "waiting",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of creating a payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedPayment {
    /// The gateway response was authentic and matched the order.
    Confirmed { payment_session_id: Option<u64> },
    Rejected,
}

impl CreatedPayment {
    pub fn state(&self) -> PaymentState {
        match self {
            Self::Confirmed { .. } => PaymentState::Confirmed,
            Self::Rejected => PaymentState::Rejected,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Authenticated answer of a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusReport {
    pub session_state: String,
    pub payment_channel: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_from_major_units() {
        assert_eq!(Price::from_major_units(dec!(19.99)).unwrap(), Price::from_cents(1999));
        assert_eq!(Price::from_major_units(dec!(20)).unwrap(), Price::from_cents(2000));
        assert_eq!(Price::from_major_units(dec!(0.5)).unwrap(), Price::from_cents(50));
        assert_eq!(Price::from_major_units(dec!(0)).unwrap(), Price::from_cents(0));
    }

    #[test]
    fn test_price_rejects_fractional_cents() {
        assert!(matches!(
            Price::from_major_units(dec!(1.999)),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_price_rejects_negative() {
        assert!(matches!(
            Price::from_major_units(dec!(-1.00)),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_price_rejects_overflowing_amount() {
        assert!(matches!(
            Price::from_major_units(Decimal::MAX),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            Price::from_major_units(dec!(184467440737095516.16)),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_price_is_plain_decimal() {
        assert_eq!(Price::from_cents(1234567).to_string(), "1234567");
    }

    #[test]
    fn test_created_payment_state() {
        let confirmed = CreatedPayment::Confirmed {
            payment_session_id: Some(7),
        };
        assert!(confirmed.is_confirmed());
        assert_eq!(confirmed.state(), PaymentState::Confirmed);
        assert_eq!(CreatedPayment::Rejected.state(), PaymentState::Rejected);
        assert_eq!(PaymentState::Rejected.to_string(), "rejected");
    }
}
