use crate::domain::payment::{Payment, Price};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV row; `price` is in major currency units.
#[derive(Debug, Deserialize)]
struct PaymentRecord {
    product_name: String,
    price: Decimal,
    variable_symbol: String,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = PaymentError;

    fn try_from(record: PaymentRecord) -> Result<Self> {
        if record.product_name.is_empty() {
            return Err(PaymentError::ValidationError(
                "product_name must not be empty".to_string(),
            ));
        }
        if record.variable_symbol.is_empty() {
            return Err(PaymentError::ValidationError(
                "variable_symbol must not be empty".to_string(),
            ));
        }
        Ok(Payment::new(
            record.product_name,
            Price::from_major_units(record.price)?,
            record.variable_symbol,
        ))
    }
}

/// Reads payment orders from a CSV source with the header
/// `product_name,price,variable_symbol`.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates payments.
    ///
    /// A bad row yields an error item; reading continues with the next row.
    pub fn payments(self) -> impl Iterator<Item = Result<Payment>> {
        self.reader.into_deserialize().map(|result| {
            result
                .map_err(PaymentError::from)
                .and_then(|record: PaymentRecord| Payment::try_from(record))
        })
    }
}
