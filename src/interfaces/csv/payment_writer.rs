use crate::domain::gateway::PaymentCommandRequest;
use crate::domain::payment::PaymentState;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SignedRecord<'a> {
    variable_symbol: &'a str,
    product_name: &'a str,
    total_price: u64,
    encrypted_signature: &'a str,
}

#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    variable_symbol: &'a str,
    state: PaymentState,
}

/// Writes signed commands or lifecycle outcomes as CSV.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_signed(&mut self, request: &PaymentCommandRequest) -> Result<()> {
        self.writer.serialize(SignedRecord {
            variable_symbol: &request.variable_symbol,
            product_name: &request.product_name,
            total_price: request.total_price,
            encrypted_signature: &request.encrypted_signature,
        })?;
        Ok(())
    }

    pub fn write_outcome(&mut self, variable_symbol: &str, state: PaymentState) -> Result<()> {
        self.writer.serialize(OutcomeRecord {
            variable_symbol,
            state,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_signed() {
        let mut buffer = Vec::new();
        {
            let mut writer = PaymentWriter::new(&mut buffer);
            writer
                .write_signed(&PaymentCommandRequest {
                    eshop_go_id: 1001,
                    product_name: "Widget".to_string(),
                    total_price: 1999,
                    variable_symbol: "VS42".to_string(),
                    success_url: "https://x/ok".to_string(),
                    failed_url: "https://x/fail".to_string(),
                    encrypted_signature: "abcd".to_string(),
                })
                .unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "variable_symbol,product_name,total_price,encrypted_signature\nVS42,Widget,1999,abcd\n"
        );
    }

    #[test]
    fn test_write_outcome() {
        let mut buffer = Vec::new();
        {
            let mut writer = PaymentWriter::new(&mut buffer);
            writer.write_outcome("VS42", PaymentState::Confirmed).unwrap();
            writer.write_outcome("VS43", PaymentState::Rejected).unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "variable_symbol,state\nVS42,confirmed\nVS43,rejected\n");
    }
}
