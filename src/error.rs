use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Message construction error: {0}")]
    ConstructionError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Cipher error: {0}")]
    CipherError(String),
    #[error("Gateway error: {0}")]
    GatewayError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
