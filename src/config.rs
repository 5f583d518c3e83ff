//! Merchant configuration.
//!
//! `Config` is built once (from an optional TOML file and `GOPAY_*` environment
//! variables) and never mutated. Components read it through a `ConfigHandle`,
//! which hands out `Arc<Config>` snapshots and replaces the whole snapshot at
//! once on reload.

use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Gateway test environment WSDL, used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://testgw.gopay.cz/axis/EPaymentServiceV2?wsdl";

const ENV_PREFIX: &str = "GOPAY";

/// The shared secret known only to the merchant and the gateway.
///
/// Wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The merchant's gateway identifier (GoID).
    pub merchant_id: u64,
    pub secret: Secret,
    pub success_url: String,
    pub failed_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Config {
    pub fn new(
        merchant_id: u64,
        secret: Secret,
        success_url: impl Into<String>,
        failed_url: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            merchant_id,
            secret,
            success_url: success_url.into(),
            failed_url: failed_url.into(),
            endpoint: default_endpoint(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path` (if given) and then `GOPAY_*` environment
    /// variables, which take precedence over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    // Environment values stay strings: a secret such as `007` must not be
    // parsed into a number and lose its leading zeros.
    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder().set_default("endpoint", DEFAULT_ENDPOINT)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder.add_source(env).build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.secret.expose().trim().is_empty() {
            return Err(PaymentError::InvalidConfig(
                "secret must not be empty".to_string(),
            ));
        }
        if self.success_url.trim().is_empty() {
            return Err(PaymentError::InvalidConfig(
                "success_url must not be empty".to_string(),
            ));
        }
        if self.failed_url.trim().is_empty() {
            return Err(PaymentError::InvalidConfig(
                "failed_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared, read-mostly access to the current configuration snapshot.
#[derive(Debug)]
pub struct ConfigHandle {
    current: RwLock<Arc<Config>>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns the current snapshot. Callers keep using it even if a reload
    /// happens mid-operation.
    pub fn snapshot(&self) -> Arc<Config> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swaps in a new snapshot.
    pub fn replace(&self, config: Config) {
        let next = Arc::new(config);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}
