//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is honoured) and can be
//! overridden from the command line.
use std::env;
use std::time::{Duration, Instant};

use eyre::{bail, eyre, Result, WrapErr};
use log::LevelFilter;

use crate::chain::MIN_CHAIN_LENGTH;

/// Name of the exchange the snapshot belongs to
pub const ENV_EXCHANGE: &str = "CHAINSCAN_EXCHANGE";
/// Currency every other currency is valued in
pub const ENV_MAIN_QUOTE_CURRENCY: &str = "CHAINSCAN_MAIN_QUOTE_CURRENCY";
/// Longest chain to search for
pub const ENV_MAX_CHAIN_LENGTH: &str = "CHAINSCAN_MAX_CHAIN_LENGTH";
/// Optional time budget of a discovery pass, in milliseconds
pub const ENV_DEADLINE_MS: &str = "CHAINSCAN_DEADLINE_MS";
/// Log level used when `RUST_LOG` is not set
pub const ENV_LOG_LEVEL: &str = "CHAINSCAN_LOG_LEVEL";

/// Configuration of a chain discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Exchange name, used for logging and as the default snapshot name
    pub exchange: String,
    /// Valuation anchor; must survive quote-currency classification
    pub main_quote_currency: String,
    /// Longest chain searched; every length from the minimum up to this one is searched
    pub max_chain_length: usize,
    /// Time budget of a discovery pass
    pub deadline_ms: Option<u64>,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: "binance".to_string(),
            main_quote_currency: "USDT".to_string(),
            max_chain_length: MIN_CHAIN_LENGTH,
            deadline_ms: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first.
    ///
    /// # Errors
    /// * If a numeric or log level variable cannot be parsed
    /// * If the resulting configuration is invalid
    pub fn from_env() -> Result<Self> {
        let config = Self::from_env_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the environment without validating, so that overrides can be
    /// applied before [`Config::validate`].
    ///
    /// # Errors
    /// * If a numeric or log level variable cannot be parsed
    pub fn from_env_unvalidated() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup_unvalidated(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to defaults.
    ///
    /// # Errors
    /// * If a numeric or log level value cannot be parsed
    /// * If the resulting configuration is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::from_lookup_unvalidated(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::from_lookup`] without the final validation
    ///
    /// # Errors
    /// * If a numeric or log level value cannot be parsed
    pub fn from_lookup_unvalidated<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(exchange) = lookup(ENV_EXCHANGE) {
            config.exchange = exchange;
        }
        if let Some(currency) = lookup(ENV_MAIN_QUOTE_CURRENCY) {
            config.main_quote_currency = currency;
        }
        if let Some(length) = lookup(ENV_MAX_CHAIN_LENGTH) {
            config.max_chain_length = length
                .trim()
                .parse()
                .wrap_err_with(|| format!("{ENV_MAX_CHAIN_LENGTH} must be a positive integer"))?;
        }
        if let Some(deadline) = lookup(ENV_DEADLINE_MS) {
            config.deadline_ms = Some(
                deadline
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("{ENV_DEADLINE_MS} must be a number of milliseconds"))?,
            );
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = level
                .trim()
                .parse()
                .map_err(|_| eyre!("{ENV_LOG_LEVEL} is not a log level: {level}"))?;
        }

        Ok(config)
    }

    /// Checks the values that would make a discovery pass meaningless.
    ///
    /// # Errors
    /// * If the main quote currency is empty
    /// * If the maximum chain length is below the minimum chain length
    pub fn validate(&self) -> Result<()> {
        if self.main_quote_currency.trim().is_empty() {
            bail!("Main quote currency must be set");
        }
        if self.max_chain_length < MIN_CHAIN_LENGTH {
            bail!(
                "Max chain length must be at least {MIN_CHAIN_LENGTH}, got {}",
                self.max_chain_length
            );
        }
        Ok(())
    }

    /// The instant a pass started at `started` must finish by, if any
    #[must_use]
    pub fn deadline(&self, started: Instant) -> Option<Instant> {
        self.deadline_ms
            .map(|ms| started + Duration::from_millis(ms))
    }
}
