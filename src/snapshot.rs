//! Exchange snapshots stored as JSON.
//!
//! ```json
//! { "exchange": "binance",
//!   "currencies": [ { "code": "BTC" } ],
//!   "markets": [ { "symbol": "XEM/BTC", "base": "XEM", "quote": "BTC", "active": true } ] }
//! ```
//!
//! `base` and `quote` may be left out and are then read from the symbol.
//! Inactive markets are dropped on load.
use std::fs;
use std::path::Path;

use eyre::{bail, Result, WrapErr};
use log::{debug, info};
use serde::Deserialize;

use crate::chain::{Currency, Market};
use crate::exchange::Exchange;

/// Snapshot file layout
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    /// Exchange name, overrides the configured one
    #[serde(default)]
    exchange: Option<String>,
    /// Listed currencies
    #[serde(default)]
    currencies: Vec<CurrencyRecord>,
    /// Listed markets
    markets: Vec<MarketRecord>,
}

/// A currency entry
#[derive(Debug, Deserialize)]
struct CurrencyRecord {
    /// Currency code
    code: String,
}

/// A market entry
#[derive(Debug, Deserialize)]
struct MarketRecord {
    /// `BASE/QUOTE` symbol
    symbol: String,
    /// Base currency, read from the symbol when absent
    #[serde(default)]
    base: Option<String>,
    /// Quote currency, read from the symbol when absent
    #[serde(default)]
    quote: Option<String>,
    /// Whether the market is currently tradable
    #[serde(default = "active_by_default")]
    active: bool,
}

/// Markets without an `active` flag are tradable
const fn active_by_default() -> bool {
    true
}

impl MarketRecord {
    /// Converts the record into a market
    fn into_market(self) -> Result<Market> {
        let market = match (self.base, self.quote) {
            (Some(base), Some(quote)) => Market::new(self.symbol, base, quote)?,
            (None, None) => Market::from_symbol(&self.symbol)?,
            _ => bail!("Market {} must list both base and quote or neither", self.symbol),
        };
        Ok(market)
    }
}

/// Parses a snapshot from JSON.
///
/// # Arguments
/// * `json` - The snapshot document
/// * `default_name` - Exchange name used when the document has none
///
/// # Errors
/// * If the document is not a valid snapshot
/// * If a market is malformed
pub fn parse(json: &str, default_name: &str) -> Result<Exchange> {
    let file: SnapshotFile = serde_json::from_str(json).wrap_err("Invalid snapshot document")?;

    let listed = file.markets.len();
    let markets = file
        .markets
        .into_iter()
        .filter(|record| record.active)
        .map(MarketRecord::into_market)
        .collect::<Result<Vec<_>>>()?;
    debug!("{} of {listed} markets active", markets.len());

    let currencies = file
        .currencies
        .into_iter()
        .map(|record| Currency::new(record.code));
    let name = file
        .exchange
        .unwrap_or_else(|| default_name.to_string());

    Ok(Exchange::new(name, currencies, markets))
}

/// Loads a snapshot file.
///
/// # Errors
/// * If the file cannot be read
/// * If its content is not a valid snapshot
pub fn load(path: &Path, default_name: &str) -> Result<Exchange> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read snapshot {}", path.display()))?;
    let exchange = parse(&json, default_name)?;
    info!(
        "Loaded {} markets and {} currencies of {} from {}",
        exchange.markets().len(),
        exchange.currencies().len(),
        exchange.name(),
        path.display()
    );
    Ok(exchange)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let exchange = parse(
            r#"{
                "exchange": "kraken",
                "currencies": [{ "code": "XEM" }, { "code": "BTC" }, { "code": "USD" }],
                "markets": [
                    { "symbol": "XEM/BTC", "base": "XEM", "quote": "BTC" },
                    { "symbol": "XEM/USD" },
                    { "symbol": "BTC/USD", "active": true },
                    { "symbol": "DOGE/USD", "active": false }
                ]
            }"#,
            "binance",
        )
        .unwrap();

        assert_eq!(exchange.name(), "kraken");
        assert_eq!(
            exchange.markets().keys().collect::<Vec<_>>(),
            vec!["BTC/USD", "XEM/BTC", "XEM/USD"]
        );
        assert_eq!(exchange.markets()["XEM/USD"].quote(), "USD");
        assert_eq!(exchange.currencies().len(), 3);
    }

    #[test]
    fn test_default_name() {
        let exchange = parse(r#"{ "markets": [] }"#, "binance").unwrap();
        assert_eq!(exchange.name(), "binance");
        assert!(exchange.markets().is_empty());
    }

    #[test]
    fn test_half_specified_market() {
        let error = parse(
            r#"{ "markets": [{ "symbol": "XEM/BTC", "base": "XEM" }] }"#,
            "binance",
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Market XEM/BTC must list both base and quote or neither"
        );
    }

    #[test]
    fn test_symbol_mismatch() {
        let error = parse(
            r#"{ "markets": [{ "symbol": "FOO", "base": "A", "quote": "B" }] }"#,
            "binance",
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid market symbol FOO, expected BASE/QUOTE"
        );
    }

    #[test]
    fn test_invalid_symbol() {
        let error = parse(r#"{ "markets": [{ "symbol": "XEMBTC" }] }"#, "binance").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid market symbol XEMBTC, expected BASE/QUOTE"
        );
    }

    #[test]
    fn test_invalid_document() {
        let error = parse("{}", "binance").unwrap_err();
        assert_eq!(error.to_string(), "Invalid snapshot document");
    }
}
