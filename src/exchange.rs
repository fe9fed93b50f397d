//! Read-only snapshot of an exchange and the exchange-level discovery pass.
use std::collections::BTreeMap;
use std::time::Instant;

use log::warn;

use crate::chain::market::{CurrencyCode, MarketSymbol};
use crate::chain::{
    ChainBuilder, ChainError, ChainSet, Currency, Market, MarketGraph, Progress, QuoteCurrencies,
};
use crate::config::Config;
use crate::utils::step::do_and_log;

/// The markets and currencies of one exchange at a point in time.
///
/// Discovery only reads the snapshot; a refreshed market set means a new
/// snapshot and a new pass.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    /// Exchange name
    name: String,
    /// Markets by symbol
    markets: BTreeMap<MarketSymbol, Market>,
    /// Currencies by code
    currencies: BTreeMap<CurrencyCode, Currency>,
}

impl Exchange {
    /// Creates a snapshot and indexes every market into its base currency.
    ///
    /// Markets whose base currency is not listed are kept as they are; the
    /// discovery pass reports them as missing data.
    pub fn new<C, M>(name: impl Into<String>, currencies: C, markets: M) -> Self
    where
        C: IntoIterator<Item = Currency>,
        M: IntoIterator<Item = Market>,
    {
        let mut currencies: BTreeMap<CurrencyCode, Currency> = currencies
            .into_iter()
            .map(|currency| (currency.code().to_string(), currency))
            .collect();

        let mut indexed = BTreeMap::new();
        for market in markets {
            if let Some(base) = currencies.get_mut(market.base()) {
                base.add_market(&market);
            }
            if let Some(previous) = indexed.insert(market.symbol().to_string(), market) {
                warn!("Duplicate market {previous} replaced");
            }
        }

        Self {
            name: name.into(),
            markets: indexed,
            currencies,
        }
    }

    /// Exchange name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Markets by symbol
    #[must_use]
    pub const fn markets(&self) -> &BTreeMap<MarketSymbol, Market> {
        &self.markets
    }

    /// Currencies by code
    #[must_use]
    pub const fn currencies(&self) -> &BTreeMap<CurrencyCode, Currency> {
        &self.currencies
    }

    /// Classifies the quote currencies of the current market set
    #[must_use]
    pub fn quote_currencies(&self) -> QuoteCurrencies {
        QuoteCurrencies::classify(self.markets.values())
    }

    /// Runs a full discovery pass.
    ///
    /// # Errors
    ///
    /// See [`Exchange::create_chains_with`]
    pub fn create_chains(&self, config: &Config) -> Result<ChainSet, ChainError> {
        self.create_chains_with(config, |_| {})
    }

    /// Runs a full discovery pass, reporting progress before each start currency.
    ///
    /// The quote classification is computed once and shared by the builder
    /// and the canonicalizer for the whole pass.
    ///
    /// # Errors
    ///
    /// * [`ChainError::MainQuoteCurrency`] before any search if the main quote
    ///   currency is not a quote currency
    /// * [`ChainError::MissingCurrency`] if a market references an unlisted currency
    /// * [`ChainError::ParallelMarket`] if two markets trade the same currency pair
    /// * Any error of [`ChainBuilder::create_chains_with`]
    pub fn create_chains_with<F>(&self, config: &Config, on_step: F) -> Result<ChainSet, ChainError>
    where
        F: FnMut(Progress<'_>),
    {
        let started = Instant::now();

        let quotes = do_and_log(
            "Determining quote currencies",
            || -> Result<QuoteCurrencies, ChainError> {
                let quotes = self.quote_currencies();
                quotes.require_main(&config.main_quote_currency)?;
                Ok(quotes)
            },
            |quotes| format!("{} detected", quotes.quote_currencies().len()),
        )?;

        let graph = do_and_log(
            "Building market graph",
            || MarketGraph::new(self.markets.values(), &self.currencies),
            |graph| {
                format!(
                    "{} currencies, {} markets",
                    graph.currency_count(),
                    graph.market_count()
                )
            },
        )?;

        let mut builder = ChainBuilder::new(&graph, &quotes);
        if let Some(deadline) = config.deadline(started) {
            builder = builder.with_deadline(deadline);
        }

        do_and_log(
            "Building chains",
            || builder.create_chains_with(config.max_chain_length, on_step),
            |chains| format!("{} generated", chains.len()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chain::test_helpers::*;

    fn exchange(symbols: &[&str]) -> Exchange {
        let markets = markets(symbols);
        let currencies = currencies_of(&markets)
            .into_keys()
            .map(Currency::new)
            .collect::<Vec<_>>();
        Exchange::new("test", currencies, markets)
    }

    fn config(main_quote_currency: &str, max_chain_length: usize) -> Config {
        Config {
            main_quote_currency: main_quote_currency.to_string(),
            max_chain_length,
            ..Config::default()
        }
    }

    #[test]
    fn test_indexes_base_markets() {
        let exchange = exchange(&["XEM/BTC", "XEM/USD", "BTC/USD"]);
        let xem = &exchange.currencies()["XEM"];
        assert_eq!(
            xem.markets().iter().collect::<Vec<_>>(),
            vec!["XEM/BTC", "XEM/USD"]
        );
        assert!(exchange.currencies()["USD"].markets().is_empty());
        assert_eq!(exchange.markets().len(), 3);
    }

    #[test]
    fn test_create_chains() {
        let exchange = exchange(&[
            "XEM/BTC", "XEM/USD", "BTC/USD", "ETH/BTC", "ETH/USD", "LTC/ETH",
        ]);
        let chains = exchange.create_chains(&config("USD", 4)).unwrap();

        let hashes: Vec<&str> = chains.keys().map(String::as_str).collect();
        assert_eq!(
            hashes,
            vec!["BTC/ETH/USD", "XEM/USD/BTC", "XEM/USD/ETH/BTC"]
        );
        for (hash, chain) in &chains {
            assert_eq!(hash, chain.hash());
        }
    }

    #[test]
    fn test_main_quote_currency_must_be_quote() {
        let exchange = exchange(&["XEM/BTC", "XEM/USD", "BTC/USD"]);
        assert_eq!(
            exchange.create_chains(&config("EUR", 3)).err().unwrap(),
            ChainError::MainQuoteCurrency {
                currency: "EUR".to_string()
            }
        );
    }

    #[test]
    fn test_missing_currency() {
        let markets = markets(&["XEM/BTC", "XEM/USD", "BTC/USD"]);
        let currencies = ["XEM", "BTC"].into_iter().map(Currency::new);
        let exchange = Exchange::new("test", currencies, markets);
        assert_eq!(
            exchange.create_chains(&config("BTC", 3)).err().unwrap(),
            ChainError::MissingCurrency {
                symbol: "BTC/USD".to_string(),
                currency: "USD".to_string()
            }
        );
    }

    #[test]
    fn test_parallel_markets_are_rejected() {
        let exchange = exchange(&["XEM/BTC", "BTC/XEM", "XEM/USD", "BTC/USD", "ETH/USD"]);
        assert_eq!(
            exchange.create_chains(&config("USD", 3)).err().unwrap(),
            ChainError::ParallelMarket {
                symbol: "XEM/BTC".to_string(),
                existing: "BTC/XEM".to_string()
            }
        );
    }

    #[test]
    fn test_deadline() {
        let exchange = exchange(&["XEM/BTC", "XEM/USD", "BTC/USD"]);
        let config = Config {
            deadline_ms: Some(0),
            ..config("USD", 3)
        };
        assert_eq!(
            exchange.create_chains(&config).err().unwrap(),
            ChainError::DeadlineExceeded { chains: 0 }
        );
    }
}
