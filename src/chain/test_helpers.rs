use std::collections::BTreeMap;

use super::currency::Currency;
use super::graph::MarketGraph;
use super::market::{CurrencyCode, Market};
use super::quote::QuoteCurrencies;

#[allow(dead_code, clippy::unwrap_used)]
pub fn market(symbol: &str) -> Market {
    Market::from_symbol(symbol).unwrap()
}

#[allow(dead_code)]
pub fn markets(symbols: &[&str]) -> Vec<Market> {
    symbols.iter().map(|symbol| market(symbol)).collect()
}

/// Every currency traded by `markets`, with its base markets indexed
#[allow(dead_code)]
pub fn currencies_of(markets: &[Market]) -> BTreeMap<CurrencyCode, Currency> {
    let mut currencies = BTreeMap::new();
    for market in markets {
        for code in [market.base(), market.quote()] {
            currencies
                .entry(code.to_string())
                .or_insert_with(|| Currency::new(code))
                .add_market(market);
        }
    }
    currencies
}

/// Owns a market set so tests can borrow graphs from it
#[allow(dead_code)]
pub struct World {
    pub markets: Vec<Market>,
    pub currencies: BTreeMap<CurrencyCode, Currency>,
}

#[allow(dead_code)]
impl World {
    pub fn new(symbols: &[&str]) -> Self {
        let markets = markets(symbols);
        let currencies = currencies_of(&markets);
        Self {
            markets,
            currencies,
        }
    }

    pub fn add_currency(&mut self, code: &str) {
        self.currencies
            .insert(code.to_string(), Currency::new(code));
    }

    #[allow(clippy::unwrap_used)]
    pub fn graph(&self) -> MarketGraph<'_> {
        MarketGraph::new(&self.markets, &self.currencies).unwrap()
    }

    pub fn quotes(&self) -> QuoteCurrencies {
        QuoteCurrencies::classify(&self.markets)
    }
}
