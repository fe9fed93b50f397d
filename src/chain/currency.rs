use std::collections::BTreeSet;

use serde::Serialize;

use super::market::{CurrencyCode, Market, MarketSymbol};

/// A currency listed on the exchange, the node of the market graph.
///
/// Holds the symbols of the markets in which it is the base currency. The set
/// only grows while the exchange snapshot is being indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// Unique currency code
    code: CurrencyCode,
    /// Symbols of markets with this currency as base
    markets: BTreeSet<MarketSymbol>,
}

impl Currency {
    /// Creates a currency without any market
    pub fn new(code: impl Into<CurrencyCode>) -> Self {
        Self {
            code: code.into(),
            markets: BTreeSet::new(),
        }
    }

    /// The currency code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Symbols of the markets where this currency is the base
    #[must_use]
    pub const fn markets(&self) -> &BTreeSet<MarketSymbol> {
        &self.markets
    }

    /// Indexes a market. Markets based on another currency are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the market was added
    pub fn add_market(&mut self, market: &Market) -> bool {
        if market.base() != self.code {
            return false;
        }
        self.markets.insert(market.symbol().to_string())
    }
}
