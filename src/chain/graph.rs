//! Undirected view of the exchange: currencies are nodes, markets are edges.
//!
//! Edges are stored as indices into a market list instead of references
//! between currencies and markets, so the graph holds no ownership cycles.
use std::collections::BTreeMap;

use log::debug;

use super::currency::Currency;
use super::error::ChainError;
use super::market::{CurrencyCode, Market};

/// Index of a market within a [`MarketGraph`]
pub type MarketIndex = usize;

/// Adjacency map from currency code to the markets trading it.
#[derive(Debug, Clone)]
pub struct MarketGraph<'a> {
    /// Markets sorted by symbol; positions are the edge indices
    markets: Vec<&'a Market>,
    /// Every currency of the snapshot and the markets it takes part in
    adjacency: BTreeMap<&'a str, Vec<MarketIndex>>,
}

impl<'a> MarketGraph<'a> {
    /// Builds the graph from a market set and the currency mapping.
    ///
    /// Currencies without markets are kept as isolated nodes. At most one
    /// market may join any two currencies.
    ///
    /// # Errors
    ///
    /// * [`ChainError::MissingCurrency`] if a market references a currency
    ///   absent from `currencies`
    /// * [`ChainError::ParallelMarket`] if two markets trade the same pair,
    ///   e.g. `A/B` and `B/A`
    pub fn new<I>(
        markets: I,
        currencies: &'a BTreeMap<CurrencyCode, Currency>,
    ) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = &'a Market>,
    {
        let mut markets: Vec<&'a Market> = markets.into_iter().collect();
        markets.sort();
        markets.dedup();

        let mut adjacency: BTreeMap<&'a str, Vec<MarketIndex>> = currencies
            .keys()
            .map(|code| (code.as_str(), Vec::new()))
            .collect();

        let mut pairs: BTreeMap<(&'a str, &'a str), &'a Market> = BTreeMap::new();
        for (index, &market) in markets.iter().enumerate() {
            let pair = if market.base() < market.quote() {
                (market.base(), market.quote())
            } else {
                (market.quote(), market.base())
            };
            if let Some(existing) = pairs.insert(pair, market) {
                return Err(ChainError::ParallelMarket {
                    symbol: market.symbol().to_string(),
                    existing: existing.symbol().to_string(),
                });
            }

            for currency in [market.base(), market.quote()] {
                let edges = adjacency.get_mut(currency).ok_or_else(|| {
                    ChainError::MissingCurrency {
                        symbol: market.symbol().to_string(),
                        currency: currency.to_string(),
                    }
                })?;
                edges.push(index);
            }
        }

        debug!(
            "Market graph built with {} currencies and {} markets",
            adjacency.len(),
            markets.len()
        );

        Ok(Self { markets, adjacency })
    }

    /// The market behind an edge index
    #[must_use]
    pub fn market(&self, index: MarketIndex) -> &'a Market {
        self.markets[index]
    }

    /// The graph's own copy of a currency code, if it is a node
    #[must_use]
    pub fn currency(&self, code: &str) -> Option<&'a str> {
        self.adjacency.get_key_value(code).map(|(code, _)| *code)
    }

    /// Edge indices of the markets trading `currency`, if it is a node
    #[must_use]
    pub fn incident(&self, currency: &str) -> Option<&[MarketIndex]> {
        self.adjacency.get(currency).map(Vec::as_slice)
    }

    /// Currency codes of all nodes, in order
    pub fn currencies(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of nodes
    #[must_use]
    pub fn currency_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.len()
    }
}
