//! A market is a tradable currency pair, the edge of the market graph.
use std::fmt::{self, Debug, Display};

use serde::Serialize;

use super::error::ChainError;
use super::quote::QuoteCurrencies;

/// Currency code, e.g. `BTC`.
pub type CurrencyCode = String;

/// Market symbol, e.g. `XEM/BTC`.
pub type MarketSymbol = String;

/// Separator between base and quote in a market symbol
pub const SYMBOL_SEPARATOR: char = '/';

/// A tradable pair of two currencies.
///
/// Markets are immutable once created. Equality and ordering use the symbol
/// only, since symbols are unique per exchange.
#[derive(Clone, Eq, Serialize)]
pub struct Market {
    /// Unique symbol of the market (`BASE/QUOTE`)
    symbol: MarketSymbol,
    /// The currency being priced
    base: CurrencyCode,
    /// The currency the base is priced in
    quote: CurrencyCode,
}

impl PartialEq for Market {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl PartialOrd for Market {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Market {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.symbol.cmp(&other.symbol)
    }
}

impl std::hash::Hash for Market {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Market({})", self.symbol)
    }
}

impl Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl Market {
    /// Creates a market from explicit symbol, base and quote.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidSymbol`] if base and quote are empty or identical,
    /// or if the symbol is not `BASE/QUOTE`
    pub fn new(
        symbol: impl Into<MarketSymbol>,
        base: impl Into<CurrencyCode>,
        quote: impl Into<CurrencyCode>,
    ) -> Result<Self, ChainError> {
        let symbol = symbol.into();
        let base = base.into();
        let quote = quote.into();
        if base.is_empty() || quote.is_empty() || base == quote {
            return Err(ChainError::InvalidSymbol { symbol });
        }
        if symbol.split_once(SYMBOL_SEPARATOR) != Some((base.as_str(), quote.as_str())) {
            return Err(ChainError::InvalidSymbol { symbol });
        }
        Ok(Self {
            symbol,
            base,
            quote,
        })
    }

    /// Parses a `BASE/QUOTE` symbol into a market.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidSymbol`] if the symbol does not contain exactly
    /// two distinct, non-empty currency codes
    pub fn from_symbol(symbol: &str) -> Result<Self, ChainError> {
        let mut parts = symbol.split(SYMBOL_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) => Self::new(symbol, base, quote),
            _ => Err(ChainError::InvalidSymbol {
                symbol: symbol.to_string(),
            }),
        }
    }

    /// The unique market symbol
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The base currency code
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The quote currency code
    #[must_use]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Returns the other currency of the pair.
    ///
    /// Any currency that is not the base is answered with the base, so callers
    /// should check [`Market::has_currency`] first when membership is not known.
    #[must_use]
    pub fn opposite(&self, currency: &str) -> &str {
        if currency == self.base {
            &self.quote
        } else {
            &self.base
        }
    }

    /// Whether the currency is either side of the pair
    #[must_use]
    pub fn has_currency(&self, currency: &str) -> bool {
        self.base == currency || self.quote == currency
    }

    /// Whether the base currency is itself classified as a quote currency
    #[must_use]
    pub fn base_is_quote(&self, quotes: &QuoteCurrencies) -> bool {
        quotes.is_quote(&self.base)
    }

    /// The currency both markets trade, if they share exactly one.
    pub(crate) fn shared_currency<'a>(&'a self, other: &Self) -> Option<&'a str> {
        match (other.has_currency(&self.base), other.has_currency(&self.quote)) {
            (true, false) => Some(&self.base),
            (false, true) => Some(&self.quote),
            _ => None,
        }
    }
}
