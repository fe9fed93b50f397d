use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};

use itertools::Itertools;
use serde::Serialize;

use super::market::Market;

/// Shortest loop worth pricing: a triangle
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Joins the currency codes of a chain hash.
///
/// A hash lists the currencies in the order the canonical chain traverses
/// them, starting with the currency its first two markets share and ending
/// on the currency it entered the first market from. The triangle
/// `XEM/BTC, XEM/USD, BTC/USD` hashes to `XEM/USD/BTC`.
pub const HASH_DELIMITER: &str = "/";

/// Canonical chains keyed by their hash. Ordered so that output is stable.
pub type ChainSet = BTreeMap<String, Chain>;

/// A closed loop of markets in canonical order.
///
/// Each market shares one currency with its predecessor and the last market
/// closes the loop on the first. Created once by the canonicalizer.
#[derive(Clone, Eq, Serialize)]
pub struct Chain {
    /// The markets in canonical order
    markets: Vec<Market>,
    /// Currencies traversed around the loop joined by [`HASH_DELIMITER`]
    hash: String,
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.markets == other.markets
    }
}

impl Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain({}: {})",
            self.hash,
            self.markets.iter().map(Market::symbol).join(", ")
        )
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.hash,
            self.markets.iter().map(Market::symbol).join(" -> ")
        )
    }
}

impl Chain {
    /// Only the canonicalizer builds chains
    pub(crate) const fn new(markets: Vec<Market>, hash: String) -> Self {
        Self { markets, hash }
    }

    /// The markets in canonical order
    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Market symbols in canonical order
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        self.markets.iter().map(Market::symbol).collect()
    }

    /// The deduplication key
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Number of markets in the loop
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Always false for a canonical chain, kept for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
