//! Quote-currency classification.
//!
//! A currency counts as a quote currency when it prices at least one currency
//! that is never a quote itself. Currencies that only ever quote other quote
//! currencies (stable pairs and the like) are dropped from the priority set.
use std::collections::BTreeSet;

use log::debug;

use super::error::ChainError;
use super::market::{CurrencyCode, Market};

/// The two derived sets of the classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteCurrencies {
    /// Every currency that is the quote leg of at least one market
    all: BTreeSet<CurrencyCode>,
    /// The subset of `all` quoting at least one market whose base is not in `all`
    quotes: BTreeSet<CurrencyCode>,
}

impl QuoteCurrencies {
    /// Runs the two-pass classification over a market set.
    ///
    /// # Arguments
    ///
    /// * `markets` - All active markets of the exchange
    ///
    /// # Returns
    ///
    /// The classification, an immutable lookup for one discovery pass
    pub fn classify<'a, I>(markets: I) -> Self
    where
        I: IntoIterator<Item = &'a Market>,
        I::IntoIter: Clone,
    {
        let markets = markets.into_iter();

        let all: BTreeSet<CurrencyCode> = markets
            .clone()
            .map(|market| market.quote().to_string())
            .collect();

        let quotes: BTreeSet<CurrencyCode> = markets
            .filter(|market| !all.contains(market.base()))
            .map(|market| market.quote().to_string())
            .collect();

        debug!(
            "Classified {} quote currencies out of {} quoting currencies",
            quotes.len(),
            all.len()
        );

        Self { all, quotes }
    }

    /// Whether the currency is a quote currency after filtering
    #[must_use]
    pub fn is_quote(&self, currency: &str) -> bool {
        self.quotes.contains(currency)
    }

    /// Every currency seen as a quote leg, before filtering
    #[must_use]
    pub const fn all_quote_currencies(&self) -> &BTreeSet<CurrencyCode> {
        &self.all
    }

    /// The filtered quote currencies used for chain ordering
    #[must_use]
    pub const fn quote_currencies(&self) -> &BTreeSet<CurrencyCode> {
        &self.quotes
    }

    /// Checks that the configured main quote currency survived the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::MainQuoteCurrency`] if it did not
    pub fn require_main(&self, main_quote_currency: &str) -> Result<(), ChainError> {
        if self.is_quote(main_quote_currency) {
            Ok(())
        } else {
            Err(ChainError::MainQuoteCurrency {
                currency: main_quote_currency.to_string(),
            })
        }
    }
}
