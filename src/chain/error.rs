//! Errors raised while classifying markets and discovering chains.
use derive_more::{Display, Error};

/// Failures of a chain discovery pass.
///
/// Dead-end search branches are not represented here: a branch that cannot
/// close back on its start currency simply produces no chain.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The configured main quote currency is not a quote currency of the exchange
    #[display("Main quote currency {currency} is not a quote currency on this exchange")]
    MainQuoteCurrency {
        /// The configured currency code
        #[error(not(source))]
        currency: String,
    },

    /// A market references a currency that is missing from the currency mapping
    #[display("Market {symbol} references unknown currency {currency}")]
    MissingCurrency {
        /// Symbol of the offending market
        symbol: String,
        /// The currency code that could not be found
        currency: String,
    },

    /// Two markets trade the same pair of currencies
    #[display("Market {symbol} trades the same currencies as {existing}")]
    ParallelMarket {
        /// Symbol of the rejected market
        symbol: String,
        /// Symbol of the market already trading the pair
        existing: String,
    },

    /// A search was started from a currency that is not part of the market graph
    #[display("Currency {currency} is not part of the market graph")]
    UnknownCurrency {
        /// The requested start currency
        #[error(not(source))]
        currency: String,
    },

    /// A cycle (or a requested cycle length) is shorter than the accepted minimum
    #[display("Chain length {length} is below the minimum of {minimum}")]
    ChainTooShort {
        /// The rejected length
        length: usize,
        /// The minimum accepted length
        minimum: usize,
    },

    /// Two consecutive markets of a raw cycle do not share exactly one currency
    #[display("Market {symbol} does not continue the chain after {previous}")]
    BrokenCycle {
        /// The market that does not connect
        symbol: String,
        /// The market (or currency) it was expected to follow
        previous: String,
    },

    /// A market symbol is not of the form `BASE/QUOTE`
    #[display("Invalid market symbol {symbol}, expected BASE/QUOTE")]
    InvalidSymbol {
        /// The symbol as received
        #[error(not(source))]
        symbol: String,
    },

    /// The caller's deadline passed before every start currency was searched
    #[display("Chain discovery deadline exceeded after {chains} chains")]
    DeadlineExceeded {
        /// Number of distinct chains found before the deadline
        #[error(not(source))]
        chains: usize,
    },
}
