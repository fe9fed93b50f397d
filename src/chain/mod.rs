//! # Chain Module
//!
//! Discovery of closed trading loops ("chains") in the market graph of an
//! exchange and their reduction to one canonical, hashable form.

/// Chain Builder: bounded loop enumeration
pub mod builder;
/// Chain Canonicalizer: ordering and hashing
pub mod canonical;
/// Currency records
pub mod currency;
/// Error types
pub mod error;
/// Market Graph
pub mod graph;
/// Market records
pub mod market;
/// Traversal steps
pub mod node;
/// Quote-Currency Classifier
pub mod quote;
/// Test helpers and utilities
#[cfg(test)]
pub(crate) mod test_helpers;
/// Chain and chain set types
pub mod types;

pub use builder::{ChainBuilder, Progress, RawCycle};
pub use canonical::canonicalize;
pub use currency::Currency;
pub use error::ChainError;
pub use graph::MarketGraph;
pub use market::Market;
pub use node::ChainNode;
pub use quote::QuoteCurrencies;
pub use types::{Chain, ChainSet, HASH_DELIMITER, MIN_CHAIN_LENGTH};
