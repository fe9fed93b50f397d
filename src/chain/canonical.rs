//! Canonical form of a raw cycle.
//!
//! The same loop is found once per member currency and once per direction.
//! Canonicalization picks one starting market and one direction so that all
//! of these collapse onto a single [`Chain`] with a single hash:
//!
//! 1. Rank the markets: markets whose base is not a quote currency first,
//!    then by ascending symbol.
//! 2. The best ranked market is the pivot. If its predecessor outranks its
//!    successor, reverse the cycle.
//! 3. Rotate so the pivot comes first.
//! 4. Walk the loop and join the currencies traversed into the hash.
use std::cmp::Ordering;

use itertools::Itertools;

use super::error::ChainError;
use super::market::Market;
use super::quote::QuoteCurrencies;
use super::types::{Chain, HASH_DELIMITER, MIN_CHAIN_LENGTH};

/// Priority order of two markets. `Less` means `a` has the higher priority.
#[must_use]
pub fn compare_priority(a: &Market, b: &Market, quotes: &QuoteCurrencies) -> Ordering {
    a.base_is_quote(quotes)
        .cmp(&b.base_is_quote(quotes))
        .then_with(|| a.symbol().cmp(b.symbol()))
}

/// Rank of every position of `markets` (0 is the highest priority)
fn priority_ranks(markets: &[&Market], quotes: &QuoteCurrencies) -> Vec<usize> {
    let mut ranks = vec![0; markets.len()];
    markets
        .iter()
        .enumerate()
        .sorted_by(|(_, a), (_, b)| compare_priority(a, b, quotes))
        .enumerate()
        .for_each(|(rank, (position, _))| ranks[position] = rank);
    ranks
}

/// Reduces a raw cycle to its canonical chain.
///
/// Canonicalizing an already canonical sequence returns it unchanged. The
/// hash follows [`HASH_DELIMITER`]: the triangle `XEM/BTC, XEM/USD, BTC/USD`
/// yields `XEM/USD/BTC`.
///
/// # Arguments
///
/// * `raw` - The markets of a closed loop in discovery order
/// * `quotes` - The quote-currency classification of the current pass
///
/// # Errors
///
/// * [`ChainError::ChainTooShort`] if the cycle has fewer than [`MIN_CHAIN_LENGTH`] markets
/// * [`ChainError::BrokenCycle`] if the markets do not form a simple closed loop
pub fn canonicalize(raw: &[&Market], quotes: &QuoteCurrencies) -> Result<Chain, ChainError> {
    let length = raw.len();
    if length < MIN_CHAIN_LENGTH {
        return Err(ChainError::ChainTooShort {
            length,
            minimum: MIN_CHAIN_LENGTH,
        });
    }

    let ranks = priority_ranks(raw, quotes);
    let mut pivot = ranks
        .iter()
        .position(|rank| *rank == 0)
        .unwrap_or_default();

    let next = (pivot + 1) % length;
    let previous = (pivot + length - 1) % length;

    let mut markets = raw.to_vec();
    if ranks[previous] < ranks[next] {
        markets.reverse();
        pivot = length - 1 - pivot;
    }
    markets.rotate_left(pivot);

    let hash = traversed_currencies(&markets)?.join(HASH_DELIMITER);
    Ok(Chain::new(markets.into_iter().cloned().collect(), hash))
}

/// Currencies visited walking the loop from its first market.
///
/// The walk enters the first market through the currency it does not share
/// with the second, so the sequence starts with their shared currency and
/// ends on that entry currency. Every currency appears once.
fn traversed_currencies<'m>(markets: &[&'m Market]) -> Result<Vec<&'m str>, ChainError> {
    let broken = |market: &Market, previous: &str| ChainError::BrokenCycle {
        symbol: market.symbol().to_string(),
        previous: previous.to_string(),
    };

    let (first, second) = match markets {
        [first, second, ..] => (*first, *second),
        _ => {
            return Err(ChainError::ChainTooShort {
                length: markets.len(),
                minimum: MIN_CHAIN_LENGTH,
            })
        }
    };
    let shared = first
        .shared_currency(second)
        .ok_or_else(|| broken(second, first.symbol()))?;
    let entry = first.opposite(shared);

    let mut currencies = Vec::with_capacity(markets.len());
    let mut current = entry;
    for &market in markets {
        if !market.has_currency(current) {
            return Err(broken(market, current));
        }
        current = market.opposite(current);
        if currencies.contains(&current) {
            return Err(broken(market, current));
        }
        currencies.push(current);
    }

    if current != entry {
        return Err(broken(first, current));
    }
    Ok(currencies)
}
