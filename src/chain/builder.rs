//! Bounded depth-first enumeration of closed market loops.
use std::collections::HashSet;
use std::time::Instant;

use log::{debug, warn};

use super::canonical::canonicalize;
use super::error::ChainError;
use super::graph::{MarketGraph, MarketIndex};
use super::market::Market;
use super::node::ChainNode;
use super::quote::QuoteCurrencies;
use super::types::{ChainSet, MIN_CHAIN_LENGTH};

/// A loop as discovered, before canonicalization
pub type RawCycle<'a> = Vec<ChainNode<'a>>;

/// Where a discovery pass currently is, reported before each start currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
    /// Chain length being searched
    pub depth: usize,
    /// Start currency about to be searched
    pub currency: &'a str,
    /// Zero-based index of this step
    pub step: usize,
    /// Total number of steps in the pass
    pub total: usize,
}

/// Finds every closed loop of the market graph and collapses them into
/// canonical chains.
#[derive(Debug, Clone)]
pub struct ChainBuilder<'g, 'a> {
    /// The market graph to search
    graph: &'g MarketGraph<'a>,
    /// Classification used to canonicalize the loops
    quotes: &'g QuoteCurrencies,
    /// Checked between start currencies
    deadline: Option<Instant>,
}

impl<'g, 'a> ChainBuilder<'g, 'a> {
    /// Creates a builder over a graph and its quote classification
    #[must_use]
    pub const fn new(graph: &'g MarketGraph<'a>, quotes: &'g QuoteCurrencies) -> Self {
        Self {
            graph,
            quotes,
            deadline: None,
        }
    }

    /// Stops [`ChainBuilder::create_chains`] once `deadline` has passed
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Enumerates the loops of exactly `depth` markets starting and ending at `start`.
    ///
    /// Each loop is reported once per direction. Loops never reuse a market
    /// and never pass through a currency twice. Lengths below
    /// [`MIN_CHAIN_LENGTH`] yield nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownCurrency`] if `start` is not a node of the graph
    pub fn enumerate(&self, start: &str, depth: usize) -> Result<Vec<RawCycle<'a>>, ChainError> {
        let start = self
            .graph
            .currency(start)
            .ok_or_else(|| ChainError::UnknownCurrency {
                currency: start.to_string(),
            })?;

        let mut cycles = Vec::new();
        if depth < MIN_CHAIN_LENGTH {
            return Ok(cycles);
        }

        let mut path = Vec::with_capacity(depth);
        let mut used = HashSet::with_capacity(depth);
        self.search(start, start, depth, &mut path, &mut used, &mut cycles);
        Ok(cycles)
    }

    /// Extends `path` from `current`, collecting the loops that close at `depth`
    fn search(
        &self,
        start: &'a str,
        current: &'a str,
        depth: usize,
        path: &mut RawCycle<'a>,
        used: &mut HashSet<MarketIndex>,
        cycles: &mut Vec<RawCycle<'a>>,
    ) {
        let Some(incident) = self.graph.incident(current) else {
            return;
        };
        let closing = path.len() + 1 == depth;

        for &index in incident {
            if used.contains(&index) {
                continue;
            }
            let market = self.graph.market(index);
            let next = market.opposite(current);

            if closing {
                if next == start {
                    let mut cycle = path.clone();
                    cycle.push(ChainNode::new(market, current));
                    cycles.push(cycle);
                }
                continue;
            }

            // Only the last step may come back to a visited currency
            if next == start || path.iter().any(|node| node.entered_from == next) {
                continue;
            }

            used.insert(index);
            path.push(ChainNode::new(market, current));
            self.search(start, next, depth, path, used, cycles);
            path.pop();
            used.remove(&index);
        }
    }

    /// Discovers every canonical chain of length [`MIN_CHAIN_LENGTH`] up to `max_length`.
    ///
    /// # Errors
    ///
    /// See [`ChainBuilder::create_chains_with`]
    pub fn create_chains(&self, max_length: usize) -> Result<ChainSet, ChainError> {
        self.create_chains_with(max_length, |_| {})
    }

    /// Discovers every canonical chain, calling `on_step` before each start currency.
    ///
    /// Every currency is used as a start point for every length. The same loop
    /// is found from each of its currencies and in both directions; all of
    /// these collapse onto one entry keyed by the chain hash.
    ///
    /// # Errors
    ///
    /// * [`ChainError::ChainTooShort`] if `max_length` is below [`MIN_CHAIN_LENGTH`]
    /// * [`ChainError::DeadlineExceeded`] if the deadline passes before the pass ends
    /// * [`ChainError::BrokenCycle`] if a discovered loop fails to canonicalize
    pub fn create_chains_with<F>(
        &self,
        max_length: usize,
        mut on_step: F,
    ) -> Result<ChainSet, ChainError>
    where
        F: FnMut(Progress<'_>),
    {
        if max_length < MIN_CHAIN_LENGTH {
            return Err(ChainError::ChainTooShort {
                length: max_length,
                minimum: MIN_CHAIN_LENGTH,
            });
        }

        let total = self.graph.currency_count() * (max_length - MIN_CHAIN_LENGTH + 1);
        let mut chains = ChainSet::new();
        let mut step = 0;

        for depth in MIN_CHAIN_LENGTH..=max_length {
            let mut found = 0;
            for start in self.graph.currencies() {
                if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    warn!(
                        "Deadline reached at length {depth}, {} chains so far",
                        chains.len()
                    );
                    return Err(ChainError::DeadlineExceeded {
                        chains: chains.len(),
                    });
                }

                on_step(Progress {
                    depth,
                    currency: start,
                    step,
                    total,
                });
                step += 1;

                for cycle in self.enumerate(start, depth)? {
                    found += 1;
                    let markets: Vec<&Market> = cycle.iter().map(|node| node.market).collect();
                    let chain = canonicalize(&markets, self.quotes)?;
                    chains.entry(chain.hash().to_string()).or_insert(chain);
                }
            }
            debug!(
                "Length {depth}: {found} raw cycles, {} distinct chains so far",
                chains.len()
            );
        }

        Ok(chains)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::chain::test_helpers::*;

    const TRIANGLE: [&str; 3] = ["XEM/BTC", "XEM/USD", "BTC/USD"];

    /// Every pair of A, B, C and D has a market
    const COMPLETE: [&str; 6] = ["A/B", "A/C", "A/D", "B/C", "B/D", "C/D"];

    fn symbols(cycle: &RawCycle<'_>) -> Vec<String> {
        cycle
            .iter()
            .map(|node| node.market.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_enumerate_triangle() {
        let world = World::new(&TRIANGLE);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);

        let cycles = builder.enumerate("BTC", 3).unwrap();
        let found: Vec<Vec<String>> = cycles.iter().map(symbols).collect();
        assert_eq!(
            found,
            vec![
                vec!["BTC/USD", "XEM/USD", "XEM/BTC"],
                vec!["XEM/BTC", "XEM/USD", "BTC/USD"],
            ]
        );

        let first = &cycles[0];
        assert_eq!(first[0].entered_from, "BTC");
        assert_eq!(first[1].entered_from, "USD");
        assert_eq!(first[2].entered_from, "XEM");
        assert_eq!(first[2].exits_to(), "BTC");
    }

    #[test]
    fn test_create_chains_triangle() {
        let world = World::new(&TRIANGLE);
        let graph = world.graph();
        let quotes = world.quotes();
        let chains = ChainBuilder::new(&graph, &quotes).create_chains(3).unwrap();

        assert_eq!(chains.len(), 1);
        let chain = &chains["XEM/USD/BTC"];
        assert_eq!(chain.symbols(), vec!["XEM/BTC", "XEM/USD", "BTC/USD"]);
    }

    #[test]
    fn test_depth_bound() {
        let world = World::new(&COMPLETE);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);

        for depth in 3..=4 {
            let cycles = builder.enumerate("A", depth).unwrap();
            // Three loops through A of each length, found in both directions
            assert_eq!(cycles.len(), 6, "depth {depth}");
            for cycle in &cycles {
                let distinct: HashSet<&str> =
                    cycle.iter().map(|node| node.market.symbol()).collect();
                assert_eq!(distinct.len(), depth);
            }
        }
        assert!(builder.enumerate("A", 5).unwrap().is_empty());

        let chains = builder.create_chains(4).unwrap();
        assert_eq!(chains.values().filter(|chain| chain.len() == 3).count(), 4);
        assert_eq!(chains.values().filter(|chain| chain.len() == 4).count(), 3);
        assert_eq!(chains.len(), 7);
    }

    #[test]
    fn test_dead_end_is_empty() {
        let mut world = World::new(&["XEM/BTC", "BTC/USD"]);
        world.add_currency("ETH");
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);

        assert!(builder.enumerate("XEM", 3).unwrap().is_empty());
        assert!(builder.enumerate("ETH", 3).unwrap().is_empty());
        assert!(builder.create_chains(5).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_lengths_are_not_emitted() {
        let world = World::new(&TRIANGLE);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);

        for depth in 0..MIN_CHAIN_LENGTH {
            assert!(builder.enumerate("BTC", depth).unwrap().is_empty());
        }
        assert_eq!(builder.enumerate("BTC", 3).unwrap().len(), 2);
        assert_eq!(
            builder.create_chains(2).err().unwrap(),
            ChainError::ChainTooShort {
                length: 2,
                minimum: 3
            }
        );
    }

    #[test]
    fn test_distinct_market_sets_are_all_kept() {
        // Every pair of A, B, C and D traded once, plus E closing one more
        // triangle over A/B
        let world = World::new(&[
            "A/B", "A/C", "A/D", "B/C", "B/D", "C/D", "E/A", "E/B",
        ]);
        let graph = world.graph();
        let quotes = world.quotes();
        let chains = ChainBuilder::new(&graph, &quotes).create_chains(3).unwrap();

        // C(4, 3) triangles of the complete part plus A-B-E
        assert_eq!(chains.len(), 5);
        let market_sets: HashSet<Vec<&str>> = chains
            .values()
            .map(|chain| {
                let mut symbols = chain.symbols();
                symbols.sort_unstable();
                symbols
            })
            .collect();
        assert_eq!(market_sets.len(), chains.len());
    }

    #[test]
    fn test_no_figure_eight() {
        // Two triangles sharing A
        let world = World::new(&["A/B", "B/C", "C/A", "A/D", "D/E", "E/A"]);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);

        assert!(builder.enumerate("A", 6).unwrap().is_empty());
        assert!(builder.enumerate("B", 6).unwrap().is_empty());
        assert_eq!(builder.create_chains(6).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_start() {
        let world = World::new(&TRIANGLE);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes);
        assert_eq!(
            builder.enumerate("DOGE", 3).err().unwrap().to_string(),
            "Currency DOGE is not part of the market graph"
        );
    }

    #[test]
    fn test_deadline() {
        let world = World::new(&COMPLETE);
        let graph = world.graph();
        let quotes = world.quotes();
        let builder = ChainBuilder::new(&graph, &quotes).with_deadline(Instant::now());
        assert_eq!(
            builder.create_chains(4).err().unwrap(),
            ChainError::DeadlineExceeded { chains: 0 }
        );

        let later = Instant::now() + Duration::from_secs(60);
        let builder = ChainBuilder::new(&graph, &quotes).with_deadline(later);
        assert_eq!(builder.create_chains(4).unwrap().len(), 7);
    }

    #[test]
    fn test_progress() {
        let world = World::new(&COMPLETE);
        let graph = world.graph();
        let quotes = world.quotes();
        let mut steps = Vec::new();
        ChainBuilder::new(&graph, &quotes)
            .create_chains_with(4, |progress| {
                steps.push((
                    progress.depth,
                    progress.currency.to_string(),
                    progress.step,
                    progress.total,
                ));
            })
            .unwrap();

        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0], (3, "A".to_string(), 0, 8));
        assert_eq!(steps[7], (4, "D".to_string(), 7, 8));
    }
}
