use std::fmt::{self, Debug};

use super::market::Market;

/// One step of a path under construction: a market and the currency the
/// path entered it from. Only lives for the duration of a search.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ChainNode<'a> {
    /// The market traversed by this step
    pub market: &'a Market,
    /// The currency the step starts from
    pub entered_from: &'a str,
}

impl<'a> ChainNode<'a> {
    /// Creates a step through `market` starting at `entered_from`
    #[must_use]
    pub const fn new(market: &'a Market, entered_from: &'a str) -> Self {
        Self {
            market,
            entered_from,
        }
    }

    /// The currency the step ends on
    #[must_use]
    pub fn exits_to(&self) -> &'a str {
        self.market.opposite(self.entered_from)
    }
}

impl Debug for ChainNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}",
            self.entered_from,
            self.market.symbol(),
            self.exits_to()
        )
    }
}
