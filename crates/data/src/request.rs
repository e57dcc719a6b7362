use serde::{Deserialize, Serialize};
use sor_domain::entities::{Currency, Pool};
use sor_domain::value_objects::BlockReference;
use std::collections::BTreeSet;

/// Pools wanted for routing between two currencies.
///
/// A pool is relevant when both of its currencies belong to the pair or to
/// the intermediate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRequest {
    pub currency_a: Currency,
    pub currency_b: Currency,
    /// Currencies allowed as intermediate hops.
    #[serde(default)]
    pub intermediates: Vec<Currency>,
    /// Block to read at; `None` means latest.
    #[serde(default)]
    pub block: Option<BlockReference>,
}

impl CandidateRequest {
    pub fn new(currency_a: Currency, currency_b: Currency) -> Self {
        Self {
            currency_a,
            currency_b,
            intermediates: Vec::new(),
            block: None,
        }
    }

    #[must_use]
    pub fn with_intermediates(mut self, intermediates: Vec<Currency>) -> Self {
        self.intermediates = intermediates;
        self
    }

    #[must_use]
    pub fn at_block(mut self, block: BlockReference) -> Self {
        self.block = Some(block);
        self
    }

    /// Pair and intermediates, deduplicated and sorted.
    pub fn currencies(&self) -> BTreeSet<&Currency> {
        let mut currencies: BTreeSet<&Currency> = self.intermediates.iter().collect();
        currencies.insert(&self.currency_a);
        currencies.insert(&self.currency_b);
        currencies
    }

    pub fn is_relevant(&self, pool: &Pool) -> bool {
        let currencies = self.currencies();
        currencies.contains(&pool.currency0) && currencies.contains(&pool.currency1)
    }
}
