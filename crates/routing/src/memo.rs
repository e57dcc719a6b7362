use crate::quote_engine;
use primitive_types::U256;
use sor_domain::entities::{Path, PoolId};
use sor_domain::value_objects::Quote;
use std::collections::HashMap;

/// Exact-in quotes computed during one selection, keyed by pool sequence
/// and input amount.
///
/// Pool snapshots are immutable for the lifetime of a request, so a stored
/// quote stays correct until the memo is dropped.
#[derive(Debug, Default)]
pub struct QuoteMemo {
    quotes: HashMap<(Vec<PoolId>, U256), Quote>,
    hits: usize,
    misses: usize,
}

impl QuoteMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quote_exact_in(&mut self, path: &Path, amount_in: U256) -> Quote {
        let key = (
            path.pools().iter().map(|pool| pool.id.clone()).collect(),
            amount_in,
        );
        if let Some(quote) = self.quotes.get(&key) {
            self.hits += 1;
            return quote.clone();
        }
        self.misses += 1;
        let quote = quote_engine::quote_exact_in(path, amount_in);
        self.quotes.insert(key, quote.clone());
        quote
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
