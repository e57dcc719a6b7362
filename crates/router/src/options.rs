use serde::{Deserialize, Serialize};
use sor_domain::entities::{Currency, Pool};
use sor_domain::enums::PoolType;
use sor_domain::value_objects::BlockReference;

/// Per-request overrides of the router configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeOptions {
    /// Maximum pools per path; `None` uses the router default.
    pub max_hops: Option<usize>,
    /// Maximum routes per trade; `None` uses the router default.
    pub max_splits: Option<usize>,
    /// Pool families allowed in routes; `None` allows every family.
    pub pool_types: Option<Vec<PoolType>>,
    /// Block to route at; `None` means latest.
    pub block: Option<BlockReference>,
    /// Currencies allowed as intermediate hops.
    pub intermediates: Vec<Currency>,
}

impl TradeOptions {
    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    #[must_use]
    pub fn with_max_splits(mut self, max_splits: usize) -> Self {
        self.max_splits = Some(max_splits);
        self
    }

    #[must_use]
    pub fn with_pool_types(mut self, pool_types: Vec<PoolType>) -> Self {
        self.pool_types = Some(pool_types);
        self
    }

    #[must_use]
    pub fn at_block(mut self, block: BlockReference) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub fn with_intermediates(mut self, intermediates: Vec<Currency>) -> Self {
        self.intermediates = intermediates;
        self
    }

    pub fn allows(&self, pool: &Pool) -> bool {
        self.pool_types
            .as_ref()
            .is_none_or(|types| types.contains(&pool.pool_type()))
    }
}
