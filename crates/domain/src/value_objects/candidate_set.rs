use crate::entities::pool::{Pool, PoolId};
use crate::error::PoolStateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Block height a snapshot was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockReference(pub u64);

impl fmt::Display for BlockReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pool dropped from a candidate set because its state is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedPool {
    pub pool_id: PoolId,
    pub reason: PoolStateError,
}

/// Request-scoped pool snapshot handed to the router.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    /// Valid pools, sorted by id and unique by id.
    pub pools: Vec<Arc<Pool>>,
    pub block: Option<BlockReference>,
    pub fetched_at: DateTime<Utc>,
    pub excluded: Vec<ExcludedPool>,
}

impl CandidateSet {
    pub fn new(pools: Vec<Arc<Pool>>, block: Option<BlockReference>) -> Self {
        Self {
            pools,
            block,
            fetched_at: Utc::now(),
            excluded: Vec::new(),
        }
    }

    pub fn empty(block: Option<BlockReference>) -> Self {
        Self::new(Vec::new(), block)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
