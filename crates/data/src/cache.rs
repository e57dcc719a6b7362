//! Block-scoped cache of candidate sets.
//!
//! Entries are keyed by the unordered currency pair, the sorted intermediate
//! set and the block, and are replaced wholesale. Requests without a pinned
//! block always go to the inner provider, since "latest" changes every block.

use crate::error::ProviderError;
use crate::provider::CandidatePoolProvider;
use crate::request::CandidateRequest;
use async_trait::async_trait;
use sor_domain::entities::Currency;
use sor_domain::value_objects::{BlockReference, CandidateSet};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Pair in ascending order, so `(a, b)` and `(b, a)` share an entry.
    pub pair: (Currency, Currency),
    pub intermediates: Vec<Currency>,
    pub block: BlockReference,
}

impl CacheKey {
    /// `None` when the request is not pinned to a block.
    pub fn for_request(request: &CandidateRequest) -> Option<Self> {
        let block = request.block?;
        let (a, b) = (&request.currency_a, &request.currency_b);
        let pair = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        let mut intermediates = request.intermediates.clone();
        intermediates.sort();
        intermediates.dedup();
        Some(Self {
            pair,
            intermediates,
            block,
        })
    }
}

/// Shared candidate-set cache.
#[derive(Debug, Default)]
pub struct CandidateCache {
    entries: RwLock<HashMap<CacheKey, Arc<CandidateSet>>>,
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<CandidateSet>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, candidates: Arc<CandidateSet>) {
        self.entries.write().await.insert(key, candidates);
    }

    /// Drops every entry read at `block`.
    pub async fn invalidate_block(&self, block: BlockReference) -> usize {
        self.retain(|key| key.block != block).await
    }

    /// Drops every entry read before `block`.
    pub async fn invalidate_before(&self, block: BlockReference) -> usize {
        self.retain(|key| key.block >= block).await
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn retain(&self, keep: impl Fn(&CacheKey) -> bool) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| keep(key));
        let removed = before - entries.len();
        debug!(removed, "Invalidated cached candidate sets");
        removed
    }
}

/// Read-through cache in front of another provider.
pub struct CachingProvider<P> {
    inner: P,
    cache: Arc<CandidateCache>,
}

impl<P: CandidatePoolProvider> CachingProvider<P> {
    pub fn new(inner: P, cache: Arc<CandidateCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<CandidateCache> {
        &self.cache
    }
}

#[async_trait]
impl<P: CandidatePoolProvider> CandidatePoolProvider for CachingProvider<P> {
    async fn fetch_pools(&self, request: &CandidateRequest) -> Result<CandidateSet, ProviderError> {
        let Some(key) = CacheKey::for_request(request) else {
            return self.inner.fetch_pools(request).await;
        };

        if let Some(hit) = self.cache.get(&key).await {
            debug!(block = %key.block, pools = hit.len(), "Candidate cache hit");
            return Ok(hit.as_ref().clone());
        }

        let candidates = self.inner.fetch_pools(request).await?;
        self.cache.insert(key, Arc::new(candidates.clone())).await;
        Ok(candidates)
    }
}
