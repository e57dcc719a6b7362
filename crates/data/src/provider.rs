//! Candidate pool providers.

use crate::error::ProviderError;
use crate::request::CandidateRequest;
use async_trait::async_trait;
use futures::future::join_all;
use sor_domain::entities::{Pool, PoolId};
use sor_domain::value_objects::{CandidateSet, ExcludedPool};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default upper bound on a single source fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// One upstream supplier of pool snapshots.
#[async_trait]
pub trait PoolSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetches pools for the request. Sources may return pools outside the
    /// request; the provider filters them.
    async fn fetch(&self, request: &CandidateRequest) -> Result<Vec<Pool>, ProviderError>;
}

/// Supplies the candidate set for a routing request.
#[async_trait]
pub trait CandidatePoolProvider: Send + Sync {
    async fn fetch_pools(&self, request: &CandidateRequest) -> Result<CandidateSet, ProviderError>;
}

#[async_trait]
impl<P: CandidatePoolProvider + ?Sized> CandidatePoolProvider for Arc<P> {
    async fn fetch_pools(&self, request: &CandidateRequest) -> Result<CandidateSet, ProviderError> {
        (**self).fetch_pools(request).await
    }
}

/// Queries every source concurrently and merges what comes back.
///
/// Sources that fail or exceed the timeout are logged and skipped; the
/// request only fails when no source succeeds.
#[derive(Clone)]
pub struct MultiSourceProvider {
    sources: Vec<Arc<dyn PoolSource>>,
    fetch_timeout: Duration,
}

impl MultiSourceProvider {
    pub fn new(sources: Vec<Arc<dyn PoolSource>>) -> Self {
        Self {
            sources,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    async fn fetch_source(
        &self,
        source: &Arc<dyn PoolSource>,
        request: &CandidateRequest,
    ) -> Result<Vec<Pool>, ProviderError> {
        match timeout(self.fetch_timeout, source.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                name: source.name().to_string(),
                timeout_ms: self.fetch_timeout.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl CandidatePoolProvider for MultiSourceProvider {
    async fn fetch_pools(&self, request: &CandidateRequest) -> Result<CandidateSet, ProviderError> {
        if self.sources.is_empty() {
            return Err(ProviderError::NoSources);
        }

        let results = join_all(
            self.sources
                .iter()
                .map(|source| self.fetch_source(source, request)),
        )
        .await;

        let mut succeeded = 0usize;
        let mut fetched = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(pools) => {
                    debug!(source = source.name(), pools = pools.len(), "Pool source answered");
                    succeeded += 1;
                    fetched.extend(pools);
                }
                Err(err) => warn!(source = source.name(), error = %err, "Pool source failed"),
            }
        }

        if succeeded == 0 {
            return Err(ProviderError::AllSourcesFailed {
                attempted: self.sources.len(),
            });
        }

        let candidates = assemble(fetched, request);
        info!(
            currency_a = %request.currency_a,
            currency_b = %request.currency_b,
            sources_ok = succeeded,
            sources = self.sources.len(),
            pools = candidates.len(),
            excluded = candidates.excluded.len(),
            "Fetched candidate pools"
        );
        Ok(candidates)
    }
}

/// Filters, deduplicates and validates fetched pools into a candidate set.
///
/// The first pool seen for an id wins. Malformed pools are recorded as
/// excluded. The result is sorted by pool id.
pub fn assemble(fetched: Vec<Pool>, request: &CandidateRequest) -> CandidateSet {
    let mut seen: HashSet<PoolId> = HashSet::new();
    let mut pools = Vec::new();
    let mut excluded = Vec::new();

    for pool in fetched {
        if !request.is_relevant(&pool) || !seen.insert(pool.id.clone()) {
            continue;
        }
        match pool.validate() {
            Ok(()) => pools.push(Arc::new(pool)),
            Err(reason) => {
                warn!(pool = %pool.id, reason = %reason, "Excluding malformed pool");
                excluded.push(ExcludedPool {
                    pool_id: pool.id,
                    reason,
                });
            }
        }
    }

    pools.sort_by(|a, b| a.id.cmp(&b.id));
    let mut candidates = CandidateSet::new(pools, request.block);
    candidates.excluded = excluded;
    candidates
}
