use crate::error::ProviderError;
use crate::provider::PoolSource;
use crate::request::CandidateRequest;
use crate::snapshot::PoolSnapshot;
use async_trait::async_trait;
use sor_domain::entities::Pool;
use sor_domain::value_objects::BlockReference;
use std::path::Path;
use tracing::info;

/// Pool source serving a fixed snapshot, typically loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct StaticPoolSource {
    name: String,
    pools: Vec<Pool>,
    block: Option<BlockReference>,
}

impl StaticPoolSource {
    pub fn new(name: impl Into<String>, pools: Vec<Pool>) -> Self {
        Self {
            name: name.into(),
            pools,
            block: None,
        }
    }

    /// Loads a [`PoolSnapshot`] document from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a snapshot
    /// document. Individual undecodable pools are skipped.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let snapshot = PoolSnapshot::from_json_str(&contents)?;
        let name = path.display().to_string();
        let pools = snapshot.decode_pools(&name);
        info!(path = %name, pools = pools.len(), "Loaded pool snapshot");
        Ok(Self {
            name,
            pools,
            block: snapshot.block,
        })
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Block recorded in the snapshot, if any.
    pub fn block(&self) -> Option<BlockReference> {
        self.block
    }
}

#[async_trait]
impl PoolSource for StaticPoolSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, request: &CandidateRequest) -> Result<Vec<Pool>, ProviderError> {
        Ok(self
            .pools
            .iter()
            .filter(|pool| request.is_relevant(pool))
            .cloned()
            .collect())
    }
}
