//! JSON pool snapshot documents.
//!
//! ```json
//! { "block": 19000000, "pools": [ { "id": "0x..", "protocol": "v2", ... } ] }
//! ```
//!
//! Pools are decoded one by one, so a single malformed entry is skipped
//! instead of failing the whole document.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sor_domain::entities::Pool;
use sor_domain::value_objects::BlockReference;
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Block the snapshot was taken at.
    #[serde(default)]
    pub block: Option<BlockReference>,
    pub pools: Vec<Value>,
}

impl PoolSnapshot {
    pub fn from_pools(pools: &[Pool], block: Option<BlockReference>) -> Result<Self, ProviderError> {
        let pools = pools
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { block, pools })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes every pool entry, skipping the ones that do not parse.
    pub fn decode_pools(&self, source: &str) -> Vec<Pool> {
        self.pools
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<Pool>(value.clone()) {
                    Ok(pool) => Some(pool),
                    Err(err) => {
                        warn!(source, index, error = %err, "Skipping undecodable pool entry");
                        None
                    }
                }
            })
            .collect()
    }
}
