use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol family a pool belongs to.
///
/// Used as a tag on every pool and as the key of the protocol mix passed to
/// execution-cost models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    V2,
    V3,
    Stable,
    V4,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::V2 => "v2",
            Protocol::V3 => "v3",
            Protocol::Stable => "stable",
            Protocol::V4 => "v4",
        };
        f.write_str(name)
    }
}

/// Pricing curve family of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    ConstantProduct,
    ConcentratedLiquidity,
    StableInvariant,
    Dynamic,
}

/// Direction in which a quote is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapMode {
    /// Input amount fixed, output computed.
    ExactIn,
    /// Output amount fixed, input computed.
    ExactOut,
}
