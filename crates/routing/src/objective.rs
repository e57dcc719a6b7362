//! Execution-cost models used to score routes.
//!
//! A route's score is `amount_out - cost_penalty(hops, protocol mix)`, with
//! the penalty expressed in raw units of the output currency.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sor_domain::entities::ProtocolMix;
use sor_domain::enums::Protocol;
use std::collections::BTreeMap;
use std::fmt;

pub trait CostModel: fmt::Debug + Send + Sync {
    /// Cost of executing a path, in output currency units.
    fn cost_penalty(&self, hop_count: usize, mix: &ProtocolMix) -> U256;
}

/// Flat cost per hop.
///
/// The default charges nothing, so routes compete on gross output alone and
/// split trades are accepted as soon as they produce strictly more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FixedHopCost {
    #[serde(with = "sor_domain::serde_u256")]
    pub per_hop: U256,
}

impl FixedHopCost {
    pub fn new(per_hop: U256) -> Self {
        Self { per_hop }
    }
}

impl CostModel for FixedHopCost {
    fn cost_penalty(&self, hop_count: usize, _mix: &ProtocolMix) -> U256 {
        self.per_hop.saturating_mul(U256::from(hop_count))
    }
}

/// Gas units charged once per route regardless of hops.
pub const DEFAULT_BASE_GAS: u64 = 21_000;

/// Gas-denominated cost converted into the output currency.
///
/// `penalty = (base_gas + Σ gas(protocol) · hops) · gas_price
///            · output_per_native_numerator / output_per_native_denominator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasCostModel {
    /// Gas charged once per route.
    pub base_gas: u64,
    /// Gas charged per hop through a pool of the given protocol.
    pub gas_per_hop: BTreeMap<Protocol, u64>,
    /// Price of one gas unit in native wei.
    #[serde(with = "sor_domain::serde_u256")]
    pub gas_price_wei: U256,
    /// Raw output units per `output_per_native_denominator` native wei.
    #[serde(with = "sor_domain::serde_u256")]
    pub output_per_native_numerator: U256,
    #[serde(with = "sor_domain::serde_u256")]
    pub output_per_native_denominator: U256,
}

impl GasCostModel {
    /// Creates a model with typical per-protocol swap gas usage.
    pub fn new(gas_price_wei: U256, numerator: U256, denominator: U256) -> Self {
        let gas_per_hop = BTreeMap::from([
            (Protocol::V2, 60_000),
            (Protocol::V3, 100_000),
            (Protocol::Stable, 120_000),
            (Protocol::V4, 90_000),
        ]);
        Self {
            base_gas: DEFAULT_BASE_GAS,
            gas_per_hop,
            gas_price_wei,
            output_per_native_numerator: numerator,
            output_per_native_denominator: denominator,
        }
    }

    /// Overrides the per-hop gas of one protocol.
    #[must_use]
    pub fn with_protocol_gas(mut self, protocol: Protocol, gas: u64) -> Self {
        self.gas_per_hop.insert(protocol, gas);
        self
    }

    /// Total gas units for a path with the given protocol mix.
    pub fn gas_units(&self, mix: &ProtocolMix) -> u64 {
        mix.iter().fold(self.base_gas, |total, (protocol, hops)| {
            let per_hop = self.gas_per_hop.get(protocol).copied().unwrap_or(0);
            total.saturating_add(per_hop.saturating_mul(*hops as u64))
        })
    }
}

impl CostModel for GasCostModel {
    fn cost_penalty(&self, _hop_count: usize, mix: &ProtocolMix) -> U256 {
        if self.output_per_native_denominator.is_zero() {
            return U256::zero();
        }
        let native_cost = U256::from(self.gas_units(mix)).saturating_mul(self.gas_price_wei);
        sor_domain::math::full_math::mul_div(
            native_cost,
            self.output_per_native_numerator,
            self.output_per_native_denominator,
        )
        .unwrap_or(U256::MAX)
    }
}
