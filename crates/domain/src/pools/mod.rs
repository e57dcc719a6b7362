//! Per-family pool state and quoting.
//!
//! [`PoolModel`] is a closed enum over every supported curve. Each variant
//! implements both quoting directions, and the enum dispatches by exhaustive
//! `match`, so a new pool family cannot be added without handling it
//! everywhere.

pub mod concentrated;
pub mod constant_product;
pub mod dynamic;
pub mod stable;

#[cfg(test)]
mod proptest_properties;

pub use concentrated::ConcentratedState;
pub use constant_product::ConstantProductState;
pub use dynamic::{DynamicState, UnderlyingCurve};
pub use stable::StableState;

use crate::enums::PoolType;
use crate::error::{PoolStateError, QuoteError};
use crate::fees::FeeRate;
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Direction and precision of a single hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapContext {
    /// `true` when currency0 is sold for currency1.
    pub zero_for_one: bool,
    pub decimals0: u8,
    pub decimals1: u8,
    /// Caller supplied price bound; only concentrated liquidity honors it.
    pub sqrt_price_limit_x96: Option<U256>,
}

impl SwapContext {
    pub fn new(zero_for_one: bool) -> Self {
        Self {
            zero_for_one,
            decimals0: 18,
            decimals1: 18,
            sqrt_price_limit_x96: None,
        }
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals0: u8, decimals1: u8) -> Self {
        self.decimals0 = decimals0;
        self.decimals1 = decimals1;
        self
    }

    #[must_use]
    pub fn with_sqrt_price_limit(mut self, limit: U256) -> Self {
        self.sqrt_price_limit_x96 = Some(limit);
        self
    }
}

/// Curve state of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolModel {
    ConstantProduct(ConstantProductState),
    ConcentratedLiquidity(ConcentratedState),
    StableInvariant(StableState),
    Dynamic(DynamicState),
}

impl PoolModel {
    pub fn pool_type(&self) -> PoolType {
        match self {
            PoolModel::ConstantProduct(_) => PoolType::ConstantProduct,
            PoolModel::ConcentratedLiquidity(_) => PoolType::ConcentratedLiquidity,
            PoolModel::StableInvariant(_) => PoolType::StableInvariant,
            PoolModel::Dynamic(_) => PoolType::Dynamic,
        }
    }

    /// Fee charged for a swap in the given direction.
    pub fn effective_fee(&self, zero_for_one: bool) -> Result<FeeRate, QuoteError> {
        match self {
            PoolModel::ConstantProduct(state) => Ok(state.fee),
            PoolModel::ConcentratedLiquidity(state) => Ok(state.fee),
            PoolModel::StableInvariant(state) => Ok(state.fee),
            PoolModel::Dynamic(state) => state.fee.effective(zero_for_one),
        }
    }

    pub fn quote_exact_in(&self, ctx: &SwapContext, amount_in: U256) -> Result<HopQuote, QuoteError> {
        match self {
            PoolModel::ConstantProduct(state) => state.quote_exact_in(ctx, amount_in, state.fee),
            PoolModel::ConcentratedLiquidity(state) => {
                state.quote_exact_in(ctx, amount_in, state.fee)
            }
            PoolModel::StableInvariant(state) => state.quote_exact_in(ctx, amount_in, state.fee),
            PoolModel::Dynamic(state) => state.quote_exact_in(ctx, amount_in),
        }
    }

    pub fn quote_exact_out(
        &self,
        ctx: &SwapContext,
        amount_out: U256,
    ) -> Result<HopQuote, QuoteError> {
        match self {
            PoolModel::ConstantProduct(state) => state.quote_exact_out(ctx, amount_out, state.fee),
            PoolModel::ConcentratedLiquidity(state) => {
                state.quote_exact_out(ctx, amount_out, state.fee)
            }
            PoolModel::StableInvariant(state) => state.quote_exact_out(ctx, amount_out, state.fee),
            PoolModel::Dynamic(state) => state.quote_exact_out(ctx, amount_out),
        }
    }

    pub fn spot_output(&self, ctx: &SwapContext, amount_in: U256) -> Result<U256, QuoteError> {
        match self {
            PoolModel::ConstantProduct(state) => state.spot_output(ctx, amount_in),
            PoolModel::ConcentratedLiquidity(state) => state.spot_output(ctx, amount_in),
            PoolModel::StableInvariant(state) => state.spot_output(ctx, amount_in),
            PoolModel::Dynamic(state) => state.spot_output(ctx, amount_in),
        }
    }

    /// Depth estimate in `sqrt(x * y)` units, used only to order candidates.
    pub fn nominal_liquidity(&self) -> U256 {
        match self {
            PoolModel::ConstantProduct(state) => state.nominal_liquidity(),
            PoolModel::ConcentratedLiquidity(state) => state.nominal_liquidity(),
            PoolModel::StableInvariant(state) => state.nominal_liquidity(),
            PoolModel::Dynamic(state) => state.nominal_liquidity(),
        }
    }

    pub fn validate(&self, decimals0: u8, decimals1: u8) -> Result<(), PoolStateError> {
        match self {
            PoolModel::ConstantProduct(state) => state.validate(),
            PoolModel::ConcentratedLiquidity(state) => state.validate(),
            PoolModel::StableInvariant(state) => state.validate(decimals0, decimals1),
            PoolModel::Dynamic(state) => state.validate(decimals0, decimals1),
        }
    }
}
