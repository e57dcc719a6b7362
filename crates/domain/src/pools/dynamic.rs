use crate::error::{PoolStateError, QuoteError};
use crate::fees::DynamicFee;
use crate::pools::SwapContext;
use crate::pools::concentrated::ConcentratedState;
use crate::pools::constant_product::ConstantProductState;
use crate::pools::stable::StableState;
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Pricing curve wrapped by a dynamic-fee pool.
///
/// The `fee` field of the wrapped state is ignored; the composed
/// [`DynamicFee`] is charged instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlyingCurve {
    ConstantProduct(ConstantProductState),
    ConcentratedLiquidity(ConcentratedState),
    StableInvariant(StableState),
}

/// Hook-enabled pool whose fee is composed per swap direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicState {
    pub fee: DynamicFee,
    pub curve: UnderlyingCurve,
}

impl DynamicState {
    pub fn new(fee: DynamicFee, curve: UnderlyingCurve) -> Self {
        Self { fee, curve }
    }

    pub fn quote_exact_in(&self, ctx: &SwapContext, amount_in: U256) -> Result<HopQuote, QuoteError> {
        let fee = self.fee.effective(ctx.zero_for_one)?;
        match &self.curve {
            UnderlyingCurve::ConstantProduct(state) => state.quote_exact_in(ctx, amount_in, fee),
            UnderlyingCurve::ConcentratedLiquidity(state) => state.quote_exact_in(ctx, amount_in, fee),
            UnderlyingCurve::StableInvariant(state) => state.quote_exact_in(ctx, amount_in, fee),
        }
    }

    pub fn quote_exact_out(
        &self,
        ctx: &SwapContext,
        amount_out: U256,
    ) -> Result<HopQuote, QuoteError> {
        let fee = self.fee.effective(ctx.zero_for_one)?;
        match &self.curve {
            UnderlyingCurve::ConstantProduct(state) => state.quote_exact_out(ctx, amount_out, fee),
            UnderlyingCurve::ConcentratedLiquidity(state) => {
                state.quote_exact_out(ctx, amount_out, fee)
            }
            UnderlyingCurve::StableInvariant(state) => state.quote_exact_out(ctx, amount_out, fee),
        }
    }

    pub fn spot_output(&self, ctx: &SwapContext, amount_in: U256) -> Result<U256, QuoteError> {
        match &self.curve {
            UnderlyingCurve::ConstantProduct(state) => state.spot_output(ctx, amount_in),
            UnderlyingCurve::ConcentratedLiquidity(state) => state.spot_output(ctx, amount_in),
            UnderlyingCurve::StableInvariant(state) => state.spot_output(ctx, amount_in),
        }
    }

    pub fn nominal_liquidity(&self) -> U256 {
        match &self.curve {
            UnderlyingCurve::ConstantProduct(state) => state.nominal_liquidity(),
            UnderlyingCurve::ConcentratedLiquidity(state) => state.nominal_liquidity(),
            UnderlyingCurve::StableInvariant(state) => state.nominal_liquidity(),
        }
    }

    pub fn validate(&self, decimals0: u8, decimals1: u8) -> Result<(), PoolStateError> {
        self.fee.validate()?;
        match &self.curve {
            UnderlyingCurve::ConstantProduct(_) => Ok(()),
            UnderlyingCurve::ConcentratedLiquidity(state) => {
                // The wrapped fee is unused; only the price state is checked.
                let mut state = state.clone();
                state.fee = self.fee.base_fee;
                state.validate()
            }
            UnderlyingCurve::StableInvariant(state) => {
                let mut state = state.clone();
                state.fee = self.fee.base_fee;
                state.validate(decimals0, decimals1)
            }
        }
    }
}
