use crate::error::{PoolStateError, QuoteError};
use crate::fees::FeeRate;
use crate::math::constant_product;
use crate::pools::SwapContext;
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Reserves of an `x * y = k` pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductState {
    #[serde(with = "crate::serde_u256")]
    pub reserve0: U256,
    #[serde(with = "crate::serde_u256")]
    pub reserve1: U256,
    pub fee: FeeRate,
}

impl ConstantProductState {
    pub fn new(reserve0: U256, reserve1: U256, fee: FeeRate) -> Self {
        Self {
            reserve0,
            reserve1,
            fee,
        }
    }

    fn reserves(&self, zero_for_one: bool) -> (U256, U256) {
        if zero_for_one {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }

    pub fn quote_exact_in(
        &self,
        ctx: &SwapContext,
        amount_in: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        let (reserve_in, reserve_out) = self.reserves(ctx.zero_for_one);
        let amount_out = constant_product::get_amount_out(amount_in, reserve_in, reserve_out, fee)?;
        Ok(HopQuote::new(amount_in, amount_out))
    }

    pub fn quote_exact_out(
        &self,
        ctx: &SwapContext,
        amount_out: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        let (reserve_in, reserve_out) = self.reserves(ctx.zero_for_one);
        let amount_in = constant_product::get_amount_in(amount_out, reserve_in, reserve_out, fee)?;
        Ok(HopQuote::new(amount_in, amount_out))
    }

    pub fn spot_output(&self, ctx: &SwapContext, amount_in: U256) -> Result<U256, QuoteError> {
        let (reserve_in, reserve_out) = self.reserves(ctx.zero_for_one);
        constant_product::spot_output(amount_in, reserve_in, reserve_out)
    }

    /// `sqrt(reserve0 * reserve1)`, comparable with a concentrated pool's `L`.
    pub fn nominal_liquidity(&self) -> U256 {
        constant_product::calculate_k(self.reserve0, self.reserve1).integer_sqrt()
    }

    pub fn validate(&self) -> Result<(), PoolStateError> {
        self.fee.validate()
    }
}
