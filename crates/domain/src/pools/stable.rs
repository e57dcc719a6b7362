use crate::error::{PoolStateError, QuoteError};
use crate::fees::FeeRate;
use crate::math::full_math::div_rounding_up;
use crate::math::stable_swap::{self, normalization_factor};
use crate::pools::SwapContext;
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Largest accepted amplification coefficient.
pub const MAX_AMPLIFICATION: u64 = 1_000_000;

/// Balances of a two-coin stable pool, in each coin's native precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableState {
    #[serde(with = "crate::serde_u256")]
    pub balance0: U256,
    #[serde(with = "crate::serde_u256")]
    pub balance1: U256,
    pub amplification: u64,
    pub fee: FeeRate,
}

/// Balances and scaling factors oriented along a swap direction.
struct Oriented {
    balance_in: U256,
    balance_out: U256,
    rate_in: U256,
    rate_out: U256,
}

fn scale(amount: U256, rate: U256) -> Result<U256, QuoteError> {
    amount
        .checked_mul(rate)
        .ok_or(QuoteError::NumericOverflow("normalized amount"))
}

impl StableState {
    pub fn new(balance0: U256, balance1: U256, amplification: u64, fee: FeeRate) -> Self {
        Self {
            balance0,
            balance1,
            amplification,
            fee,
        }
    }

    fn orient(&self, ctx: &SwapContext) -> Result<Oriented, QuoteError> {
        let rate0 = normalization_factor(ctx.decimals0)?;
        let rate1 = normalization_factor(ctx.decimals1)?;
        let balance0 = scale(self.balance0, rate0)?;
        let balance1 = scale(self.balance1, rate1)?;
        Ok(if ctx.zero_for_one {
            Oriented {
                balance_in: balance0,
                balance_out: balance1,
                rate_in: rate0,
                rate_out: rate1,
            }
        } else {
            Oriented {
                balance_in: balance1,
                balance_out: balance0,
                rate_in: rate1,
                rate_out: rate0,
            }
        })
    }

    pub fn quote_exact_in(
        &self,
        ctx: &SwapContext,
        amount_in: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        let o = self.orient(ctx)?;
        let normalized_out = stable_swap::get_amount_out(
            scale(amount_in, o.rate_in)?,
            o.balance_in,
            o.balance_out,
            self.amplification,
            fee,
        )?;
        Ok(HopQuote::new(amount_in, normalized_out / o.rate_out))
    }

    pub fn quote_exact_out(
        &self,
        ctx: &SwapContext,
        amount_out: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        let o = self.orient(ctx)?;
        let normalized_in = stable_swap::get_amount_in(
            scale(amount_out, o.rate_out)?,
            o.balance_in,
            o.balance_out,
            self.amplification,
            fee,
        )?;
        Ok(HopQuote::new(
            div_rounding_up(normalized_in, o.rate_in)?,
            amount_out,
        ))
    }

    pub fn spot_output(&self, ctx: &SwapContext, amount_in: U256) -> Result<U256, QuoteError> {
        let o = self.orient(ctx)?;
        let normalized = stable_swap::spot_output(
            scale(amount_in, o.rate_in)?,
            o.balance_in,
            o.balance_out,
            self.amplification,
        )?;
        Ok(normalized / o.rate_out)
    }

    /// `sqrt(balance0 * balance1)` on raw balances.
    pub fn nominal_liquidity(&self) -> U256 {
        self.balance0.saturating_mul(self.balance1).integer_sqrt()
    }

    pub fn validate(&self, decimals0: u8, decimals1: u8) -> Result<(), PoolStateError> {
        self.fee.validate()?;
        if self.amplification == 0 || self.amplification > MAX_AMPLIFICATION {
            return Err(PoolStateError::InvalidStableState("amplification out of range"));
        }
        if normalization_factor(decimals0).is_err() || normalization_factor(decimals1).is_err() {
            return Err(PoolStateError::InvalidStableState(
                "currency precision above 18 decimals",
            ));
        }
        Ok(())
    }
}
