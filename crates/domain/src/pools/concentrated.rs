use crate::error::{PoolStateError, QuoteError};
use crate::fees::FeeRate;
use crate::math::concentrated_liquidity::compute_swap_step;
use crate::math::full_math::{Q96, mul_div};
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick,
    get_tick_at_sqrt_ratio,
};
use crate::pools::SwapContext;
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a concentrated liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedState {
    /// Current `sqrt(price) * 2^96`.
    #[serde(with = "crate::serde_u256")]
    pub sqrt_price_x96: U256,
    /// Current tick, consistent with `sqrt_price_x96`.
    pub tick: i32,
    /// Liquidity active at the current tick.
    #[serde(with = "crate::serde_wide::u128_string")]
    pub liquidity: u128,
    pub fee: FeeRate,
    pub tick_spacing: i32,
    /// Initialized ticks and the net liquidity added when crossed left to right.
    #[serde(default, with = "crate::serde_wide::liquidity_net")]
    pub ticks: BTreeMap<i32, i128>,
}

/// Accumulators of an in-progress tick walk.
struct WalkState {
    sqrt_price: U256,
    tick: i32,
    liquidity: u128,
    remaining: U256,
    calculated: U256,
}

impl ConcentratedState {
    pub fn new(
        sqrt_price_x96: U256,
        tick: i32,
        liquidity: u128,
        fee: FeeRate,
        tick_spacing: i32,
    ) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            liquidity,
            fee,
            tick_spacing,
            ticks: BTreeMap::new(),
        }
    }

    /// Adds an initialized tick.
    #[must_use]
    pub fn with_tick(mut self, tick: i32, liquidity_net: i128) -> Self {
        self.ticks.insert(tick, liquidity_net);
        self
    }

    /// Next initialized tick in the swap direction, or the global bound.
    fn next_initialized_tick(&self, tick: i32, zero_for_one: bool) -> (i32, bool) {
        if zero_for_one {
            self.ticks
                .range(..=tick)
                .next_back()
                .map_or((MIN_TICK, false), |(next, _)| (*next, true))
        } else {
            self.ticks
                .range(tick.saturating_add(1)..)
                .next()
                .map_or((MAX_TICK, false), |(next, _)| (*next, true))
        }
    }

    fn apply_liquidity_net(liquidity: u128, net: i128) -> Result<u128, QuoteError> {
        if net < 0 {
            liquidity
                .checked_sub(net.unsigned_abs())
                .ok_or(QuoteError::NumericOverflow("liquidity underflow"))
        } else {
            liquidity
                .checked_add(net.unsigned_abs())
                .ok_or(QuoteError::NumericOverflow("liquidity overflow"))
        }
    }

    /// Resolves the price bound of a swap. Returns the bound and whether it
    /// was supplied by the caller.
    fn price_limit(&self, ctx: &SwapContext) -> Result<(U256, bool), QuoteError> {
        match ctx.sqrt_price_limit_x96 {
            Some(limit) => {
                let valid = if ctx.zero_for_one {
                    limit < self.sqrt_price_x96 && limit > MIN_SQRT_RATIO
                } else {
                    limit > self.sqrt_price_x96 && limit < MAX_SQRT_RATIO
                };
                if valid {
                    Ok((limit, true))
                } else {
                    Err(QuoteError::PriceLimitReached)
                }
            }
            None if ctx.zero_for_one => Ok((MIN_SQRT_RATIO + U256::one(), false)),
            None => Ok((MAX_SQRT_RATIO - U256::one(), false)),
        }
    }

    /// Walks initialized ticks until `amount` is filled.
    ///
    /// For exact input `amount` is gross input and the result is output;
    /// for exact output it is the other way around.
    fn walk(
        &self,
        ctx: &SwapContext,
        amount: U256,
        fee: FeeRate,
        exact_in: bool,
    ) -> Result<U256, QuoteError> {
        let (limit, caller_limit) = self.price_limit(ctx)?;
        let zero_for_one = ctx.zero_for_one;

        let mut state = WalkState {
            sqrt_price: self.sqrt_price_x96,
            tick: self.tick,
            liquidity: self.liquidity,
            remaining: amount,
            calculated: U256::zero(),
        };

        while !state.remaining.is_zero() && state.sqrt_price != limit {
            let start = state.sqrt_price;
            let (tick_next, initialized) = self.next_initialized_tick(state.tick, zero_for_one);
            let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
            let sqrt_price_next = get_sqrt_ratio_at_tick(tick_next)?;

            let target = if zero_for_one {
                sqrt_price_next.max(limit)
            } else {
                sqrt_price_next.min(limit)
            };

            let step = compute_swap_step(
                state.sqrt_price,
                target,
                state.liquidity,
                state.remaining,
                fee,
                exact_in,
            )?;

            let gross_in = step
                .amount_in
                .checked_add(step.fee_amount)
                .ok_or(QuoteError::NumericOverflow("step input"))?;
            let (consumed, produced) = if exact_in {
                (gross_in, step.amount_out)
            } else {
                (step.amount_out, gross_in)
            };
            state.remaining = state.remaining.saturating_sub(consumed);
            state.calculated = state
                .calculated
                .checked_add(produced)
                .ok_or(QuoteError::NumericOverflow("accumulated amount"))?;
            state.sqrt_price = step.sqrt_price_next;

            if state.sqrt_price == sqrt_price_next {
                if initialized {
                    let net = self.ticks.get(&tick_next).copied().unwrap_or_default();
                    let net = if zero_for_one { -net } else { net };
                    state.liquidity = Self::apply_liquidity_net(state.liquidity, net)?;
                }
                state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
            } else if state.sqrt_price != start {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price)?;
            }
        }

        if !state.remaining.is_zero() {
            return Err(if caller_limit {
                QuoteError::PriceLimitReached
            } else {
                QuoteError::InsufficientLiquidity
            });
        }
        Ok(state.calculated)
    }

    pub fn quote_exact_in(
        &self,
        ctx: &SwapContext,
        amount_in: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        if amount_in.is_zero() {
            return Ok(HopQuote::new(amount_in, U256::zero()));
        }
        let amount_out = self.walk(ctx, amount_in, fee, true)?;
        Ok(HopQuote::new(amount_in, amount_out))
    }

    pub fn quote_exact_out(
        &self,
        ctx: &SwapContext,
        amount_out: U256,
        fee: FeeRate,
    ) -> Result<HopQuote, QuoteError> {
        if amount_out.is_zero() {
            return Ok(HopQuote::new(U256::zero(), amount_out));
        }
        let amount_in = self.walk(ctx, amount_out, fee, false)?;
        Ok(HopQuote::new(amount_in, amount_out))
    }

    /// Output at the current price: `amount * P` selling currency0, or
    /// `amount / P` selling currency1, with `P = (sqrtPriceX96 / 2^96)^2`.
    pub fn spot_output(&self, ctx: &SwapContext, amount_in: U256) -> Result<U256, QuoteError> {
        let sqrt_price = self.sqrt_price_x96;
        if sqrt_price.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        if ctx.zero_for_one {
            mul_div(mul_div(amount_in, sqrt_price, Q96)?, sqrt_price, Q96)
        } else {
            mul_div(mul_div(amount_in, Q96, sqrt_price)?, Q96, sqrt_price)
        }
    }

    pub fn nominal_liquidity(&self) -> U256 {
        U256::from(self.liquidity)
    }

    pub fn validate(&self) -> Result<(), PoolStateError> {
        self.fee.validate()?;
        if self.tick_spacing <= 0 {
            return Err(PoolStateError::InvalidConcentratedState("tick spacing must be positive"));
        }
        if self.sqrt_price_x96 < MIN_SQRT_RATIO || self.sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PoolStateError::InvalidConcentratedState("sqrt price out of range"));
        }
        let expected_tick = get_tick_at_sqrt_ratio(self.sqrt_price_x96)
            .map_err(|_| PoolStateError::InvalidConcentratedState("sqrt price out of range"))?;
        if expected_tick != self.tick {
            return Err(PoolStateError::InvalidConcentratedState(
                "tick does not match sqrt price",
            ));
        }
        for tick in self.ticks.keys() {
            if !(MIN_TICK..=MAX_TICK).contains(tick) {
                return Err(PoolStateError::InvalidConcentratedState("initialized tick out of range"));
            }
            if tick % self.tick_spacing != 0 {
                return Err(PoolStateError::InvalidConcentratedState(
                    "initialized tick not aligned to spacing",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIQUIDITY: u128 = 1_000_000_000_000_000_000;

    /// Liquidity in [-600, 600] around price 1.
    fn ranged_pool() -> ConcentratedState {
        ConcentratedState::new(Q96, 0, LIQUIDITY, FeeRate::from_pips(3000), 60)
            .with_tick(-600, LIQUIDITY as i128)
            .with_tick(600, -(LIQUIDITY as i128))
    }

    #[test]
    fn test_exact_in_within_single_range() {
        let pool = ranged_pool();
        let quote = pool
            .quote_exact_in(
                &SwapContext::new(true),
                U256::from(1_000_000_000_000_000u64),
                pool.fee,
            )
            .unwrap();
        assert_eq!(quote.amount_out, U256::from(996_006_981_039_903u64));
    }

    #[test]
    fn test_exhausting_liquidity_is_insufficient() {
        let pool = ranged_pool();
        let result = pool.quote_exact_in(
            &SwapContext::new(true),
            U256::from(10u128.pow(20)),
            pool.fee,
        );
        assert_eq!(result, Err(QuoteError::InsufficientLiquidity));
    }

    #[test]
    fn test_caller_limit_is_price_limit_reached() {
        let pool = ranged_pool();
        let ctx = SwapContext::new(true).with_sqrt_price_limit(get_sqrt_ratio_at_tick(-60).unwrap());
        let result = pool.quote_exact_in(&ctx, U256::from(10u128.pow(17)), pool.fee);
        assert_eq!(result, Err(QuoteError::PriceLimitReached));
    }

    #[test]
    fn test_crosses_initialized_tick() {
        // Extra liquidity only above tick 60: a large one-for-zero swap must
        // cross into it and do better than the narrow pool alone.
        let narrow = ranged_pool();
        let deep = ranged_pool()
            .with_tick(60, LIQUIDITY as i128 * 4)
            .with_tick(540, -(LIQUIDITY as i128 * 4));
        let amount = U256::from(10u128.pow(16));
        let ctx = SwapContext::new(false);

        let narrow_out = narrow.quote_exact_in(&ctx, amount, narrow.fee).unwrap();
        let deep_out = deep.quote_exact_in(&ctx, amount, deep.fee).unwrap();
        assert!(deep_out.amount_out > narrow_out.amount_out);
    }

    #[test]
    fn test_exact_out_covers_request() {
        let pool = ranged_pool();
        let wanted = U256::from(5_000_000_000_000_000u64);
        let ctx = SwapContext::new(false);
        let quote = pool.quote_exact_out(&ctx, wanted, pool.fee).unwrap();
        let check = pool.quote_exact_in(&ctx, quote.amount_in, pool.fee).unwrap();
        assert!(check.amount_out >= wanted);
    }

    #[test]
    fn test_spot_output_at_parity() {
        let pool = ranged_pool();
        let amount = U256::from(1_000_000u64);
        assert_eq!(pool.spot_output(&SwapContext::new(true), amount).unwrap(), amount);
        assert_eq!(pool.spot_output(&SwapContext::new(false), amount).unwrap(), amount);
    }

    #[test]
    fn test_validate() {
        assert!(ranged_pool().validate().is_ok());

        let mut stale_tick = ranged_pool();
        stale_tick.tick = 10;
        assert!(stale_tick.validate().is_err());

        let misaligned = ranged_pool().with_tick(61, 1);
        assert!(misaligned.validate().is_err());

        let mut bad_spacing = ranged_pool();
        bad_spacing.tick_spacing = 0;
        assert!(bad_spacing.validate().is_err());
    }
}
