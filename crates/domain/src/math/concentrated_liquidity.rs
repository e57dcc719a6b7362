//! Sqrt-price math and single-step swap computation for concentrated
//! liquidity pools.
//!
//! Prices are `sqrtPriceX96` (Q64.96). Amounts owed to the pool round up,
//! amounts paid out round down.

use crate::error::QuoteError;
use crate::fees::{FEE_DENOMINATOR, FeeRate};
use crate::math::full_math::{Q96, div_rounding_up, mul_div, mul_div_rounding_up};
use primitive_types::U256;

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

/// Amount of currency0 between two sqrt prices for liquidity `L`.
/// delta_x = L * (sqrt(P_b) - sqrt(P_a)) / (sqrt(P_a) * sqrt(P_b))
pub fn get_amount0_delta(
    sqrt_ratio_a: U256,
    sqrt_ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, QuoteError> {
    let (lower, upper) = sorted(sqrt_ratio_a, sqrt_ratio_b);
    if lower.is_zero() {
        return Err(QuoteError::NumericOverflow("sqrt price must be positive"));
    }

    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = upper - lower;

    if round_up {
        div_rounding_up(mul_div_rounding_up(numerator1, numerator2, upper)?, lower)
    } else {
        Ok(mul_div(numerator1, numerator2, upper)? / lower)
    }
}

/// Amount of currency1 between two sqrt prices for liquidity `L`.
/// delta_y = L * (sqrt(P_b) - sqrt(P_a))
pub fn get_amount1_delta(
    sqrt_ratio_a: U256,
    sqrt_ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, QuoteError> {
    let (lower, upper) = sorted(sqrt_ratio_a, sqrt_ratio_b);
    let diff = upper - lower;
    if round_up {
        mul_div_rounding_up(U256::from(liquidity), diff, Q96)
    } else {
        mul_div(U256::from(liquidity), diff, Q96)
    }
}

fn next_sqrt_price_from_amount0_rounding_up(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, QuoteError> {
    if amount.is_zero() {
        return Ok(sqrt_price);
    }
    let numerator1 = U256::from(liquidity) << 96;
    let product = amount
        .checked_mul(sqrt_price)
        .ok_or(QuoteError::NumericOverflow("amount0 times sqrt price"))?;

    let denominator = if add {
        numerator1
            .checked_add(product)
            .ok_or(QuoteError::NumericOverflow("amount0 denominator"))?
    } else {
        if numerator1 <= product {
            return Err(QuoteError::InsufficientLiquidity);
        }
        numerator1 - product
    };
    mul_div_rounding_up(numerator1, sqrt_price, denominator)
}

fn next_sqrt_price_from_amount1_rounding_down(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, QuoteError> {
    if liquidity == 0 {
        return Err(QuoteError::InsufficientLiquidity);
    }
    let liquidity = U256::from(liquidity);
    if add {
        sqrt_price
            .checked_add(mul_div(amount, Q96, liquidity)?)
            .ok_or(QuoteError::NumericOverflow("next sqrt price"))
    } else {
        let quotient = mul_div_rounding_up(amount, Q96, liquidity)?;
        if sqrt_price <= quotient {
            return Err(QuoteError::InsufficientLiquidity);
        }
        Ok(sqrt_price - quotient)
    }
}

/// Sqrt price after adding `amount_in` of the input currency.
pub fn get_next_sqrt_price_from_input(
    sqrt_price: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, QuoteError> {
    if zero_for_one {
        next_sqrt_price_from_amount0_rounding_up(sqrt_price, liquidity, amount_in, true)
    } else {
        next_sqrt_price_from_amount1_rounding_down(sqrt_price, liquidity, amount_in, true)
    }
}

/// Sqrt price after removing `amount_out` of the output currency.
pub fn get_next_sqrt_price_from_output(
    sqrt_price: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, QuoteError> {
    if zero_for_one {
        next_sqrt_price_from_amount1_rounding_down(sqrt_price, liquidity, amount_out, false)
    } else {
        next_sqrt_price_from_amount0_rounding_up(sqrt_price, liquidity, amount_out, false)
    }
}

/// Result of swapping within a single initialized tick range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next: U256,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
}

/// Swaps as far as possible toward `sqrt_price_target`.
///
/// With `exact_in` the remaining amount is gross input (fee included),
/// otherwise it is the output still owed. The direction follows from the
/// relative position of the current and target prices.
pub fn compute_swap_step(
    sqrt_price_current: U256,
    sqrt_price_target: U256,
    liquidity: u128,
    amount_remaining: U256,
    fee: FeeRate,
    exact_in: bool,
) -> Result<SwapStep, QuoteError> {
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let denominator = U256::from(FEE_DENOMINATOR);
    let complement = U256::from(fee.complement());

    let mut amount_in = U256::zero();
    let mut amount_out = U256::zero();

    let sqrt_price_next = if exact_in {
        let remaining_less_fee = mul_div(amount_remaining, complement, denominator)?;
        amount_in = if zero_for_one {
            get_amount0_delta(sqrt_price_target, sqrt_price_current, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_price_current, sqrt_price_target, liquidity, true)?
        };
        if remaining_less_fee >= amount_in {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_input(
                sqrt_price_current,
                liquidity,
                remaining_less_fee,
                zero_for_one,
            )?
        }
    } else {
        amount_out = if zero_for_one {
            get_amount1_delta(sqrt_price_target, sqrt_price_current, liquidity, false)?
        } else {
            get_amount0_delta(sqrt_price_current, sqrt_price_target, liquidity, false)?
        };
        if amount_remaining >= amount_out {
            sqrt_price_target
        } else {
            get_next_sqrt_price_from_output(
                sqrt_price_current,
                liquidity,
                amount_remaining,
                zero_for_one,
            )?
        }
    };

    let reached_target = sqrt_price_next == sqrt_price_target;

    if zero_for_one {
        if !(reached_target && exact_in) {
            amount_in = get_amount0_delta(sqrt_price_next, sqrt_price_current, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out = get_amount1_delta(sqrt_price_next, sqrt_price_current, liquidity, false)?;
        }
    } else {
        if !(reached_target && exact_in) {
            amount_in = get_amount1_delta(sqrt_price_current, sqrt_price_next, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out = get_amount0_delta(sqrt_price_current, sqrt_price_next, liquidity, false)?;
        }
    }

    if !exact_in && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if exact_in && !reached_target {
        // The whole remainder is consumed; whatever did not move the price is fee.
        amount_remaining.saturating_sub(amount_in)
    } else {
        mul_div_rounding_up(amount_in, U256::from(fee.pips()), complement)?
    };

    Ok(SwapStep {
        sqrt_price_next,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;

    const LIQUIDITY: u128 = 1_000_000_000_000_000_000;

    fn fee() -> FeeRate {
        FeeRate::from_pips(3000)
    }

    #[test]
    fn test_amount_deltas_rounding() {
        let a = get_sqrt_ratio_at_tick(0).unwrap();
        let b = get_sqrt_ratio_at_tick(60).unwrap();

        assert_eq!(
            get_amount0_delta(a, b, LIQUIDITY, true).unwrap(),
            U256::from(2_995_354_955_910_781u64)
        );
        assert_eq!(
            get_amount0_delta(b, a, LIQUIDITY, false).unwrap(),
            U256::from(2_995_354_955_910_780u64)
        );
        assert_eq!(
            get_amount1_delta(a, b, LIQUIDITY, true).unwrap(),
            U256::from(3_004_354_062_741_926u64)
        );
        assert_eq!(
            get_amount1_delta(a, b, LIQUIDITY, false).unwrap(),
            U256::from(3_004_354_062_741_925u64)
        );
    }

    #[test]
    fn test_swap_step_exact_in_within_range() {
        let step = compute_swap_step(
            Q96,
            get_sqrt_ratio_at_tick(-60).unwrap(),
            LIQUIDITY,
            U256::from(1_000_000_000_000_000u64),
            fee(),
            true,
        )
        .unwrap();

        assert_eq!(
            step.sqrt_price_next,
            U256::from_dec_str("79149250711305166342700278159").unwrap()
        );
        assert_eq!(step.amount_in, U256::from(997_000_000_000_000u64));
        assert_eq!(step.amount_out, U256::from(996_006_981_039_903u64));
        assert_eq!(step.fee_amount, U256::from(3_000_000_000_000u64));
    }

    #[test]
    fn test_swap_step_exact_in_reaches_target() {
        let target = get_sqrt_ratio_at_tick(-60).unwrap();
        let step = compute_swap_step(
            Q96,
            target,
            LIQUIDITY,
            U256::from(100_000_000_000_000_000u64),
            fee(),
            true,
        )
        .unwrap();

        assert_eq!(step.sqrt_price_next, target);
        assert_eq!(step.amount_in, U256::from(3_004_354_062_741_926u64));
        assert_eq!(step.amount_out, U256::from(2_995_354_955_910_780u64));
        assert_eq!(step.fee_amount, U256::from(9_040_182_736_436u64));
    }

    #[test]
    fn test_swap_step_exact_out() {
        let step = compute_swap_step(
            Q96,
            get_sqrt_ratio_at_tick(60).unwrap(),
            LIQUIDITY,
            U256::from(1_000_000_000_000_000u64),
            fee(),
            false,
        )
        .unwrap();

        assert_eq!(step.amount_out, U256::from(1_000_000_000_000_000u64));
        assert_eq!(step.amount_in, U256::from(1_001_001_001_001_002u64));
        assert_eq!(step.fee_amount, U256::from(3_012_039_120_365u64));
    }

    #[test]
    fn test_zero_liquidity_moves_to_target() {
        let target = get_sqrt_ratio_at_tick(-60).unwrap();
        let step =
            compute_swap_step(Q96, target, 0, U256::from(1000u64), fee(), true).unwrap();
        assert_eq!(step.sqrt_price_next, target);
        assert!(step.amount_out.is_zero());
    }
}
