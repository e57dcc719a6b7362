//! Two-coin StableSwap (Curve style) invariant math.
//!
//! # Invariant (n = 2)
//!
//! ```text
//! Ann · (x + y) + D = Ann · D + D³ / (4 · x · y),   Ann = A · n
//! ```
//!
//! Balances passed to these functions must already be normalized to
//! [`PRECISION_DECIMALS`]; see [`normalization_factor`].

use crate::error::QuoteError;
use crate::fees::{FEE_DENOMINATOR, FeeRate};
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use primitive_types::{U256, U512};

/// Number of coins in a pool.
const N_COINS: u64 = 2;

/// Newton iteration bound for both `D` and `y`.
pub const MAX_ITERATIONS: usize = 255;

/// Balances are scaled to this many decimals before solving.
pub const PRECISION_DECIMALS: u8 = 18;

/// `10^(18 - decimals)`, the multiplier that brings a raw amount to the
/// common precision.
pub fn normalization_factor(decimals: u8) -> Result<U256, QuoteError> {
    let exponent = PRECISION_DECIMALS
        .checked_sub(decimals)
        .ok_or(QuoteError::NumericOverflow("currency has more than 18 decimals"))?;
    Ok(U256::exp10(usize::from(exponent)))
}

fn converged(current: U256, previous: U256) -> bool {
    let diff = if current > previous { current - previous } else { previous - current };
    diff <= U256::one()
}

fn times_n(value: U256) -> Result<U256, QuoteError> {
    value
        .checked_mul(U256::from(N_COINS))
        .ok_or(QuoteError::NumericOverflow("balance times coin count"))
}

fn ann(amplification: u64) -> Result<U256, QuoteError> {
    if amplification == 0 {
        return Err(QuoteError::NumericOverflow("amplification must be positive"));
    }
    Ok(U256::from(amplification) * U256::from(N_COINS))
}

/// Solves the invariant `D` for balances `x` and `y`.
///
/// D_next = (Ann·S + n·D_P)·D / ((Ann − 1)·D + (n + 1)·D_P),  D_P = D³ / (4xy)
pub fn get_d(x: U256, y: U256, amplification: u64) -> Result<U256, QuoteError> {
    let n = U256::from(N_COINS);
    let sum = x
        .checked_add(y)
        .ok_or(QuoteError::NumericOverflow("D: balance sum"))?;
    if sum.is_zero() {
        return Ok(U256::zero());
    }
    if x.is_zero() || y.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }
    let ann = ann(amplification)?;
    let ann_sum = ann
        .checked_mul(sum)
        .ok_or(QuoteError::NumericOverflow("D: Ann·S"))?;

    let mut d = sum;
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = mul_div(d, d, times_n(x)?)?;
        d_p = mul_div(d_p, d, times_n(y)?)?;

        let previous = d;
        let numerator = ann_sum
            .checked_add(times_n(d_p)?)
            .ok_or(QuoteError::NumericOverflow("D: numerator"))?;
        let denominator = (ann - U256::one())
            .checked_mul(d)
            .zip(d_p.checked_mul(n + U256::one()))
            .and_then(|(left, right)| left.checked_add(right))
            .ok_or(QuoteError::NumericOverflow("D: denominator"))?;
        d = mul_div(numerator, d, denominator)?;

        if converged(d, previous) {
            return Ok(d);
        }
    }
    Err(QuoteError::NumericOverflow("D did not converge"))
}

/// Solves the balance of the other coin given one balance `x_new` and `D`.
///
/// y_next = (y² + c) / (2y + b − D),  c = D³ / (4·Ann·x_new),  b = x_new + D / Ann
pub fn get_y(x_new: U256, d: U256, amplification: u64) -> Result<U256, QuoteError> {
    if x_new.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }
    let ann = ann(amplification)?;

    let mut c = mul_div(d, d, times_n(x_new)?)?;
    c = mul_div(c, d, times_n(ann)?)?;
    let b = x_new
        .checked_add(d / ann)
        .ok_or(QuoteError::NumericOverflow("y: b"))?;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let previous = y;
        let numerator = y
            .checked_mul(y)
            .and_then(|square| square.checked_add(c))
            .ok_or(QuoteError::NumericOverflow("y: numerator"))?;
        let denominator = times_n(y)?
            .checked_add(b)
            .and_then(|sum| sum.checked_sub(d))
            .filter(|value| !value.is_zero())
            .ok_or(QuoteError::NumericOverflow("y: denominator"))?;
        y = numerator / denominator;

        if converged(y, previous) {
            return Ok(y);
        }
    }
    Err(QuoteError::NumericOverflow("y did not converge"))
}

/// Output for `amount_in`, all values normalized. The fee is charged on
/// the output side.
pub fn get_amount_out(
    amount_in: U256,
    balance_in: U256,
    balance_out: U256,
    amplification: u64,
    fee: FeeRate,
) -> Result<U256, QuoteError> {
    if amount_in.is_zero() {
        return Ok(U256::zero());
    }
    let d = get_d(balance_in, balance_out, amplification)?;
    let x_new = balance_in
        .checked_add(amount_in)
        .ok_or(QuoteError::NumericOverflow("new input balance"))?;
    let y_new = get_y(x_new, d, amplification)?;

    // One unit is withheld against rounding in the solver.
    let gross = balance_out
        .checked_sub(y_new)
        .and_then(|dy| dy.checked_sub(U256::one()))
        .ok_or(QuoteError::InsufficientLiquidity)?;
    let fee_amount = mul_div(gross, U256::from(fee.pips()), U256::from(FEE_DENOMINATOR))?;
    Ok(gross - fee_amount)
}

/// Input needed to receive `amount_out`, all values normalized.
pub fn get_amount_in(
    amount_out: U256,
    balance_in: U256,
    balance_out: U256,
    amplification: u64,
    fee: FeeRate,
) -> Result<U256, QuoteError> {
    if amount_out.is_zero() {
        return Ok(U256::zero());
    }
    let complement = fee.complement();
    if complement == 0 {
        return Err(QuoteError::InvalidFee("fee consumes the whole output"));
    }
    let d = get_d(balance_in, balance_out, amplification)?;
    let gross = mul_div_rounding_up(
        amount_out,
        U256::from(FEE_DENOMINATOR),
        U256::from(complement),
    )?;
    let y_new = balance_out
        .checked_sub(gross)
        .and_then(|remaining| remaining.checked_sub(U256::one()))
        .filter(|remaining| !remaining.is_zero())
        .ok_or(QuoteError::InsufficientLiquidity)?;
    let x_new = get_y(y_new, d, amplification)?;

    x_new
        .checked_sub(balance_in)
        .and_then(|dx| dx.checked_add(U256::one()))
        .ok_or(QuoteError::NumericOverflow("input below current balance"))
}

/// Output at the marginal price of the invariant, with no fee.
///
/// dy/dx = (4·Ann·x²y² + D³·y) / (4·Ann·x²y² + D³·x), evaluated in 512 bits.
pub fn spot_output(
    amount_in: U256,
    balance_in: U256,
    balance_out: U256,
    amplification: u64,
) -> Result<U256, QuoteError> {
    let d = get_d(balance_in, balance_out, amplification)?;
    let ann = U512::from(ann(amplification)?);
    let x = U512::from(balance_in);
    let y = U512::from(balance_out);
    let d = U512::from(d);

    let overflow = QuoteError::NumericOverflow("stable spot price");
    let xy = x * y;
    let leverage = xy
        .checked_mul(xy)
        .and_then(|squared| squared.checked_mul(ann * U512::from(4u64)))
        .ok_or(overflow.clone())?;
    let d_cubed = d
        .checked_mul(d)
        .and_then(|squared| squared.checked_mul(d))
        .ok_or(overflow.clone())?;
    let numerator = leverage
        .checked_add(d_cubed.checked_mul(y).ok_or(overflow.clone())?)
        .ok_or(overflow.clone())?;
    let denominator = leverage
        .checked_add(d_cubed.checked_mul(x).ok_or(overflow.clone())?)
        .ok_or(overflow.clone())?;

    // Keep 256 significant bits of the ratio so the product with amount_in fits.
    let shift = numerator.bits().max(denominator.bits()).saturating_sub(256);
    let numerator = numerator >> shift;
    let denominator = denominator >> shift;
    if denominator.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }

    let scaled = U512::from(amount_in)
        .checked_mul(numerator)
        .ok_or(overflow.clone())?
        / denominator;
    U256::try_from(scaled).map_err(|_| overflow)
}
