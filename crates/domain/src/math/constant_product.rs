use crate::error::QuoteError;
use crate::fees::{FEE_DENOMINATOR, FeeRate};
use crate::math::full_math::mul_div;
use primitive_types::U256;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx)
/// taking fee into account: dy = y * (dx * (1 - fee)) / (x + (dx * (1 - fee)))
///
/// With the fee in pips the division happens once, at the end, so the result
/// is `floor(dx·(D−f)·y / (x·D + dx·(D−f)))`.
pub fn get_amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }
    if amount_in.is_zero() {
        return Ok(U256::zero());
    }

    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(fee.complement()))
        .ok_or(QuoteError::NumericOverflow("amount_in with fee"))?;
    let denominator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .ok_or(QuoteError::NumericOverflow("reserve_in scaled"))?
        .checked_add(amount_in_with_fee)
        .ok_or(QuoteError::NumericOverflow("denominator"))?;

    let amount_out = mul_div(amount_in_with_fee, reserve_out, denominator)?;
    if amount_out >= reserve_out {
        return Err(QuoteError::InsufficientLiquidity);
    }
    Ok(amount_out)
}

/// Calculates the input required to receive exactly `amount_out`.
///
/// formula: dx = x * dy * D / ((y - dy) * (D - f)) + 1
pub fn get_amount_in(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: FeeRate,
) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(QuoteError::InsufficientLiquidity);
    }
    if amount_out.is_zero() {
        return Ok(U256::zero());
    }

    let numerator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .ok_or(QuoteError::NumericOverflow("reserve_in scaled"))?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(U256::from(fee.complement()))
        .ok_or(QuoteError::NumericOverflow("remaining reserve scaled"))?;

    mul_div(numerator, amount_out, denominator)?
        .checked_add(U256::one())
        .ok_or(QuoteError::NumericOverflow("amount_in"))
}

/// Output at the marginal price, with no fee and no slippage.
///
/// Price = reserve_out / reserve_in
pub fn spot_output(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }
    mul_div(amount_in, reserve_out, reserve_in)
}

/// Calculates the constant product K
pub fn calculate_k(reserve0: U256, reserve1: U256) -> U256 {
    reserve0.saturating_mul(reserve1)
}
