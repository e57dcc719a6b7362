//! 512-bit intermediate multiply/divide helpers.

use crate::error::QuoteError;
use primitive_types::{U256, U512};

/// 2^96, the fixed-point scale of `sqrtPriceX96`.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// `floor(a * b / denominator)` without intermediate overflow.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, QuoteError> {
    if denominator.is_zero() {
        return Err(QuoteError::NumericOverflow("mul_div by zero"));
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| QuoteError::NumericOverflow("mul_div result exceeds 256 bits"))
}

/// `ceil(a * b / denominator)` without intermediate overflow.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, QuoteError> {
    let result = mul_div(a, b, denominator)?;
    if (a.full_mul(b) % U512::from(denominator)).is_zero() {
        Ok(result)
    } else {
        result
            .checked_add(U256::one())
            .ok_or(QuoteError::NumericOverflow("mul_div rounding overflow"))
    }
}

/// `ceil(a / denominator)`.
pub fn div_rounding_up(a: U256, denominator: U256) -> Result<U256, QuoteError> {
    if denominator.is_zero() {
        return Err(QuoteError::NumericOverflow("division by zero"));
    }
    let quotient = a / denominator;
    if (a % denominator).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q96_value() {
        assert_eq!(Q96, U256::one() << 96);
    }

    #[test]
    fn test_mul_div_exceeds_intermediate_width() {
        // (2^200 * 2^100) / 2^150 = 2^150 overflows 256 bits in the product only.
        let a = U256::one() << 200;
        let b = U256::one() << 100;
        let d = U256::one() << 150;
        assert_eq!(mul_div(a, b, d).unwrap(), U256::one() << 150);
    }

    #[test]
    fn test_rounding() {
        let seven = U256::from(7u64);
        let two = U256::from(2u64);
        assert_eq!(mul_div(seven, U256::one(), two).unwrap(), U256::from(3u64));
        assert_eq!(mul_div_rounding_up(seven, U256::one(), two).unwrap(), U256::from(4u64));
        assert_eq!(div_rounding_up(seven, two).unwrap(), U256::from(4u64));
        assert_eq!(div_rounding_up(U256::from(8u64), two).unwrap(), U256::from(4u64));
    }

    #[test]
    fn test_errors() {
        assert!(mul_div(U256::one(), U256::one(), U256::zero()).is_err());
        assert!(mul_div(U256::MAX, U256::MAX, U256::one()).is_err());
    }
}
