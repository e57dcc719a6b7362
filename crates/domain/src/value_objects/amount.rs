use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use primitive_types::U256;
use std::fmt;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Largest scale a `Decimal` supports.
const DECIMAL_MAX_SCALE: u8 = 28;

/// A raw on-chain amount together with its currency precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    #[serde(with = "crate::serde_u256")]
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Converts a human-readable amount to raw units, truncating extra
    /// fractional digits. Returns `None` for negative values.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Option<Self> {
        if d.is_sign_negative() {
            return None;
        }
        let truncated = d.trunc_with_scale(u32::from(decimals.min(DECIMAL_MAX_SCALE)));
        let mantissa = truncated.mantissa().to_u128()?;
        let scale = u8::try_from(truncated.scale()).ok()?;
        // mantissa * 10^(decimals - scale)
        let raw = U256::from(mantissa).checked_mul(U256::exp10(usize::from(decimals - scale)))?;
        Some(Self { raw, decimals })
    }

    /// Human-readable value.
    ///
    /// Digits below `Decimal`'s 96-bit mantissa are dropped for very large
    /// amounts; `None` only when the integer part itself does not fit.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let mut raw = self.raw;
        let mut scale = self.decimals;
        while raw > U256::from(DECIMAL_MAX_MANTISSA) || scale > DECIMAL_MAX_SCALE {
            if scale == 0 {
                return None;
            }
            raw /= U256::from(10u64);
            scale -= 1;
        }
        let mantissa = i128::try_from(raw.as_u128()).ok()?;
        Decimal::try_from_i128_with_scale(mantissa, u32::from(scale))
            .ok()
            .map(|d| d.normalize())
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Some(d) => write!(f, "{d}"),
            None => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_eighteen_decimals() {
        let amount = Amount::from_decimal(dec!(1.5), 18).unwrap();
        assert_eq!(amount.raw, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(amount.to_decimal().unwrap(), dec!(1.5));
    }

    #[test]
    fn test_truncates_extra_digits() {
        let amount = Amount::from_decimal(dec!(1.1234567), 6).unwrap();
        assert_eq!(amount.raw, U256::from(1_123_456u64));
    }

    #[test]
    fn test_large_amounts_lose_only_low_digits() {
        // 10^12 tokens at 18 decimals exceeds a 96-bit mantissa.
        let amount = Amount::new(U256::exp10(30) + U256::one(), 18);
        assert_eq!(amount.to_decimal().unwrap(), dec!(1000000000000));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(Amount::from_decimal(dec!(-1), 18).is_none());
    }
}
