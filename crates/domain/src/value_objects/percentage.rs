use crate::math::full_math::mul_div;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale of the integer ratio used when converting shortfalls to decimals.
const RATIO_SCALE: u32 = 12;

/// A fraction, `0.01` meaning one percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest ratio [`Percentage::ratio`] represents, about 9.2 million.
    pub const MAX_RATIO: Self = Self(Decimal::from_parts(
        u32::MAX,
        i32::MAX as u32,
        0,
        false,
        RATIO_SCALE,
    ));

    pub fn from_bps(bps: u32) -> Self {
        Self(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn to_bps(&self) -> u32 {
        (self.0 * Decimal::from(10000)).to_u32().unwrap_or(0)
    }

    /// `part / whole` with twelve decimal places, computed on integers so
    /// amounts beyond `Decimal`'s range still produce a ratio.
    ///
    /// Ratios above [`Percentage::MAX_RATIO`] saturate to it.
    pub fn ratio(part: U256, whole: U256) -> Self {
        if whole.is_zero() {
            return Self::ZERO;
        }
        let scale = U256::exp10(RATIO_SCALE as usize);
        let ceiling = U256::from(i64::MAX as u64);
        let scaled = mul_div(part, scale, whole).unwrap_or(ceiling);
        if scaled >= ceiling {
            return Self::MAX_RATIO;
        }
        Self(Decimal::new(scaled.low_u64() as i64, RATIO_SCALE))
    }

    /// `1 - realized / naive`, clamped at zero.
    pub fn shortfall(realized: U256, naive: U256) -> Self {
        if realized >= naive {
            return Self::ZERO;
        }
        Self::ratio(naive - realized, naive)
    }

    /// Average of `values`, weighted by the paired amounts.
    pub fn weighted_average(values: &[(Percentage, U256)]) -> Self {
        let total: U256 = values
            .iter()
            .fold(U256::zero(), |acc, (_, weight)| acc.saturating_add(*weight));
        if total.is_zero() {
            return Self::ZERO;
        }
        let mut sum = Decimal::ZERO;
        for (value, weight) in values {
            sum += value.0 * Self::ratio(*weight, total).0;
        }
        Self(sum.round_dp(RATIO_SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::from(100)).round_dp(4))
    }
}
