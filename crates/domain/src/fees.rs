//! Fee representations.
//!
//! Fees are integer pips (hundredths of a basis point) over
//! [`FEE_DENOMINATOR`]. A 0.30% fee is `FeeRate::from_pips(3000)`.

use crate::error::{PoolStateError, QuoteError};
use serde::{Deserialize, Serialize};

/// Denominator of every fee expressed in pips.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Number of sub-parts packed in a [`PackedProtocolFee`].
pub const PROTOCOL_FEE_PARTS: usize = 2;

/// Bit width of one packed protocol fee component.
const PROTOCOL_FEE_BITS: u32 = 12;

/// Largest protocol fee component, in pips (0.1%).
pub const MAX_PROTOCOL_FEE: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(u32);

impl FeeRate {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_pips(pips: u32) -> Self {
        Self(pips)
    }

    /// Builds a fee from basis points (1 bp = 100 pips).
    #[must_use]
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps.saturating_mul(100))
    }

    #[must_use]
    pub const fn pips(self) -> u32 {
        self.0
    }

    /// `FEE_DENOMINATOR - fee`, the share of the input that reaches the curve.
    #[must_use]
    pub const fn complement(self) -> u32 {
        FEE_DENOMINATOR.saturating_sub(self.0)
    }

    /// Checks the fee lies in `[0, FEE_DENOMINATOR)`.
    pub fn validate(self) -> Result<(), PoolStateError> {
        if self.0 >= FEE_DENOMINATOR {
            return Err(PoolStateError::InvalidFee("fee must be below the fee denominator"));
        }
        Ok(())
    }
}

/// Protocol fee packed into a single integer, one 12-bit component per
/// swap direction.
///
/// Bits `0..12` hold the fee charged on currency0 → currency1 swaps and bits
/// `12..24` the fee for currency1 → currency0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedProtocolFee(u32);

impl PackedProtocolFee {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Packs two components, `[zero_for_one, one_for_zero]`.
    pub fn from_parts(parts: [u32; PROTOCOL_FEE_PARTS]) -> Result<Self, PoolStateError> {
        let mut raw = 0u32;
        for (index, part) in parts.iter().enumerate() {
            if *part > MAX_PROTOCOL_FEE {
                return Err(PoolStateError::InvalidFee("protocol fee component above maximum"));
            }
            raw |= part << (PROTOCOL_FEE_BITS * index as u32);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Splits the packed value into its unsigned components.
    #[must_use]
    pub fn decompose(self) -> [u32; PROTOCOL_FEE_PARTS] {
        let mask = (1u32 << PROTOCOL_FEE_BITS) - 1;
        let mut parts = [0u32; PROTOCOL_FEE_PARTS];
        for (index, part) in parts.iter_mut().enumerate() {
            *part = (self.0 >> (PROTOCOL_FEE_BITS * index as u32)) & mask;
        }
        parts
    }

    /// Component applied to a swap in the given direction.
    #[must_use]
    pub fn for_direction(self, zero_for_one: bool) -> u32 {
        let [zero_for_one_fee, one_for_zero_fee] = self.decompose();
        if zero_for_one {
            zero_for_one_fee
        } else {
            one_for_zero_fee
        }
    }

    pub fn validate(self) -> Result<(), PoolStateError> {
        let used_bits = PROTOCOL_FEE_BITS * PROTOCOL_FEE_PARTS as u32;
        if self.0 >> used_bits != 0 {
            return Err(PoolStateError::InvalidFee("protocol fee has bits outside its components"));
        }
        if self.decompose().iter().any(|part| *part > MAX_PROTOCOL_FEE) {
            return Err(PoolStateError::InvalidFee("protocol fee component above maximum"));
        }
        Ok(())
    }
}

/// Fee schedule of a dynamic (hook-enabled) pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicFee {
    /// LP fee charged by the pool itself.
    pub base_fee: FeeRate,
    /// Protocol-level fee, per direction.
    #[serde(default)]
    pub protocol_fee: PackedProtocolFee,
    /// Signed adjustment reported by an external hook, in pips.
    #[serde(default)]
    pub hook_adjustment: Option<i32>,
}

impl DynamicFee {
    /// Total fee charged for a swap in the given direction.
    ///
    /// # Errors
    /// Returns [`QuoteError::InvalidFee`] when the sum leaves
    /// `[0, FEE_DENOMINATOR)`.
    pub fn effective(&self, zero_for_one: bool) -> Result<FeeRate, QuoteError> {
        let total = i64::from(self.base_fee.pips())
            + i64::from(self.protocol_fee.for_direction(zero_for_one))
            + i64::from(self.hook_adjustment.unwrap_or(0));
        if total < 0 {
            return Err(QuoteError::InvalidFee("composed fee is negative"));
        }
        if total >= i64::from(FEE_DENOMINATOR) {
            return Err(QuoteError::InvalidFee("composed fee reaches the fee denominator"));
        }
        u32::try_from(total)
            .map(FeeRate::from_pips)
            .map_err(|_| QuoteError::InvalidFee("composed fee out of range"))
    }

    pub fn validate(&self) -> Result<(), PoolStateError> {
        self.base_fee.validate()?;
        self.protocol_fee.validate()?;
        for zero_for_one in [true, false] {
            self.effective(zero_for_one)
                .map_err(|_| PoolStateError::InvalidFee("composed dynamic fee out of range"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rate_from_bps() {
        assert_eq!(FeeRate::from_bps(30).pips(), 3000);
        assert_eq!(FeeRate::from_bps(30).complement(), 997_000);
        assert!(FeeRate::from_pips(FEE_DENOMINATOR).validate().is_err());
    }

    #[test]
    fn test_packed_protocol_fee_decompose() {
        let packed = PackedProtocolFee::from_parts([250, 1000]).unwrap();
        assert_eq!(packed.raw(), 250 | (1000 << 12));
        assert_eq!(packed.decompose(), [250, 1000]);
        assert_eq!(packed.for_direction(true), 250);
        assert_eq!(packed.for_direction(false), 1000);
    }

    #[test]
    fn test_packed_protocol_fee_rejects_large_component() {
        assert!(PackedProtocolFee::from_parts([1001, 0]).is_err());
        assert!(PackedProtocolFee::from_raw(4000).validate().is_err());
        assert!(PackedProtocolFee::from_raw(1 << 24).validate().is_err());
    }

    #[test]
    fn test_dynamic_fee_composition() {
        let fee = DynamicFee {
            base_fee: FeeRate::from_pips(3000),
            protocol_fee: PackedProtocolFee::from_parts([500, 100]).unwrap(),
            hook_adjustment: Some(-1000),
        };
        assert_eq!(fee.effective(true).unwrap(), FeeRate::from_pips(2500));
        assert_eq!(fee.effective(false).unwrap(), FeeRate::from_pips(2100));
        assert!(fee.validate().is_ok());
    }

    #[test]
    fn test_dynamic_fee_out_of_range() {
        let negative = DynamicFee {
            base_fee: FeeRate::from_pips(100),
            protocol_fee: PackedProtocolFee::ZERO,
            hook_adjustment: Some(-200),
        };
        assert!(matches!(negative.effective(true), Err(QuoteError::InvalidFee(_))));
        assert!(negative.validate().is_err());

        let saturated = DynamicFee {
            base_fee: FeeRate::from_pips(999_500),
            protocol_fee: PackedProtocolFee::from_parts([500, 0]).unwrap(),
            hook_adjustment: None,
        };
        assert!(saturated.effective(true).is_err());
        assert!(saturated.effective(false).is_ok());
    }
}
