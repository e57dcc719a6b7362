use crate::error::QuoteError;
use primitive_types::U256;

/// Lowest tick whose sqrt price is representable.
pub const MIN_TICK: i32 = -887_272;
/// Highest tick whose sqrt price is representable.
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_ratio_at_tick(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);

/// `get_sqrt_ratio_at_tick(MAX_TICK)` = 1461446703485210103287273052203988822378723970342.
pub const MAX_SQRT_RATIO: U256 = U256([
    0x5d95_1d52_6398_8d26,
    0xefd1_fc6a_5064_8849,
    0xfffd_8963,
    0,
]);

/// `2^128 / sqrt(1.0001)^(2^i)` in Q128, one per bit of the absolute tick.
const TICK_RATIOS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Returns `sqrt(1.0001^tick) * 2^96`, rounded up.
///
/// Bit-exact with the on-chain tick math, so tick boundaries computed here
/// match the ones a concentrated liquidity pool crosses.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, QuoteError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK.unsigned_abs() {
        return Err(QuoteError::NumericOverflow("tick out of range"));
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(TICK_RATIOS[0])
    } else {
        U256::one() << 128
    };
    for (bit, factor) in TICK_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1 << bit) != 0 {
            // ratio <= 2^128 and factor < 2^128, so the shifted product fits.
            let product = ratio.full_mul(U256::from(*factor)) >> 128;
            ratio = U256::try_from(product)
                .map_err(|_| QuoteError::NumericOverflow("tick ratio"))?;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let remainder = ratio & U256::from(u32::MAX);
    let sqrt_price = (ratio >> 32) + if remainder.is_zero() { U256::zero() } else { U256::one() };
    Ok(sqrt_price)
}

/// Greatest tick whose sqrt ratio is at or below `sqrt_price_x96`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, QuoteError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(QuoteError::NumericOverflow("sqrt price out of range"));
    }

    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    while low < high {
        // Upper mid so the loop always makes progress.
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::full_math::Q96;

    #[test]
    fn test_tick_zero_is_one() {
        assert_eq!(get_sqrt_ratio_at_tick(0).unwrap(), Q96);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(get_sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(get_sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(
            MAX_SQRT_RATIO,
            U256::from_dec_str("1461446703485210103287273052203988822378723970342").unwrap()
        );
        assert!(get_sqrt_ratio_at_tick(MAX_TICK + 1).is_err());
        assert!(get_sqrt_ratio_at_tick(MIN_TICK - 1).is_err());
    }

    #[test]
    fn test_known_values() {
        assert_eq!(
            get_sqrt_ratio_at_tick(1).unwrap(),
            U256::from(79_232_123_823_359_799_118_286_999_568u128)
        );
        assert_eq!(
            get_sqrt_ratio_at_tick(-1).unwrap(),
            U256::from(79_224_201_403_219_477_170_569_942_574u128)
        );
        assert_eq!(
            get_sqrt_ratio_at_tick(100).unwrap(),
            U256::from(79_625_275_426_524_748_796_330_556_128u128)
        );
    }

    #[test]
    fn test_monotonic() {
        let mut previous = get_sqrt_ratio_at_tick(-5000).unwrap();
        for tick in (-4990..=5000).step_by(10) {
            let current = get_sqrt_ratio_at_tick(tick).unwrap();
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn test_tick_at_sqrt_ratio_inverts() {
        for tick in [MIN_TICK, -60_000, -1, 0, 1, 60, 123_456, MAX_TICK - 1] {
            let sqrt_price = get_sqrt_ratio_at_tick(tick).unwrap();
            assert_eq!(get_tick_at_sqrt_ratio(sqrt_price).unwrap(), tick);
            if tick < MAX_TICK - 1 {
                // Anything strictly between two ticks maps to the lower one.
                assert_eq!(get_tick_at_sqrt_ratio(sqrt_price + 1).unwrap(), tick);
            }
        }
        assert!(get_tick_at_sqrt_ratio(MAX_SQRT_RATIO).is_err());
    }
}
