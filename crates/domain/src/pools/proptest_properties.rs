//! Property-based tests for pool quoting invariants.
//!
//! 1. **Monotonicity**: more input never yields less output.
//! 2. **Bounded output**: output never reaches the output reserve.
//! 3. **Round trip**: the input quoted for an exact output buys at least that output.
//! 4. **Spot bound**: realized output never exceeds the no-fee marginal output.
//! 5. **Determinism**: identical inputs produce identical quotes.
//! 6. **No free round trip**: selling the output of a swap back into the same
//!    pool never returns more than was sold, for every pool family.

use proptest::prelude::*;

use crate::fees::FeeRate;
use crate::math::full_math::Q96;
use crate::fees::DynamicFee;
use crate::pools::{
    ConcentratedState, ConstantProductState, DynamicState, PoolModel, StableState, SwapContext,
    UnderlyingCurve,
};
use primitive_types::U256;

fn make_cp(r0: u128, r1: u128, fee_pips: u32) -> ConstantProductState {
    ConstantProductState::new(U256::from(r0), U256::from(r1), FeeRate::from_pips(fee_pips))
}

fn make_clmm(liquidity: u128) -> ConcentratedState {
    make_clmm_with_fee(liquidity, 3000)
}

fn make_clmm_with_fee(liquidity: u128, fee_pips: u32) -> ConcentratedState {
    let net = i128::try_from(liquidity).unwrap_or(i128::MAX);
    ConcentratedState::new(Q96, 0, liquidity, FeeRate::from_pips(fee_pips), 60)
        .with_tick(-6000, net)
        .with_tick(6000, -net)
}

fn make_stable(balance: u128, amplification: u64) -> StableState {
    StableState::new(
        U256::from(balance),
        U256::from(balance),
        amplification,
        FeeRate::from_pips(400),
    )
}

/// Sells `amount` in one direction, then sells the proceeds back. `None`
/// when either leg does not quote.
fn round_trip(model: &PoolModel, zero_for_one: bool, amount: U256) -> Option<U256> {
    let there = model
        .quote_exact_in(&SwapContext::new(zero_for_one), amount)
        .ok()?;
    let back = model
        .quote_exact_in(&SwapContext::new(!zero_for_one), there.amount_out)
        .ok()?;
    Some(back.amount_out)
}

#[test]
fn zero_fee_round_trip_loses_only_rounding() {
    let reserve = U256::exp10(30);
    let amount = U256::from(1_000_000u64);
    let pools = [
        PoolModel::ConstantProduct(ConstantProductState::new(reserve, reserve, FeeRate::ZERO)),
        PoolModel::Dynamic(DynamicState::new(
            DynamicFee::default(),
            UnderlyingCurve::ConstantProduct(ConstantProductState::new(
                reserve,
                reserve,
                FeeRate::from_pips(3000),
            )),
        )),
    ];
    for pool in &pools {
        for zero_for_one in [true, false] {
            // One unit of floor rounding per leg.
            assert_eq!(
                round_trip(pool, zero_for_one, amount),
                Some(amount - U256::from(2u64))
            );
        }
    }
}

proptest! {
    #[test]
    fn round_trip_never_gains_on_any_family(
        reserve0 in 1_000_000u128..1_000_000_000_000,
        reserve1 in 1_000_000u128..1_000_000_000_000,
        liquidity in 1_000_000_000_000u128..1_000_000_000_000_000_000_000,
        balance in 1_000_000_000_000_000_000u128..1_000_000_000_000_000_000_000_000,
        amplification in 1u64..5_000,
        fee in 0u32..5_000,
        hook in 0i32..1_000,
        amount in 1u128..1_000_000_000,
        zero_for_one in any::<bool>(),
    ) {
        let pools = [
            PoolModel::ConstantProduct(make_cp(reserve0, reserve1, fee)),
            PoolModel::ConcentratedLiquidity(make_clmm_with_fee(liquidity, fee)),
            PoolModel::StableInvariant(StableState::new(
                U256::from(balance),
                U256::from(balance),
                amplification,
                FeeRate::from_pips(fee),
            )),
            PoolModel::Dynamic(DynamicState::new(
                DynamicFee {
                    base_fee: FeeRate::from_pips(fee),
                    hook_adjustment: Some(hook),
                    ..DynamicFee::default()
                },
                UnderlyingCurve::ConstantProduct(make_cp(reserve0, reserve1, 0)),
            )),
        ];
        let amount = U256::from(amount);
        for pool in &pools {
            if let Some(back) = round_trip(pool, zero_for_one, amount) {
                prop_assert!(back <= amount, "{:?} returned {} for {}", pool.pool_type(), back, amount);
            }
        }
    }

    #[test]
    fn cp_output_is_monotonic(
        r0 in 1_000u128..1_000_000_000_000,
        r1 in 1_000u128..1_000_000_000_000,
        a in 1u128..1_000_000_000,
        b in 1u128..1_000_000_000,
        fee in 0u32..100_000,
        zero_for_one in any::<bool>(),
    ) {
        let pool = make_cp(r0, r1, fee);
        let ctx = SwapContext::new(zero_for_one);
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let small_out = pool.quote_exact_in(&ctx, U256::from(small), pool.fee);
        let large_out = pool.quote_exact_in(&ctx, U256::from(large), pool.fee);
        if let (Ok(small_out), Ok(large_out)) = (small_out, large_out) {
            prop_assert!(small_out.amount_out <= large_out.amount_out);
        }
    }

    #[test]
    fn cp_output_below_reserve(
        r0 in 1u128..1_000_000_000_000,
        r1 in 1u128..1_000_000_000_000,
        amount in 1u128..u64::MAX as u128,
    ) {
        let pool = make_cp(r0, r1, 3000);
        if let Ok(quote) = pool.quote_exact_in(&SwapContext::new(true), U256::from(amount), pool.fee) {
            prop_assert!(quote.amount_out < pool.reserve1);
        }
    }

    #[test]
    fn cp_exact_out_round_trip(
        r0 in 1_000_000u128..1_000_000_000_000,
        r1 in 1_000_000u128..1_000_000_000_000,
        wanted in 1u128..1_000_000,
        fee in 0u32..10_000,
    ) {
        let pool = make_cp(r0, r1, fee);
        let ctx = SwapContext::new(false);
        let quote = pool.quote_exact_out(&ctx, U256::from(wanted), pool.fee);
        prop_assert!(quote.is_ok());
        if let Ok(quote) = quote {
            let check = pool.quote_exact_in(&ctx, quote.amount_in, pool.fee);
            prop_assert!(check.is_ok());
            if let Ok(check) = check {
                prop_assert!(check.amount_out >= U256::from(wanted));
            }
        }
    }

    #[test]
    fn realized_output_below_spot(
        r0 in 1_000_000u128..1_000_000_000_000,
        r1 in 1_000_000u128..1_000_000_000_000,
        amount in 1u128..1_000_000_000,
    ) {
        let pool = make_cp(r0, r1, 3000);
        let ctx = SwapContext::new(true);
        let realized = pool.quote_exact_in(&ctx, U256::from(amount), pool.fee);
        let spot = pool.spot_output(&ctx, U256::from(amount));
        if let (Ok(realized), Ok(spot)) = (realized, spot) {
            prop_assert!(realized.amount_out <= spot);
        }
    }

    #[test]
    fn clmm_quote_is_deterministic_and_monotonic(
        liquidity in 1_000_000_000_000u128..1_000_000_000_000_000_000_000,
        a in 1u128..1_000_000_000_000,
        b in 1u128..1_000_000_000_000,
        zero_for_one in any::<bool>(),
    ) {
        let pool = make_clmm(liquidity);
        let ctx = SwapContext::new(zero_for_one);
        let (small, large) = if a <= b { (a, b) } else { (b, a) };

        let first = pool.quote_exact_in(&ctx, U256::from(small), pool.fee);
        let second = pool.quote_exact_in(&ctx, U256::from(small), pool.fee);
        prop_assert_eq!(&first, &second);

        let large_out = pool.quote_exact_in(&ctx, U256::from(large), pool.fee);
        if let (Ok(small_out), Ok(large_out)) = (first, large_out) {
            prop_assert!(small_out.amount_out <= large_out.amount_out);
        }
    }

    #[test]
    fn stable_output_below_spot(
        balance in 1_000_000_000_000_000_000u128..1_000_000_000_000_000_000_000_000,
        amount in 1_000u128..1_000_000_000_000_000_000,
        amplification in 1u64..5_000,
    ) {
        let pool = make_stable(balance, amplification);
        let ctx = SwapContext::new(true);
        let realized = pool.quote_exact_in(&ctx, U256::from(amount), pool.fee);
        let spot = pool.spot_output(&ctx, U256::from(amount));
        if let (Ok(realized), Ok(spot)) = (realized, spot) {
            prop_assert!(realized.amount_out <= spot);
        }
    }
}
