//! Integer curve math for every supported pool family.
//!
//! All functions operate on raw `U256` amounts in native currency precision
//! and return [`QuoteError`](crate::error::QuoteError) on failure. No
//! floating point is involved anywhere on the quoting path.

pub mod concentrated_liquidity;
pub mod constant_product;
pub mod full_math;
pub mod stable_swap;
pub mod tick_math;
