//! Domain model for the smart order router.
//!
//! This crate holds the value types every other crate in the workspace
//! exchanges: currencies, pool snapshots, paths, quotes and trades, together
//! with the integer curve math used to quote each pool family.
//!
//! Pools are a closed set of variants (see [`pools::PoolModel`]); quoting
//! dispatches through an exhaustive `match`, so adding a pool family is a
//! compile-time change.

/// Entities with identity: currencies, pools and paths.
pub mod entities;
/// Pool classification enums.
pub mod enums;
/// Error types.
pub mod error;
/// Fee representations and composition.
pub mod fees;
/// Integer curve math.
pub mod math;
/// Per-family pool state and quoting.
pub mod pools;
/// Serde helpers for `U256` amounts.
pub mod serde_u256;
/// Serde helpers for 128-bit liquidity values.
pub mod serde_wide;
/// Immutable value objects.
pub mod value_objects;

/// Prelude module for convenient imports.
pub mod prelude;
