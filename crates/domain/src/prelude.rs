//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use sor_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{Currency, CurrencyKind, Path, Pool, PoolId, ProtocolMix};

// Enums
pub use crate::enums::{PoolType, Protocol, SwapMode};

// Errors
pub use crate::error::{PathError, PoolStateError, QuoteError, TradeError};

// Fees
pub use crate::fees::{DynamicFee, FEE_DENOMINATOR, FeeRate, PackedProtocolFee};

// Pool models
pub use crate::pools::{
    ConcentratedState, ConstantProductState, DynamicState, PoolModel, StableState, SwapContext,
    UnderlyingCurve,
};

// Value objects
pub use crate::value_objects::{
    Amount, BlockReference, CandidateSet, ExcludedPool, HopQuote, Percentage, Price, Quote, Route,
    Trade, TradeOutcome,
};

pub use primitive_types::U256;
