//! Error types for the domain crate.
//!
//! Quoting errors are local to one hop: the routing layer absorbs them into
//! an invalid quote and never escalates them to the caller.

use thiserror::Error;

/// Failure while simulating a swap through a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Reserves are empty or the trade would drain the pool.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    /// A caller supplied price bound was reached before the amount was filled.
    #[error("price limit reached")]
    PriceLimitReached,
    /// Arithmetic overflowed or an iterative solver failed to converge.
    #[error("numeric overflow: {0}")]
    NumericOverflow(&'static str),
    /// The composed fee falls outside `[0, FEE_DENOMINATOR)`.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),
    /// The currency is not one of the pool's two currencies.
    #[error("currency is not part of the pool")]
    UnknownCurrency,
}

/// Malformed pool snapshot detected before routing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolStateError {
    #[error("pool currencies must be distinct")]
    IdenticalCurrencies,
    #[error("pool currencies must live on the same chain")]
    ChainMismatch,
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),
    #[error("invalid concentrated liquidity state: {0}")]
    InvalidConcentratedState(&'static str),
    #[error("invalid stable state: {0}")]
    InvalidStableState(&'static str),
}

/// Invalid path construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path must contain at least one pool")]
    Empty,
    #[error("pool {0} appears more than once")]
    DuplicatePool(String),
    #[error("pool {0} does not connect to the previous hop")]
    Disconnected(String),
    #[error("currency {0} is visited more than once")]
    RevisitedCurrency(String),
    #[error("path does not end at the requested output currency")]
    WrongOutput,
}

/// Invalid trade construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    #[error("trade must contain at least one route")]
    NoRoutes,
    #[error("route inputs sum to {actual} but the trade input is {expected}")]
    SharesMismatch { expected: String, actual: String },
    #[error("routes disagree on input or output currency")]
    CurrencyMismatch,
    #[error("arithmetic overflow while aggregating routes")]
    Overflow,
}
