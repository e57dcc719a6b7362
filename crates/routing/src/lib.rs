//! Path discovery, quoting and route selection.
//!
//! This crate turns a set of candidate pools into a trade:
//! - Pool graph construction and bounded simple-path enumeration
//! - Sequential exact-in and exact-out quoting along a path
//! - Execution-cost models charged against route output
//! - Best single-route and two-way split selection
//! - Cooperative cancellation of long selections

/// Prelude module for convenient imports.
pub mod prelude;

/// Cooperative cancellation.
pub mod cancellation;
/// Routing errors.
pub mod error;
/// Pool graph and path finder.
pub mod graph;
/// Request-scoped quote memo.
pub mod memo;
/// Execution-cost models.
pub mod objective;
/// Path quoting.
pub mod quote_engine;
/// Best-trade selection.
pub mod selector;
