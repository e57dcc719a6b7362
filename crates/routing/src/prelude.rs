//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use sor_routing::prelude::*;
//! ```

// Cancellation
pub use crate::cancellation::CancellationToken;

// Errors
pub use crate::error::RoutingError;

// Graph
pub use crate::graph::{PathFinder, PathFinderConfig, PoolGraph};

// Memo
pub use crate::memo::QuoteMemo;

// Cost models
pub use crate::objective::{CostModel, FixedHopCost, GasCostModel};

// Quoting
pub use crate::quote_engine::{quote_exact_in, quote_exact_out};

// Selection
pub use crate::selector::{BestTradeSelector, MAX_SUPPORTED_SPLITS, SelectorConfig};
