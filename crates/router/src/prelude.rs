//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use sor_router::prelude::*;
//! ```

// Configuration
pub use crate::config::{ConfigError, RouterConfig};

// Errors
pub use crate::error::RouterError;

// Facade
pub use crate::facade::SmartRouter;

// Options
pub use crate::options::TradeOptions;

// Supersession
pub use crate::supersession::{PairKey, RequestTicket, SupersessionRegistry};
