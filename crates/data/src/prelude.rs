//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use sor_data::prelude::*;
//! ```

// Cache
pub use crate::cache::{CacheKey, CachingProvider, CandidateCache};

// Errors
pub use crate::error::ProviderError;

// Providers and sources
pub use crate::http_source::HttpPoolSource;
pub use crate::provider::{
    CandidatePoolProvider, DEFAULT_FETCH_TIMEOUT, MultiSourceProvider, PoolSource,
};
pub use crate::static_source::StaticPoolSource;

// Requests and snapshots
pub use crate::request::CandidateRequest;
pub use crate::snapshot::PoolSnapshot;
