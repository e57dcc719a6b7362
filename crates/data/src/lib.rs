//! Candidate pool acquisition.
//!
//! This crate provides the pool snapshots the router works on:
//! - Candidate requests describing the currencies of interest
//! - Pool sources backed by JSON snapshot files or HTTP endpoints
//! - A provider fanning out to several sources with a bounded timeout
//! - Block-scoped caching of candidate sets

/// Prelude module for convenient imports.
pub mod prelude;

/// Candidate set cache and caching provider.
pub mod cache;
/// Provider errors.
pub mod error;
/// HTTP pool source.
pub mod http_source;
/// Provider and source traits, multi-source provider.
pub mod provider;
/// Candidate requests.
pub mod request;
/// JSON pool snapshot format.
pub mod snapshot;
/// Static pool source.
pub mod static_source;
