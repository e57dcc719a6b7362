//! Smart order router facade.
//!
//! This crate ties candidate acquisition and route selection together:
//! - Router configuration from defaults, environment or JSON files
//! - Per-request trade options
//! - Supersession of in-flight requests for the same currency pair
//! - The `SmartRouter` entry point returning the best trade

/// Prelude module for convenient imports.
pub mod prelude;

/// Router configuration.
pub mod config;
/// Router errors.
pub mod error;
/// Smart router facade.
pub mod facade;
/// Per-request options.
pub mod options;
/// In-flight request tracking.
pub mod supersession;
