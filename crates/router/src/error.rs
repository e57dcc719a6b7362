use sor_data::error::ProviderError;
use sor_domain::error::TradeError;
use thiserror::Error;

/// Errors returned by [`crate::facade::SmartRouter`].
///
/// Per-hop quoting failures and the absence of any route are not errors;
/// they surface as invalid quotes and `TradeOutcome::NoTrade`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No candidate pool source answered.
    #[error("candidate pool fetch failed: {0}")]
    CandidatePoolFetchFailed(#[source] ProviderError),
    /// A newer request for the same pair replaced this one.
    #[error("request superseded by a newer request for the same pair")]
    Superseded,
    /// The request was cancelled explicitly.
    #[error("request cancelled")]
    Cancelled,
    /// Selected routes did not form a consistent trade.
    #[error("invalid trade: {0}")]
    InvalidTrade(#[from] TradeError),
    /// The blocking routing worker panicked or was aborted.
    #[error("routing worker failed: {0}")]
    Worker(String),
}
