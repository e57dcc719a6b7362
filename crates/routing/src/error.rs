use sor_domain::error::TradeError;
use thiserror::Error;

/// Errors raised while selecting a trade.
///
/// Per-hop quoting failures never appear here; they disqualify the quote
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The cancellation token fired before selection finished.
    #[error("routing cancelled")]
    Cancelled,
    /// The selected routes did not form a consistent trade.
    #[error("invalid trade: {0}")]
    Trade(#[from] TradeError),
}
