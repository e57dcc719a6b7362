pub mod amount;
pub mod candidate_set;
pub mod percentage;
pub mod price;
pub mod quote;
pub mod trade;

pub use amount::Amount;
pub use candidate_set::{BlockReference, CandidateSet, ExcludedPool};
pub use percentage::Percentage;
pub use price::Price;
pub use quote::{HopQuote, Quote};
pub use trade::{Route, Trade, TradeOutcome};
