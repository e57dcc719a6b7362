use crate::enums::SwapMode;
use crate::error::QuoteError;
use crate::value_objects::percentage::Percentage;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Amounts entering and leaving one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopQuote {
    #[serde(with = "crate::serde_u256")]
    pub amount_in: U256,
    #[serde(with = "crate::serde_u256")]
    pub amount_out: U256,
}

impl HopQuote {
    pub fn new(amount_in: U256, amount_out: U256) -> Self {
        Self {
            amount_in,
            amount_out,
        }
    }
}

/// Simulated execution of a whole path.
///
/// An invalid quote keeps the failure that disqualified it; it is never
/// turned into an error for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub mode: SwapMode,
    #[serde(with = "crate::serde_u256")]
    pub amount_in: U256,
    #[serde(with = "crate::serde_u256")]
    pub amount_out: U256,
    /// One entry per hop, in path order.
    pub hop_amounts: Vec<HopQuote>,
    /// `1 - realized / naive`, where naive chains each pool's spot output.
    pub price_impact: Percentage,
    pub valid: bool,
    #[serde(skip)]
    pub failure: Option<QuoteError>,
}

impl Quote {
    pub fn valid(
        mode: SwapMode,
        amount_in: U256,
        amount_out: U256,
        hop_amounts: Vec<HopQuote>,
        price_impact: Percentage,
    ) -> Self {
        Self {
            mode,
            amount_in,
            amount_out,
            hop_amounts,
            price_impact,
            valid: true,
            failure: None,
        }
    }

    /// A quote that cannot be executed. The fixed side keeps the requested
    /// amount and the computed side is zero.
    pub fn invalid(mode: SwapMode, requested: U256, failure: QuoteError) -> Self {
        let (amount_in, amount_out) = match mode {
            SwapMode::ExactIn => (requested, U256::zero()),
            SwapMode::ExactOut => (U256::zero(), requested),
        };
        Self {
            mode,
            amount_in,
            amount_out,
            hop_amounts: Vec::new(),
            price_impact: Percentage::ZERO,
            valid: false,
            failure: Some(failure),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
