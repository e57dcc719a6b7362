use crate::value_objects::amount::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Units of the quote currency per unit of the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// `output / input` in human units. `None` when the input is zero or an
    /// amount is outside `Decimal` range.
    pub fn from_amounts(input: Amount, output: Amount) -> Option<Self> {
        let input = input.to_decimal()?;
        let output = output.to_decimal()?;
        if input.is_zero() {
            return None;
        }
        output.checked_div(input).map(Self::new)
    }

    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.round_dp(8).normalize())
    }
}
