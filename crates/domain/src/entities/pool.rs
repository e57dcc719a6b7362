use crate::entities::currency::Currency;
use crate::enums::{PoolType, Protocol};
use crate::error::{PoolStateError, QuoteError};
use crate::fees::FeeRate;
use crate::pools::{PoolModel, SwapContext};
use crate::value_objects::quote::HopQuote;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique pool identifier (usually the pool contract address or pool key hash).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of a liquidity pool for one routing computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub protocol: Protocol,
    pub currency0: Currency,
    pub currency1: Currency,
    pub model: PoolModel,
}

impl Pool {
    pub fn new(
        id: impl Into<String>,
        protocol: Protocol,
        currency0: Currency,
        currency1: Currency,
        model: PoolModel,
    ) -> Self {
        Self {
            id: PoolId::new(id),
            protocol,
            currency0,
            currency1,
            model,
        }
    }

    pub fn pool_type(&self) -> PoolType {
        self.model.pool_type()
    }

    pub fn involves(&self, currency: &Currency) -> bool {
        self.currency0 == *currency || self.currency1 == *currency
    }

    /// The pool's other currency, or `None` if `currency` is not in the pool.
    pub fn other(&self, currency: &Currency) -> Option<&Currency> {
        if self.currency0 == *currency {
            Some(&self.currency1)
        } else if self.currency1 == *currency {
            Some(&self.currency0)
        } else {
            None
        }
    }

    fn context(
        &self,
        zero_for_one: bool,
        sqrt_price_limit_x96: Option<U256>,
    ) -> SwapContext {
        let ctx = SwapContext::new(zero_for_one)
            .with_decimals(self.currency0.decimals, self.currency1.decimals);
        match sqrt_price_limit_x96 {
            Some(limit) => ctx.with_sqrt_price_limit(limit),
            None => ctx,
        }
    }

    fn zero_for_one_selling(&self, currency_in: &Currency) -> Result<bool, QuoteError> {
        if self.currency0 == *currency_in {
            Ok(true)
        } else if self.currency1 == *currency_in {
            Ok(false)
        } else {
            Err(QuoteError::UnknownCurrency)
        }
    }

    fn zero_for_one_buying(&self, currency_out: &Currency) -> Result<bool, QuoteError> {
        self.zero_for_one_selling(currency_out).map(|selling_zero| !selling_zero)
    }

    /// Output for selling exactly `amount_in` of `currency_in`.
    pub fn quote_exact_in(
        &self,
        currency_in: &Currency,
        amount_in: U256,
    ) -> Result<HopQuote, QuoteError> {
        self.quote_exact_in_with_limit(currency_in, amount_in, None)
    }

    /// Like [`Pool::quote_exact_in`] with an optional sqrt-price bound.
    pub fn quote_exact_in_with_limit(
        &self,
        currency_in: &Currency,
        amount_in: U256,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<HopQuote, QuoteError> {
        let zero_for_one = self.zero_for_one_selling(currency_in)?;
        self.model
            .quote_exact_in(&self.context(zero_for_one, sqrt_price_limit_x96), amount_in)
    }

    /// Input required to buy exactly `amount_out` of `currency_out`.
    pub fn quote_exact_out(
        &self,
        currency_out: &Currency,
        amount_out: U256,
    ) -> Result<HopQuote, QuoteError> {
        self.quote_exact_out_with_limit(currency_out, amount_out, None)
    }

    pub fn quote_exact_out_with_limit(
        &self,
        currency_out: &Currency,
        amount_out: U256,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<HopQuote, QuoteError> {
        let zero_for_one = self.zero_for_one_buying(currency_out)?;
        self.model
            .quote_exact_out(&self.context(zero_for_one, sqrt_price_limit_x96), amount_out)
    }

    /// Output at the marginal price with no fee and no slippage.
    pub fn spot_output(&self, currency_in: &Currency, amount_in: U256) -> Result<U256, QuoteError> {
        let zero_for_one = self.zero_for_one_selling(currency_in)?;
        self.model
            .spot_output(&self.context(zero_for_one, None), amount_in)
    }

    pub fn nominal_liquidity(&self) -> U256 {
        self.model.nominal_liquidity()
    }

    pub fn effective_fee(&self, currency_in: &Currency) -> Result<FeeRate, QuoteError> {
        let zero_for_one = self.zero_for_one_selling(currency_in)?;
        self.model.effective_fee(zero_for_one)
    }

    /// Detects malformed snapshots before they reach the router.
    pub fn validate(&self) -> Result<(), PoolStateError> {
        if self.currency0 == self.currency1 {
            return Err(PoolStateError::IdenticalCurrencies);
        }
        if self.currency0.chain_id != self.currency1.chain_id {
            return Err(PoolStateError::ChainMismatch);
        }
        self.model
            .validate(self.currency0.decimals, self.currency1.decimals)
    }
}
