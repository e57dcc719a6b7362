use crate::entities::currency::Currency;
use crate::entities::path::Path;
use crate::error::TradeError;
use crate::value_objects::amount::Amount;
use crate::value_objects::percentage::Percentage;
use crate::value_objects::price::Price;
use crate::value_objects::quote::Quote;
use primitive_types::U256;

/// A path with its allocated share of the trade input.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Path,
    pub quote: Quote,
    /// Execution cost charged against this route, in output currency units.
    pub cost_penalty: U256,
}

impl Route {
    pub fn new(path: Path, quote: Quote, cost_penalty: U256) -> Self {
        Self {
            path,
            quote,
            cost_penalty,
        }
    }

    pub fn amount_in(&self) -> U256 {
        self.quote.amount_in
    }

    pub fn amount_out(&self) -> U256 {
        self.quote.amount_out
    }

    /// Output after the cost penalty, floored at zero.
    pub fn net_output(&self) -> U256 {
        self.quote.amount_out.saturating_sub(self.cost_penalty)
    }
}

/// The selected execution: one or more routes that together spend exactly
/// the requested input.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    routes: Vec<Route>,
    amount_in: U256,
    amount_out: U256,
    cost_penalty: U256,
    price_impact: Percentage,
}

impl Trade {
    /// Validates the routes and aggregates their amounts.
    ///
    /// # Errors
    /// Fails when there are no routes, when routes disagree on input or
    /// output currency, or when route inputs do not sum to `amount_in`.
    pub fn new(routes: Vec<Route>, amount_in: U256) -> Result<Self, TradeError> {
        let first = routes.first().ok_or(TradeError::NoRoutes)?;
        let input = first.path.input().clone();
        let output = first.path.output().clone();

        let mut allocated = U256::zero();
        let mut amount_out = U256::zero();
        let mut cost_penalty = U256::zero();
        let mut impacts = Vec::with_capacity(routes.len());

        for route in &routes {
            if *route.path.input() != input || *route.path.output() != output {
                return Err(TradeError::CurrencyMismatch);
            }
            allocated = allocated
                .checked_add(route.amount_in())
                .ok_or(TradeError::Overflow)?;
            amount_out = amount_out
                .checked_add(route.amount_out())
                .ok_or(TradeError::Overflow)?;
            cost_penalty = cost_penalty
                .checked_add(route.cost_penalty)
                .ok_or(TradeError::Overflow)?;
            impacts.push((route.quote.price_impact, route.amount_in()));
        }

        if allocated != amount_in {
            return Err(TradeError::SharesMismatch {
                expected: amount_in.to_string(),
                actual: allocated.to_string(),
            });
        }

        Ok(Self {
            routes,
            amount_in,
            amount_out,
            cost_penalty,
            price_impact: Percentage::weighted_average(&impacts),
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_split(&self) -> bool {
        self.routes.len() > 1
    }

    pub fn currency_in(&self) -> &Currency {
        self.routes[0].path.input()
    }

    pub fn currency_out(&self) -> &Currency {
        self.routes[0].path.output()
    }

    pub fn amount_in(&self) -> U256 {
        self.amount_in
    }

    pub fn amount_out(&self) -> U256 {
        self.amount_out
    }

    pub fn cost_penalty(&self) -> U256 {
        self.cost_penalty
    }

    pub fn net_output(&self) -> U256 {
        self.amount_out.saturating_sub(self.cost_penalty)
    }

    /// Output per unit of input, in human units.
    pub fn execution_price(&self) -> Option<Price> {
        Price::from_amounts(
            Amount::new(self.amount_in, self.currency_in().decimals),
            Amount::new(self.amount_out, self.currency_out().decimals),
        )
    }

    /// Input-weighted price impact of the routes.
    pub fn price_impact(&self) -> Percentage {
        self.price_impact
    }

    /// Share of the input carried by each route, as fractions summing to one.
    pub fn shares(&self) -> Vec<Percentage> {
        self.routes
            .iter()
            .map(|route| Percentage::ratio(route.amount_in(), self.amount_in))
            .collect()
    }
}

/// Result of a routing request.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeOutcome {
    Trade(Trade),
    /// No valid route exists for the request.
    NoTrade,
}

impl TradeOutcome {
    pub fn trade(&self) -> Option<&Trade> {
        match self {
            TradeOutcome::Trade(trade) => Some(trade),
            TradeOutcome::NoTrade => None,
        }
    }

    pub fn is_no_trade(&self) -> bool {
        matches!(self, TradeOutcome::NoTrade)
    }
}
