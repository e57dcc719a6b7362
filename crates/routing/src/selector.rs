//! Best-trade selection over quoted paths.
//!
//! Routes are ranked by net output (gross output minus the cost model's
//! penalty), then by fewer hops, then by the lexicographically smallest
//! pool-id sequence. The best single route may be replaced by a split across
//! two pool-disjoint paths when the split nets strictly more.
//!
//! Paths that cannot absorb the whole input still take part in the split
//! search, so two shallow pools can fill an order neither fills alone.

use crate::cancellation::CancellationToken;
use crate::error::RoutingError;
use crate::memo::QuoteMemo;
use crate::objective::{CostModel, FixedHopCost};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sor_domain::entities::Path;
use sor_domain::math::full_math::mul_div;
use sor_domain::value_objects::{Route, Trade, TradeOutcome};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Largest number of routes a trade may be split across.
pub const MAX_SUPPORTED_SPLITS: usize = 2;

/// Split search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Maximum routes per trade; values above two are treated as two.
    pub max_splits: usize,
    /// Grid step of the split search, in percent of the input.
    pub split_step_percent: u32,
    /// Number of best single routes paired up in the split search.
    pub split_candidates: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_splits: MAX_SUPPORTED_SPLITS,
            split_step_percent: 10,
            split_candidates: 4,
        }
    }
}

/// Chooses the trade with the highest net output.
#[derive(Debug, Clone)]
pub struct BestTradeSelector {
    config: SelectorConfig,
    cost_model: Arc<dyn CostModel>,
}

impl BestTradeSelector {
    /// Creates a selector charging no execution cost.
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            cost_model: Arc::new(FixedHopCost::default()),
        }
    }

    #[must_use]
    pub fn with_cost_model(mut self, cost_model: Arc<dyn CostModel>) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Selects the best trade spending exactly `amount_in` over `paths`.
    ///
    /// Returns [`TradeOutcome::NoTrade`] when neither a single path nor a
    /// split yields a valid quote.
    ///
    /// # Errors
    /// [`RoutingError::Cancelled`] when `cancel` fires between quotes.
    pub fn select(
        &self,
        paths: &[Path],
        amount_in: U256,
        cancel: &CancellationToken,
    ) -> Result<TradeOutcome, RoutingError> {
        let mut memo = QuoteMemo::new();
        let mut candidates = Vec::with_capacity(paths.len());
        let mut partial = Vec::new();

        for path in paths {
            cancel.check()?;
            match self.route(&mut memo, path, amount_in) {
                Some(route) => candidates.push(route),
                None => partial.push(path),
            }
        }
        candidates.sort_by(rank);

        let best_single = candidates.first().cloned();
        let single_net = best_single
            .as_ref()
            .map_or(U256::zero(), |route| route.net_output());

        let split = if self.config.max_splits.min(MAX_SUPPORTED_SPLITS) >= 2 {
            let limit = self.config.split_candidates;
            let split_paths: Vec<&Path> = candidates
                .iter()
                .take(limit)
                .map(|route| &route.path)
                .chain(partial.iter().copied().take(limit))
                .collect();
            self.best_split(&mut memo, &split_paths, amount_in, single_net, cancel)?
        } else {
            None
        };

        let routes = match (split, best_single) {
            (Some((first, second)), _) => {
                info!(
                    first = %first.path,
                    second = %second.path,
                    first_in = %first.amount_in(),
                    second_in = %second.amount_in(),
                    "Selected split trade"
                );
                vec![first, second]
            }
            (None, Some(best_single)) => {
                info!(
                    path = %best_single.path,
                    amount_out = %best_single.amount_out(),
                    "Selected single-route trade"
                );
                vec![best_single]
            }
            (None, None) => {
                info!(paths = paths.len(), "No valid quote on any path");
                return Ok(TradeOutcome::NoTrade);
            }
        };

        debug!(
            quotes = memo.len(),
            memo_hits = memo.hits(),
            "Selection finished"
        );
        Ok(TradeOutcome::Trade(Trade::new(routes, amount_in)?))
    }

    fn route(&self, memo: &mut QuoteMemo, path: &Path, amount_in: U256) -> Option<Route> {
        let quote = memo.quote_exact_in(path, amount_in);
        if !quote.is_valid() {
            return None;
        }
        let cost_penalty = self
            .cost_model
            .cost_penalty(path.hop_count(), &path.protocol_mix());
        Some(Route::new(path.clone(), quote, cost_penalty))
    }

    /// Best pool-disjoint pair on the split grid whose net output beats
    /// `floor`. Pairs keep the order of `paths`.
    fn best_split(
        &self,
        memo: &mut QuoteMemo,
        paths: &[&Path],
        amount_in: U256,
        floor: U256,
        cancel: &CancellationToken,
    ) -> Result<Option<(Route, Route)>, RoutingError> {
        let step = self.config.split_step_percent;
        if step == 0 || step >= 100 {
            return Ok(None);
        }

        let mut best: Option<(Route, Route)> = None;
        let mut best_net = floor;

        for (i, first) in paths.iter().enumerate() {
            for second in &paths[i + 1..] {
                if !first.is_pool_disjoint(second) {
                    continue;
                }
                for percent in (step..100).step_by(step as usize) {
                    cancel.check()?;
                    let Ok(first_share) =
                        mul_div(amount_in, U256::from(percent), U256::from(100u64))
                    else {
                        continue;
                    };
                    let second_share = amount_in - first_share;
                    if first_share.is_zero() || second_share.is_zero() {
                        continue;
                    }

                    let Some(a) = self.route(memo, first, first_share) else {
                        continue;
                    };
                    let Some(b) = self.route(memo, second, second_share) else {
                        continue;
                    };

                    let gross = a.amount_out().saturating_add(b.amount_out());
                    let net = gross.saturating_sub(a.cost_penalty.saturating_add(b.cost_penalty));
                    if net > best_net {
                        debug!(
                            first = %first,
                            second = %second,
                            percent,
                            net = %net,
                            "Split improves on best candidate"
                        );
                        best_net = net;
                        best = Some((a, b));
                    }
                }
            }
        }

        Ok(best)
    }
}

/// Higher net output first, then fewer hops, then smaller pool-id sequence.
fn rank(a: &Route, b: &Route) -> Ordering {
    b.net_output()
        .cmp(&a.net_output())
        .then_with(|| a.path.hop_count().cmp(&b.path.hop_count()))
        .then_with(|| a.path.pool_ids().cmp(&b.path.pool_ids()))
}
