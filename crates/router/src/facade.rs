//! The smart router entry point.

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::options::TradeOptions;
use crate::supersession::{RequestTicket, SupersessionRegistry};
use primitive_types::U256;
use sor_data::provider::CandidatePoolProvider;
use sor_data::request::CandidateRequest;
use sor_domain::entities::{Currency, Pool};
use sor_domain::value_objects::TradeOutcome;
use sor_routing::cancellation::CancellationToken;
use sor_routing::error::RoutingError;
use sor_routing::graph::{PathFinder, PathFinderConfig, PoolGraph};
use sor_routing::objective::{CostModel, FixedHopCost};
use sor_routing::selector::{BestTradeSelector, MAX_SUPPORTED_SPLITS};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Finds the best trade for a swap over pools supplied by a provider.
///
/// Candidate fetching is async; graph construction, quoting and selection
/// run on a blocking worker over shared pool snapshots.
pub struct SmartRouter<P> {
    /// Source of candidate pools.
    provider: P,
    /// Router-wide defaults.
    config: RouterConfig,
    /// Execution cost charged against route output.
    cost_model: Arc<dyn CostModel>,
    /// Latest request per pair.
    registry: SupersessionRegistry,
}

impl<P: CandidatePoolProvider> SmartRouter<P> {
    /// Creates a router charging `config.hop_cost` per hop.
    pub fn new(provider: P, config: RouterConfig) -> Self {
        let cost_model = Arc::new(FixedHopCost::new(config.hop_cost));
        Self {
            provider,
            config,
            cost_model,
            registry: SupersessionRegistry::new(),
        }
    }

    #[must_use]
    pub fn with_cost_model(mut self, cost_model: Arc<dyn CostModel>) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cancels the in-flight request for the pair, if any. The request
    /// returns [`RouterError::Cancelled`].
    pub async fn cancel(&self, currency_in: &Currency, currency_out: &Currency) -> bool {
        self.registry
            .cancel(&(currency_in.clone(), currency_out.clone()))
            .await
    }

    /// Best trade selling exactly `amount_in` of `currency_in` for
    /// `currency_out`.
    ///
    /// Returns `TradeOutcome::NoTrade` when no valid route exists.
    ///
    /// # Errors
    /// - [`RouterError::CandidatePoolFetchFailed`] when no pool source answers.
    /// - [`RouterError::Superseded`] when a newer request for the same pair
    ///   started before this one finished.
    /// - [`RouterError::Cancelled`] when [`SmartRouter::cancel`] was called.
    pub async fn get_best_trade(
        &self,
        amount_in: U256,
        currency_in: &Currency,
        currency_out: &Currency,
        options: &TradeOptions,
    ) -> Result<TradeOutcome, RouterError> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "get_best_trade",
            request_id = %request_id,
            currency_in = %currency_in,
            currency_out = %currency_out,
            amount_in = %amount_in,
        );
        self.route(amount_in, currency_in, currency_out, options)
            .instrument(span)
            .await
    }

    async fn route(
        &self,
        amount_in: U256,
        currency_in: &Currency,
        currency_out: &Currency,
        options: &TradeOptions,
    ) -> Result<TradeOutcome, RouterError> {
        if amount_in.is_zero() || currency_in == currency_out {
            debug!("Degenerate request, nothing to route");
            return Ok(TradeOutcome::NoTrade);
        }

        let ticket = self
            .registry
            .begin((currency_in.clone(), currency_out.clone()))
            .await;
        let result = self
            .route_with_ticket(&ticket, amount_in, currency_in, currency_out, options)
            .await;

        let result = if self.registry.is_current(&ticket).await {
            result
        } else {
            info!(generation = ticket.generation, "Request superseded, discarding result");
            Err(RouterError::Superseded)
        };
        self.registry.finish(&ticket).await;
        result
    }

    async fn route_with_ticket(
        &self,
        ticket: &RequestTicket,
        amount_in: U256,
        currency_in: &Currency,
        currency_out: &Currency,
        options: &TradeOptions,
    ) -> Result<TradeOutcome, RouterError> {
        let mut request = CandidateRequest::new(currency_in.clone(), currency_out.clone())
            .with_intermediates(options.intermediates.clone());
        request.block = options.block;

        let candidates = self
            .provider
            .fetch_pools(&request)
            .await
            .map_err(RouterError::CandidatePoolFetchFailed)?;
        if ticket.token.is_cancelled() {
            return Err(RouterError::Cancelled);
        }

        let pools: Vec<Arc<Pool>> = candidates
            .pools
            .iter()
            .filter(|pool| options.allows(pool))
            .cloned()
            .collect();
        debug!(
            candidates = candidates.len(),
            allowed = pools.len(),
            excluded = candidates.excluded.len(),
            "Candidate pools ready"
        );

        let finder_config = PathFinderConfig {
            max_hops: options.max_hops.unwrap_or(self.config.max_hops),
            max_paths: self.config.max_paths,
        };
        let mut selector_config = self.config.selector();
        let requested_splits = options.max_splits.unwrap_or(selector_config.max_splits);
        if requested_splits > MAX_SUPPORTED_SPLITS {
            warn!(
                requested = requested_splits,
                supported = MAX_SUPPORTED_SPLITS,
                "Clamping split count"
            );
        }
        selector_config.max_splits = requested_splits.min(MAX_SUPPORTED_SPLITS);
        let selector =
            BestTradeSelector::new(selector_config).with_cost_model(Arc::clone(&self.cost_model));

        let job = RoutingJob {
            pools,
            currency_in: currency_in.clone(),
            currency_out: currency_out.clone(),
            amount_in,
            finder_config,
            selector,
            token: ticket.token.clone(),
        };
        let span = tracing::Span::current();
        let outcome = tokio::task::spawn_blocking(move || span.in_scope(|| job.run()))
            .await
            .map_err(|err| RouterError::Worker(err.to_string()))?;

        match outcome {
            Ok(outcome) => {
                if let TradeOutcome::Trade(trade) = &outcome {
                    info!(
                        routes = trade.routes().len(),
                        amount_out = %trade.amount_out(),
                        net_output = %trade.net_output(),
                        price_impact = %trade.price_impact(),
                        "Best trade found"
                    );
                } else {
                    info!("No trade available");
                }
                Ok(outcome)
            }
            Err(RoutingError::Cancelled) => Err(RouterError::Cancelled),
            Err(RoutingError::Trade(err)) => Err(RouterError::InvalidTrade(err)),
        }
    }
}

/// Synchronous part of a request, moved onto a blocking worker.
struct RoutingJob {
    pools: Vec<Arc<Pool>>,
    currency_in: Currency,
    currency_out: Currency,
    amount_in: U256,
    finder_config: PathFinderConfig,
    selector: BestTradeSelector,
    token: CancellationToken,
}

impl RoutingJob {
    fn run(self) -> Result<TradeOutcome, RoutingError> {
        self.token.check()?;
        let graph = PoolGraph::new(&self.pools);
        let paths = PathFinder::new(&graph, self.finder_config)
            .find_paths(&self.currency_in, &self.currency_out);
        if paths.is_empty() {
            return Ok(TradeOutcome::NoTrade);
        }
        self.token.check()?;
        self.selector.select(&paths, self.amount_in, &self.token)
    }
}
