//! End-to-end routing through the public API: candidate fetch, path search,
//! quoting, selection and request supersession.

use async_trait::async_trait;
use primitive_types::U256;
use sor_data::prelude::*;
use sor_domain::prelude::*;
use sor_domain::math::tick_math::get_sqrt_ratio_at_tick;
use sor_router::prelude::*;
use sor_routing::graph::{PathFinder, PathFinderConfig, PoolGraph};
use sor_routing::quote_engine::quote_exact_in;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn currency(symbol: &str) -> Currency {
    Currency::token(1, format!("0x{}", symbol.to_lowercase()), symbol, 18)
}

fn cp_pool(id: &str, a: &str, b: &str, reserve_a: U256, reserve_b: U256) -> Pool {
    Pool::new(
        id,
        Protocol::V2,
        currency(a),
        currency(b),
        PoolModel::ConstantProduct(ConstantProductState::new(
            reserve_a,
            reserve_b,
            FeeRate::from_bps(30),
        )),
    )
}

fn clmm_pool(id: &str, a: &str, b: &str, liquidity: u128) -> Pool {
    let state = ConcentratedState::new(
        get_sqrt_ratio_at_tick(0).unwrap(),
        0,
        liquidity,
        FeeRate::from_pips(3000),
        60,
    )
    .with_tick(-6000, liquidity as i128)
    .with_tick(6000, -(liquidity as i128));
    Pool::new(
        id,
        Protocol::V3,
        currency(a),
        currency(b),
        PoolModel::ConcentratedLiquidity(state),
    )
}

fn stable_pool(id: &str, a: &str, b: &str, balance: U256) -> Pool {
    Pool::new(
        id,
        Protocol::Stable,
        currency(a),
        currency(b),
        PoolModel::StableInvariant(StableState::new(balance, balance, 200, FeeRate::from_pips(400))),
    )
}

fn provider(pools: Vec<Pool>) -> MultiSourceProvider {
    MultiSourceProvider::new(vec![Arc::new(StaticPoolSource::new("fixture", pools))])
}

fn router(pools: Vec<Pool>) -> SmartRouter<MultiSourceProvider> {
    SmartRouter::new(provider(pools), RouterConfig::default())
}

fn mixed_network() -> Vec<Pool> {
    vec![
        cp_pool("v2-ab", "A", "B", U256::exp10(24), U256::exp10(24)),
        clmm_pool("v3-ab", "A", "B", 10u128.pow(24)),
        stable_pool("st-bc", "B", "C", U256::exp10(24)),
        cp_pool("v2-ac", "A", "C", U256::exp10(22), U256::exp10(22)),
    ]
}

fn expect_trade(outcome: TradeOutcome) -> Trade {
    match outcome {
        TradeOutcome::Trade(trade) => trade,
        TradeOutcome::NoTrade => panic!("expected a trade"),
    }
}

fn total_allocated(trade: &Trade) -> U256 {
    trade
        .routes()
        .iter()
        .fold(U256::zero(), |acc, route| acc + route.amount_in())
}

/// Provider that stalls on its first fetch.
struct StallingProvider {
    inner: MultiSourceProvider,
    stall: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl CandidatePoolProvider for StallingProvider {
    async fn fetch_pools(&self, request: &CandidateRequest) -> Result<CandidateSet, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.stall).await;
        }
        self.inner.fetch_pools(request).await
    }
}

struct FailingSource;

#[async_trait]
impl PoolSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch(&self, _request: &CandidateRequest) -> Result<Vec<Pool>, ProviderError> {
        Err(ProviderError::NoSources)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn constant_product_reference_example() {
    let router = router(vec![cp_pool("p", "A", "B", U256::from(1000u64), U256::from(1000u64))]);
    let outcome = router
        .get_best_trade(U256::from(10u64), &currency("A"), &currency("B"), &TradeOptions::default())
        .await
        .unwrap();

    let trade = expect_trade(outcome);
    assert_eq!(trade.amount_out(), U256::from(9u64));
    assert!(!trade.is_split());
}

#[tokio::test]
async fn best_trade_beats_every_single_path() {
    let pools = mixed_network();
    let options = TradeOptions::default().with_intermediates(vec![currency("B")]);
    let amount_in = U256::exp10(21);

    let trade = expect_trade(
        router(pools.clone())
            .get_best_trade(amount_in, &currency("A"), &currency("C"), &options)
            .await
            .unwrap(),
    );

    let shared: Vec<Arc<Pool>> = pools.into_iter().map(Arc::new).collect();
    let graph = PoolGraph::new(&shared);
    let paths = PathFinder::new(&graph, PathFinderConfig::default())
        .find_paths(&currency("A"), &currency("C"));
    assert_eq!(paths.len(), 3);
    for path in &paths {
        let quote = quote_exact_in(path, amount_in);
        assert!(quote.is_valid());
        assert!(trade.net_output() >= quote.amount_out, "{path} beats the selected trade");
    }
    assert_eq!(total_allocated(&trade), amount_in);
}

#[tokio::test]
async fn split_shares_sum_to_input() {
    let pools = vec![
        cp_pool("p1", "A", "B", U256::from(1_000_000u64), U256::from(1_000_000u64)),
        cp_pool("p2", "A", "B", U256::from(1_000_000u64), U256::from(1_000_000u64)),
    ];
    let trade = expect_trade(
        router(pools)
            .get_best_trade(
                U256::from(100_000u64),
                &currency("A"),
                &currency("B"),
                &TradeOptions::default(),
            )
            .await
            .unwrap(),
    );

    assert!(trade.is_split());
    assert_eq!(total_allocated(&trade), U256::from(100_000u64));
    assert_eq!(trade.amount_out(), U256::from(94_964u64));
}

#[tokio::test]
async fn max_splits_option_disables_splitting() {
    let pools = vec![
        cp_pool("p1", "A", "B", U256::from(1_000_000u64), U256::from(1_000_000u64)),
        cp_pool("p2", "A", "B", U256::from(1_000_000u64), U256::from(1_000_000u64)),
    ];
    let trade = expect_trade(
        router(pools)
            .get_best_trade(
                U256::from(100_000u64),
                &currency("A"),
                &currency("B"),
                &TradeOptions::default().with_max_splits(1),
            )
            .await
            .unwrap(),
    );

    assert!(!trade.is_split());
    assert_eq!(trade.routes()[0].path.pool_ids()[0].as_str(), "p1");
}

#[tokio::test]
async fn pool_type_filter_restricts_routes() {
    let options = TradeOptions::default()
        .with_intermediates(vec![currency("B")])
        .with_pool_types(vec![PoolType::ConstantProduct]);
    let trade = expect_trade(
        router(mixed_network())
            .get_best_trade(U256::exp10(18), &currency("A"), &currency("C"), &options)
            .await
            .unwrap(),
    );

    for route in trade.routes() {
        for pool in route.path.pools() {
            assert_eq!(pool.pool_type(), PoolType::ConstantProduct);
        }
    }
}

#[tokio::test]
async fn disjoint_pools_yield_no_trade() {
    let pools = vec![
        cp_pool("ab", "A", "B", U256::exp10(20), U256::exp10(20)),
        cp_pool("cd", "C", "D", U256::exp10(20), U256::exp10(20)),
    ];
    let options = TradeOptions::default().with_intermediates(vec![currency("B"), currency("C")]);
    let outcome = router(pools)
        .get_best_trade(U256::exp10(18), &currency("A"), &currency("D"), &options)
        .await
        .unwrap();
    assert!(outcome.is_no_trade());
}

#[tokio::test]
async fn exhausted_pools_yield_no_trade() {
    let router = router(vec![cp_pool("tiny", "A", "B", U256::from(10u64), U256::from(10u64))]);
    let outcome = router
        .get_best_trade(U256::one(), &currency("A"), &currency("B"), &TradeOptions::default())
        .await
        .unwrap();
    assert!(outcome.is_no_trade());
}

#[tokio::test]
async fn snapshot_file_round_trip() {
    let snapshot = PoolSnapshot::from_pools(&mixed_network(), Some(BlockReference(100))).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&snapshot).unwrap().as_bytes())
        .unwrap();

    let source = StaticPoolSource::from_json_file(file.path()).await.unwrap();
    let router = SmartRouter::new(
        MultiSourceProvider::new(vec![Arc::new(source)]),
        RouterConfig::default(),
    );
    let options = TradeOptions::default()
        .with_intermediates(vec![currency("B")])
        .at_block(BlockReference(100));
    let outcome = router
        .get_best_trade(U256::exp10(18), &currency("A"), &currency("C"), &options)
        .await
        .unwrap();
    assert!(!outcome.is_no_trade());
}

// ---------------------------------------------------------------------------
// Failures and request lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_failure_is_reported() {
    let router = SmartRouter::new(
        MultiSourceProvider::new(vec![Arc::new(FailingSource)]),
        RouterConfig::default(),
    );
    let result = router
        .get_best_trade(U256::from(10u64), &currency("A"), &currency("B"), &TradeOptions::default())
        .await;
    assert!(matches!(result, Err(RouterError::CandidatePoolFetchFailed(_))));
}

#[tokio::test]
async fn newer_request_supersedes_older() {
    let router = Arc::new(SmartRouter::new(
        StallingProvider {
            inner: provider(vec![cp_pool(
                "p",
                "A",
                "B",
                U256::from(1_000_000u64),
                U256::from(1_000_000u64),
            )]),
            stall: Duration::from_millis(300),
            calls: AtomicUsize::new(0),
        },
        RouterConfig::default(),
    ));

    let first = {
        let router = Arc::clone(&router);
        tokio::spawn(async move {
            router
                .get_best_trade(
                    U256::from(1_000u64),
                    &currency("A"),
                    &currency("B"),
                    &TradeOptions::default(),
                )
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = router
        .get_best_trade(U256::from(2_000u64), &currency("A"), &currency("B"), &TradeOptions::default())
        .await;
    assert!(!second.unwrap().is_no_trade());

    let first = first.await.unwrap();
    assert!(matches!(first, Err(RouterError::Superseded)));
}

#[tokio::test]
async fn explicit_cancel_is_reported() {
    let router = Arc::new(SmartRouter::new(
        StallingProvider {
            inner: provider(vec![cp_pool(
                "p",
                "A",
                "B",
                U256::from(1_000_000u64),
                U256::from(1_000_000u64),
            )]),
            stall: Duration::from_millis(200),
            calls: AtomicUsize::new(0),
        },
        RouterConfig::default(),
    ));

    let pending = {
        let router = Arc::clone(&router);
        tokio::spawn(async move {
            router
                .get_best_trade(
                    U256::from(1_000u64),
                    &currency("A"),
                    &currency("B"),
                    &TradeOptions::default(),
                )
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(router.cancel(&currency("A"), &currency("B")).await);

    assert!(matches!(pending.await.unwrap(), Err(RouterError::Cancelled)));
}

// ---------------------------------------------------------------------------
// Bundled mainnet-style snapshot
// ---------------------------------------------------------------------------

async fn bundled_snapshot() -> StaticPoolSource {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../cli/fixtures/mainnet_pools.json");
    StaticPoolSource::from_json_file(path).await.unwrap()
}

fn snapshot_currency(source: &StaticPoolSource, symbol: &str) -> Currency {
    source
        .pools()
        .iter()
        .flat_map(|pool| [&pool.currency0, &pool.currency1])
        .find(|currency| currency.symbol == symbol)
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn bundled_snapshot_decodes_every_protocol() {
    let source = bundled_snapshot().await;
    assert_eq!(source.pools().len(), 6);
    assert_eq!(source.block(), Some(BlockReference(19_000_000)));
    for pool in source.pools() {
        pool.validate().unwrap();
    }
    let types: std::collections::BTreeSet<PoolType> =
        source.pools().iter().map(|pool| pool.pool_type()).collect();
    assert_eq!(types.len(), 4);
}

#[tokio::test]
async fn bundled_snapshot_routes_usdt_to_dai() {
    let source = bundled_snapshot().await;
    let usdt = snapshot_currency(&source, "USDT");
    let dai = snapshot_currency(&source, "DAI");
    let intermediates = vec![
        snapshot_currency(&source, "USDC"),
        snapshot_currency(&source, "WETH"),
    ];
    let router = SmartRouter::new(
        MultiSourceProvider::new(vec![Arc::new(source)]),
        RouterConfig::default(),
    );

    // 10,000 USDT
    let amount_in = U256::from(10_000_000_000u64);
    let trade = expect_trade(
        router
            .get_best_trade(
                amount_in,
                &usdt,
                &dai,
                &TradeOptions::default().with_intermediates(intermediates),
            )
            .await
            .unwrap(),
    );

    assert_eq!(total_allocated(&trade), amount_in);
    for route in trade.routes() {
        assert_eq!(route.path.input(), &usdt);
        assert_eq!(route.path.output(), &dai);
        assert!(route.path.hop_count() >= 2);
    }
    assert!(trade.amount_out() > U256::zero());
}
