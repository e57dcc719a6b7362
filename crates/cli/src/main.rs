//! Command Line Interface for the Smart Order Router.
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use primitive_types::U256;
use rust_decimal::Decimal;
use sor_data::prelude::*;
use sor_domain::prelude::*;
use sor_router::prelude::*;
use sor_routing::objective::GasCostModel;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sor")]
#[command(about = "Smart Order Router for DEX aggregation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pools of a snapshot
    Pools {
        /// Pool snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,
    },
    /// Find the best trade for an exact input amount
    Quote {
        /// Pool snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Additional HTTP pool source URL
        #[arg(long)]
        http: Option<String>,

        /// Input currency (symbol or address)
        #[arg(short, long)]
        from: String,

        /// Output currency (symbol or address)
        #[arg(short, long)]
        to: String,

        /// Input amount in human units (e.g., 1.5)
        #[arg(short, long)]
        amount: Decimal,

        /// Maximum pools per route
        #[arg(long)]
        max_hops: Option<usize>,

        /// Maximum routes to split across
        #[arg(long)]
        max_splits: Option<usize>,

        /// Pin candidate pools to a block
        #[arg(long)]
        block: Option<u64>,

        /// Router config JSON file (defaults to SOR_* environment variables)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Gas price in gwei; enables gas-aware route costing
        #[arg(long)]
        gas_price_gwei: Option<u64>,

        /// Output currency per native unit, used to price gas
        #[arg(long, requires = "gas_price_gwei")]
        native_price: Option<Decimal>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pools { snapshot } => {
            let source = StaticPoolSource::from_json_file(&snapshot)
                .await
                .with_context(|| format!("reading snapshot {}", snapshot.display()))?;

            println!(
                "📦 {} pools in {} (block {})",
                source.pools().len(),
                snapshot.display(),
                source
                    .block()
                    .map_or_else(|| "latest".to_string(), |block| block.to_string())
            );
            println!(
                "{:<12} | {:<8} | {:<20} | {:<22} | {:<8}",
                "Pool", "Protocol", "Type", "Pair", "Status"
            );
            println!("{}", "-".repeat(82));
            for pool in source.pools() {
                let status = match pool.validate() {
                    Ok(()) => "ok".to_string(),
                    Err(err) => format!("invalid: {err}"),
                };
                println!(
                    "{:<12} | {:<8} | {:<20} | {:<22} | {}",
                    short_id(pool.id.as_str()),
                    pool.protocol,
                    format!("{:?}", pool.pool_type()),
                    format!("{}/{}", pool.currency0.symbol, pool.currency1.symbol),
                    status
                );
            }
        }
        Commands::Quote {
            snapshot,
            http,
            from,
            to,
            amount,
            max_hops,
            max_splits,
            block,
            config,
            gas_price_gwei,
            native_price,
        } => {
            let config = match config {
                Some(path) => RouterConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RouterConfig::from_env()?,
            };

            println!("📂 Loading pool snapshot {}...", snapshot.display());
            let source = StaticPoolSource::from_json_file(&snapshot).await?;
            info!(
                path = %snapshot.display(),
                pools = source.pools().len(),
                "Pool snapshot loaded"
            );
            let currency_in = resolve_currency(source.pools(), &from)?;
            let currency_out = resolve_currency(source.pools(), &to)?;
            let intermediates: Vec<Currency> = source
                .pools()
                .iter()
                .flat_map(|pool| [pool.currency0.clone(), pool.currency1.clone()])
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let amount_in = Amount::from_decimal(amount, currency_in.decimals)
                .ok_or_else(|| anyhow!("amount {amount} is not representable"))?;

            let mut sources: Vec<Arc<dyn PoolSource>> = vec![Arc::new(source)];
            if let Some(url) = http {
                println!("🌐 Adding HTTP pool source {url}");
                sources.push(Arc::new(HttpPoolSource::new("http", url)));
            }
            let provider = MultiSourceProvider::new(sources).with_timeout(config.fetch_timeout());

            let mut router = SmartRouter::new(provider, config);
            if let Some(gwei) = gas_price_gwei {
                let native_price = native_price.unwrap_or(Decimal::ZERO);
                let per_native = Amount::from_decimal(native_price, currency_out.decimals)
                    .ok_or_else(|| anyhow!("native price {native_price} is not representable"))?;
                let model = GasCostModel::new(
                    U256::from(gwei) * U256::exp10(9),
                    per_native.raw,
                    U256::exp10(18),
                );
                router = router.with_cost_model(Arc::new(model));
            }

            let mut options = TradeOptions::default().with_intermediates(intermediates);
            if let Some(hops) = max_hops {
                options = options.with_max_hops(hops);
            }
            if let Some(splits) = max_splits {
                options = options.with_max_splits(splits);
            }
            if let Some(block) = block {
                options = options.at_block(BlockReference(block));
            }

            println!(
                "🔍 Routing {} {} -> {}...",
                amount_in, currency_in.symbol, currency_out.symbol
            );
            let started = std::time::Instant::now();
            let outcome = router
                .get_best_trade(amount_in.raw, &currency_in, &currency_out, &options)
                .await?;
            let elapsed = started.elapsed();
            info!(
                elapsed_ms = elapsed.as_millis() as u64,
                found = !outcome.is_no_trade(),
                "Routing finished"
            );

            match outcome {
                TradeOutcome::NoTrade => {
                    warn!(currency_in = %currency_in, currency_out = %currency_out, "No route found");
                    println!("❌ No route found between {} and {}", currency_in, currency_out);
                }
                TradeOutcome::Trade(trade) => print_trade(&trade, elapsed),
            }
        }
    }

    Ok(())
}

/// Finds a snapshot currency by symbol (case-insensitive) or address.
fn resolve_currency(pools: &[Pool], query: &str) -> Result<Currency> {
    let matches: BTreeSet<&Currency> = pools
        .iter()
        .flat_map(|pool| [&pool.currency0, &pool.currency1])
        .filter(|currency| {
            currency.symbol.eq_ignore_ascii_case(query)
                || currency
                    .address()
                    .is_some_and(|address| address.eq_ignore_ascii_case(query))
        })
        .collect();

    let mut matches = matches.into_iter();
    match (matches.next(), matches.next()) {
        (Some(currency), None) => Ok(currency.clone()),
        (None, _) => bail!("currency {query} not found in snapshot"),
        _ => bail!("currency {query} is ambiguous, use the address"),
    }
}

fn short_id(id: &str) -> String {
    match (id.get(..6), id.get(id.len().saturating_sub(4)..)) {
        (Some(head), Some(tail)) if id.len() > 12 => format!("{head}..{tail}"),
        _ => id.to_string(),
    }
}

fn print_trade(trade: &Trade, elapsed: Duration) {
    let decimals_in = trade.currency_in().decimals;
    let decimals_out = trade.currency_out().decimals;
    let amount_in = Amount::new(trade.amount_in(), decimals_in);
    let amount_out = Amount::new(trade.amount_out(), decimals_out);

    println!("\n✅ Best trade found in {:.1?}", elapsed);
    println!("{}", "=".repeat(60));
    println!(
        "Input:            {} {}",
        amount_in,
        trade.currency_in().symbol
    );
    println!(
        "Output:           {} {}",
        amount_out,
        trade.currency_out().symbol
    );
    if !trade.cost_penalty().is_zero() {
        println!(
            "Net of costs:     {} {}",
            Amount::new(trade.net_output(), decimals_out),
            trade.currency_out().symbol
        );
    }
    match trade.execution_price() {
        Some(price) => println!(
            "Execution price:  {} {} per {}",
            price,
            trade.currency_out().symbol,
            trade.currency_in().symbol
        ),
        None => println!("Execution price:  n/a"),
    }
    println!("Price impact:     {}", trade.price_impact());

    println!("\n🛣️  Routes ({})", trade.routes().len());
    println!("{}", "-".repeat(60));
    for (route, share) in trade.routes().iter().zip(trade.shares()) {
        let symbols: Vec<&str> = route
            .path
            .currencies()
            .iter()
            .map(|currency| currency.symbol.as_str())
            .collect();
        println!(
            "{:>8}  {}  -> {} {}",
            share.to_string(),
            symbols.join(" > "),
            Amount::new(route.amount_out(), decimals_out),
            trade.currency_out().symbol
        );
        for pool in route.path.pools() {
            println!(
                "          via {} {} ({:?})",
                pool.protocol,
                short_id(pool.id.as_str()),
                pool.pool_type()
            );
        }
    }
}
