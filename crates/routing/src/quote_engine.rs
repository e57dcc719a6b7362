//! Sequential simulation of a swap along a path.
//!
//! Failures at any hop disqualify the quote rather than surfacing as errors,
//! so a single exhausted pool never aborts a routing request.

use primitive_types::U256;
use sor_domain::entities::Path;
use sor_domain::enums::SwapMode;
use sor_domain::error::QuoteError;
use sor_domain::value_objects::{HopQuote, Percentage, Quote};
use tracing::debug;

/// Quotes selling exactly `amount_in` of the path input.
///
/// Each hop's output feeds the next hop. Price impact compares the realized
/// output with the output obtained by chaining every pool's spot price.
pub fn quote_exact_in(path: &Path, amount_in: U256) -> Quote {
    simulate_exact_in(path, amount_in).unwrap_or_else(|failure| {
        debug!(path = %path, amount_in = %amount_in, error = %failure, "Exact-in quote rejected");
        Quote::invalid(SwapMode::ExactIn, amount_in, failure)
    })
}

/// Quotes buying exactly `amount_out` of the path output.
///
/// Hops are solved from the output backwards; the required input of each
/// hop becomes the output the previous hop must produce.
pub fn quote_exact_out(path: &Path, amount_out: U256) -> Quote {
    simulate_exact_out(path, amount_out).unwrap_or_else(|failure| {
        debug!(path = %path, amount_out = %amount_out, error = %failure, "Exact-out quote rejected");
        Quote::invalid(SwapMode::ExactOut, amount_out, failure)
    })
}

fn simulate_exact_in(path: &Path, amount_in: U256) -> Result<Quote, QuoteError> {
    if amount_in.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }

    let mut hop_amounts = Vec::with_capacity(path.hop_count());
    let mut amount = amount_in;
    for (pool, currency_in, _) in path.hops() {
        let hop = pool.quote_exact_in(currency_in, amount)?;
        if hop.amount_out.is_zero() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        amount = hop.amount_out;
        hop_amounts.push(hop);
    }

    let naive = chained_spot_output(path, amount_in)?;
    Ok(Quote::valid(
        SwapMode::ExactIn,
        amount_in,
        amount,
        hop_amounts,
        Percentage::shortfall(amount, naive),
    ))
}

fn simulate_exact_out(path: &Path, amount_out: U256) -> Result<Quote, QuoteError> {
    if amount_out.is_zero() {
        return Err(QuoteError::InsufficientLiquidity);
    }

    let mut hop_amounts: Vec<HopQuote> = Vec::with_capacity(path.hop_count());
    let mut amount = amount_out;
    for (pool, _, currency_out) in path.hops().rev() {
        let hop = pool.quote_exact_out(currency_out, amount)?;
        amount = hop.amount_in;
        hop_amounts.push(hop);
    }
    hop_amounts.reverse();

    let naive = chained_spot_output(path, amount)?;
    Ok(Quote::valid(
        SwapMode::ExactOut,
        amount,
        amount_out,
        hop_amounts,
        Percentage::shortfall(amount_out, naive),
    ))
}

fn chained_spot_output(path: &Path, amount_in: U256) -> Result<U256, QuoteError> {
    path.hops()
        .try_fold(amount_in, |amount, (pool, currency_in, _)| {
            pool.spot_output(currency_in, amount)
        })
}
