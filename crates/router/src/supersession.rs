//! Tracking of in-flight requests per currency pair.
//!
//! Starting a request for a pair cancels the request already running for
//! that pair. The older request notices through its cancellation token and
//! its result is discarded.

use sor_domain::entities::Currency;
use sor_routing::cancellation::CancellationToken;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Directed `(currency_in, currency_out)` pair.
pub type PairKey = (Currency, Currency);

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Handle held by a running request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    /// Pair the request routes.
    pub pair: PairKey,
    /// Monotonic request number.
    pub generation: u64,
    /// Fired when the request is superseded or cancelled.
    pub token: CancellationToken,
}

/// Registry of the latest request per pair.
#[derive(Debug, Default)]
pub struct SupersessionRegistry {
    /// Latest request per pair.
    in_flight: Mutex<HashMap<PairKey, InFlight>>,
    /// Source of generation numbers.
    next_generation: AtomicU64,
}

impl SupersessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request, cancelling the one it replaces.
    pub async fn begin(&self, pair: PairKey) -> RequestTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let mut in_flight = self.in_flight.lock().await;
        let previous = in_flight.insert(
            pair.clone(),
            InFlight {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            debug!(
                superseded = previous.generation,
                by = generation,
                "Superseding in-flight request"
            );
            previous.token.cancel();
        }
        RequestTicket {
            pair,
            generation,
            token,
        }
    }

    /// `true` while no newer request for the same pair has started.
    pub async fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.in_flight
            .lock()
            .await
            .get(&ticket.pair)
            .is_some_and(|entry| entry.generation == ticket.generation)
    }

    /// Cancels the in-flight request for `pair` without replacing it.
    pub async fn cancel(&self, pair: &PairKey) -> bool {
        match self.in_flight.lock().await.get(pair) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Removes the ticket's entry if it is still the current one.
    pub async fn finish(&self, ticket: &RequestTicket) {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(&ticket.pair)
            .is_some_and(|entry| entry.generation == ticket.generation)
        {
            in_flight.remove(&ticket.pair);
        }
    }

    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
