//! Currency graph over candidate pools and bounded path enumeration.
//!
//! Nodes are currencies and edges are pools. Several pools may connect the
//! same pair, so the graph is an undirected multigraph.

use serde::{Deserialize, Serialize};
use sor_domain::entities::{Currency, Path, Pool, PoolId};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Adjacency lists keyed by currency.
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    adjacency: HashMap<Currency, Vec<Arc<Pool>>>,
    pool_count: usize,
}

impl PoolGraph {
    /// Builds the graph, keeping the first pool seen for each id.
    ///
    /// Neighbour lists are ordered by descending nominal liquidity, then
    /// ascending pool id, which is the order the path finder explores them.
    pub fn new(pools: &[Arc<Pool>]) -> Self {
        let mut seen: HashSet<&PoolId> = HashSet::with_capacity(pools.len());
        let mut adjacency: HashMap<Currency, Vec<Arc<Pool>>> = HashMap::new();

        for pool in pools {
            if !seen.insert(&pool.id) {
                continue;
            }
            adjacency
                .entry(pool.currency0.clone())
                .or_default()
                .push(Arc::clone(pool));
            if pool.currency1 != pool.currency0 {
                adjacency
                    .entry(pool.currency1.clone())
                    .or_default()
                    .push(Arc::clone(pool));
            }
        }

        for neighbours in adjacency.values_mut() {
            neighbours.sort_by(|a, b| exploration_order(a, b));
        }

        Self {
            adjacency,
            pool_count: seen.len(),
        }
    }

    pub fn pool_count(&self) -> usize {
        self.pool_count
    }

    pub fn currency_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Pools touching `currency`, in exploration order.
    pub fn neighbours(&self, currency: &Currency) -> &[Arc<Pool>] {
        self.adjacency
            .get(currency)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, currency: &Currency) -> bool {
        self.adjacency.contains_key(currency)
    }
}

fn exploration_order(a: &Pool, b: &Pool) -> Ordering {
    b.nominal_liquidity()
        .cmp(&a.nominal_liquidity())
        .then_with(|| a.id.cmp(&b.id))
}

/// Limits applied to path enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFinderConfig {
    /// Maximum pools per path.
    pub max_hops: usize,
    /// Maximum number of paths returned.
    pub max_paths: usize,
}

impl Default for PathFinderConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            max_paths: 64,
        }
    }
}

/// Enumerates simple paths between two currencies.
#[derive(Debug, Clone)]
pub struct PathFinder<'g> {
    graph: &'g PoolGraph,
    config: PathFinderConfig,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g PoolGraph, config: PathFinderConfig) -> Self {
        Self { graph, config }
    }

    /// All simple paths from `input` to `output`, shortest first.
    ///
    /// Each depth is searched in full before the next one, so when the
    /// `max_paths` cap is hit the dropped paths are the longest ones. The
    /// output currency is never used as an intermediate.
    pub fn find_paths(&self, input: &Currency, output: &Currency) -> Vec<Path> {
        if input == output || self.config.max_hops == 0 || self.config.max_paths == 0 {
            return Vec::new();
        }
        if !self.graph.contains(input) || !self.graph.contains(output) {
            return Vec::new();
        }

        let mut search = Search {
            output,
            paths: Vec::new(),
            seen_sequences: HashSet::new(),
            max_paths: self.config.max_paths,
        };

        for depth in 1..=self.config.max_hops {
            let mut visited = HashSet::from([input.clone()]);
            let mut stack = Vec::with_capacity(depth);
            self.descend(input, input, depth, &mut visited, &mut stack, &mut search);
            if search.is_full() {
                break;
            }
        }

        debug!(
            input = %input,
            output = %output,
            paths = search.paths.len(),
            "Enumerated candidate paths"
        );
        search.paths
    }

    fn descend(
        &self,
        input: &Currency,
        current: &Currency,
        remaining: usize,
        visited: &mut HashSet<Currency>,
        stack: &mut Vec<Arc<Pool>>,
        search: &mut Search<'_>,
    ) {
        for pool in self.graph.neighbours(current) {
            if search.is_full() {
                return;
            }
            let Some(next) = pool.other(current) else {
                continue;
            };
            if visited.contains(next) || stack.iter().any(|used| used.id == pool.id) {
                continue;
            }

            let reaches_output = next == search.output;
            if remaining == 1 {
                if reaches_output {
                    stack.push(Arc::clone(pool));
                    search.record(stack, input);
                    stack.pop();
                }
                continue;
            }
            if reaches_output {
                continue;
            }

            visited.insert(next.clone());
            stack.push(Arc::clone(pool));
            self.descend(input, next, remaining - 1, visited, stack, search);
            stack.pop();
            visited.remove(next);
        }
    }
}

struct Search<'a> {
    output: &'a Currency,
    paths: Vec<Path>,
    seen_sequences: HashSet<Vec<PoolId>>,
    max_paths: usize,
}

impl Search<'_> {
    fn is_full(&self) -> bool {
        self.paths.len() >= self.max_paths
    }

    fn record(&mut self, pools: &[Arc<Pool>], input: &Currency) {
        let sequence: Vec<PoolId> = pools.iter().map(|pool| pool.id.clone()).collect();
        if !self.seen_sequences.insert(sequence) {
            return;
        }
        match Path::between(pools.to_vec(), input.clone(), self.output) {
            Ok(path) => self.paths.push(path),
            Err(err) => debug!(error = %err, "Skipping malformed path"),
        }
    }
}
