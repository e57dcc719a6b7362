use crate::entities::currency::Currency;
use crate::entities::pool::{Pool, PoolId};
use crate::enums::Protocol;
use crate::error::PathError;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Hop count per protocol along a path, fed to execution-cost models.
pub type ProtocolMix = BTreeMap<Protocol, usize>;

/// Ordered pools connecting an input currency to an output currency.
///
/// Only constructible through [`Path::new`], which guarantees that every
/// pool connects to the previous hop, no pool appears twice and no currency
/// is visited twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pools: Vec<Arc<Pool>>,
    /// `pools.len() + 1` currencies, input first.
    currencies: Vec<Currency>,
}

impl Path {
    pub fn new(pools: Vec<Arc<Pool>>, input: Currency) -> Result<Self, PathError> {
        if pools.is_empty() {
            return Err(PathError::Empty);
        }

        let mut seen_pools = HashSet::with_capacity(pools.len());
        let mut seen_currencies = HashSet::with_capacity(pools.len() + 1);
        let mut currencies = Vec::with_capacity(pools.len() + 1);
        seen_currencies.insert(input.clone());
        currencies.push(input);

        for pool in &pools {
            if !seen_pools.insert(pool.id.clone()) {
                return Err(PathError::DuplicatePool(pool.id.to_string()));
            }
            let current = currencies
                .last()
                .ok_or(PathError::Empty)?;
            let next = pool
                .other(current)
                .cloned()
                .ok_or_else(|| PathError::Disconnected(pool.id.to_string()))?;
            if !seen_currencies.insert(next.clone()) {
                return Err(PathError::RevisitedCurrency(next.to_string()));
            }
            currencies.push(next);
        }

        Ok(Self { pools, currencies })
    }

    /// Builds a path and checks it ends at `output`.
    pub fn between(
        pools: Vec<Arc<Pool>>,
        input: Currency,
        output: &Currency,
    ) -> Result<Self, PathError> {
        let path = Self::new(pools, input)?;
        if path.output() != output {
            return Err(PathError::WrongOutput);
        }
        Ok(path)
    }

    pub fn pools(&self) -> &[Arc<Pool>] {
        &self.pools
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn input(&self) -> &Currency {
        &self.currencies[0]
    }

    pub fn output(&self) -> &Currency {
        &self.currencies[self.currencies.len() - 1]
    }

    pub fn hop_count(&self) -> usize {
        self.pools.len()
    }

    /// `(pool, currency_in, currency_out)` per hop, in order.
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = (&Pool, &Currency, &Currency)> {
        self.pools
            .iter()
            .zip(self.currencies.windows(2))
            .map(|(pool, pair)| (pool.as_ref(), &pair[0], &pair[1]))
    }

    pub fn pool_ids(&self) -> Vec<&PoolId> {
        self.pools.iter().map(|pool| &pool.id).collect()
    }

    pub fn protocol_mix(&self) -> ProtocolMix {
        let mut mix = ProtocolMix::new();
        for pool in &self.pools {
            *mix.entry(pool.protocol).or_insert(0) += 1;
        }
        mix
    }

    /// `true` when the two paths share no pool.
    pub fn is_pool_disjoint(&self, other: &Path) -> bool {
        let ids: HashSet<&PoolId> = self.pools.iter().map(|pool| &pool.id).collect();
        other.pools.iter().all(|pool| !ids.contains(&pool.id))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.currencies[0].symbol)?;
        for (pool, _, currency_out) in self.hops() {
            write!(f, " -[{} {}]-> {}", pool.protocol, pool.id, currency_out.symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeRate;
    use crate::pools::{ConstantProductState, PoolModel};
    use primitive_types::U256;

    fn currency(symbol: &str) -> Currency {
        Currency::token(1, format!("0x{symbol}"), symbol, 18)
    }

    fn pool(id: &str, protocol: Protocol, a: &str, b: &str) -> Arc<Pool> {
        Arc::new(Pool::new(
            id,
            protocol,
            currency(a),
            currency(b),
            PoolModel::ConstantProduct(ConstantProductState::new(
                U256::from(1_000_000u64),
                U256::from(1_000_000u64),
                FeeRate::from_bps(30),
            )),
        ))
    }

    #[test]
    fn test_valid_multi_hop() {
        let path = Path::between(
            vec![pool("p1", Protocol::V2, "A", "B"), pool("p2", Protocol::V3, "C", "B")],
            currency("A"),
            &currency("C"),
        )
        .unwrap();
        assert_eq!(path.hop_count(), 2);
        assert_eq!(path.currencies(), &[currency("A"), currency("B"), currency("C")]);
        assert_eq!(path.protocol_mix().get(&Protocol::V3), Some(&1));
        assert_eq!(path.to_string(), "A -[v2 p1]-> B -[v3 p2]-> C");
    }

    #[test]
    fn test_rejects_duplicate_pool() {
        let p1 = pool("p1", Protocol::V2, "A", "B");
        assert!(matches!(
            Path::new(vec![p1.clone(), p1], currency("A")),
            Err(PathError::DuplicatePool(_))
        ));
    }

    #[test]
    fn test_rejects_disconnected_and_cycles() {
        assert!(matches!(
            Path::new(
                vec![pool("p1", Protocol::V2, "A", "B"), pool("p2", Protocol::V2, "C", "D")],
                currency("A")
            ),
            Err(PathError::Disconnected(_))
        ));
        assert!(matches!(
            Path::new(
                vec![pool("p1", Protocol::V2, "A", "B"), pool("p2", Protocol::V2, "B", "A")],
                currency("A")
            ),
            Err(PathError::RevisitedCurrency(_))
        ));
        assert_eq!(Path::new(vec![], currency("A")), Err(PathError::Empty));
    }

    #[test]
    fn test_wrong_output() {
        assert_eq!(
            Path::between(vec![pool("p1", Protocol::V2, "A", "B")], currency("A"), &currency("C")),
            Err(PathError::WrongOutput)
        );
    }

    #[test]
    fn test_disjoint() {
        let a = Path::new(vec![pool("p1", Protocol::V2, "A", "B")], currency("A")).unwrap();
        let b = Path::new(vec![pool("p2", Protocol::V3, "A", "B")], currency("A")).unwrap();
        assert!(a.is_pool_disjoint(&b));
        assert!(!a.is_pool_disjoint(&a));
    }
}
