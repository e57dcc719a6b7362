use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Native coin or contract token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurrencyKind {
    Native,
    Token { address: String },
}

/// A chain-scoped currency.
///
/// Identity is `(chain_id, kind)`. The symbol and decimals are descriptive
/// and take no part in equality, ordering or hashing, so two tokens that
/// share a symbol are still distinct currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub chain_id: u64,
    pub kind: CurrencyKind,
    pub symbol: String,
    pub decimals: u8,
}

impl Currency {
    /// Creates a token currency. The address is normalized to lowercase.
    pub fn token(
        chain_id: u64,
        address: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            chain_id,
            kind: CurrencyKind::Token {
                address: address.into().to_lowercase(),
            },
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn native(chain_id: u64, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            chain_id,
            kind: CurrencyKind::Native,
            symbol: symbol.into(),
            decimals,
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self.kind, CurrencyKind::Native)
    }

    /// Token address, or `None` for the native coin.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match &self.kind {
            CurrencyKind::Native => None,
            CurrencyKind::Token { address } => Some(address),
        }
    }

    /// Same identity, ignoring descriptive fields.
    #[must_use]
    pub fn same_as(&self, other: &Currency) -> bool {
        self == other
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.kind == other.kind
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.kind.hash(state);
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Currency {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.chain_id, &self.kind).cmp(&(other.chain_id, &other.kind))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CurrencyKind::Native => write!(f, "{}:{}(native)", self.chain_id, self.symbol),
            CurrencyKind::Token { address } => {
                write!(f, "{}:{}({})", self.chain_id, self.symbol, address)
            }
        }
    }
}
