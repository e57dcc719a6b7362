pub mod currency;
pub mod path;
pub mod pool;

// Re-export for easier access
pub use currency::{Currency, CurrencyKind};
pub use path::{Path, ProtocolMix};
pub use pool::{Pool, PoolId};
