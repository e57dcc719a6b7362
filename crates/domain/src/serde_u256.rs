//! Decimal-string serialization for `U256` amounts.
//!
//! Pool snapshots carry on-chain integers that overflow JSON numbers, so
//! amounts are written as decimal strings. Deserialization also accepts
//! `0x`-prefixed hex strings and plain unsigned JSON numbers.

use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(U256Visitor)
}

/// Parses a decimal or `0x`-prefixed hexadecimal string.
pub fn parse(value: &str) -> Option<U256> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix("0x") {
        return U256::from_str_radix(hex, 16).ok();
    }
    U256::from_dec_str(trimmed).ok()
}

struct U256Visitor;

impl Visitor<'_> for U256Visitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer or a decimal/hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom("amount must not be negative"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
        parse(v).ok_or_else(|| E::custom(format!("invalid amount: {v}")))
    }
}
