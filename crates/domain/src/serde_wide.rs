//! String serialization for 128-bit liquidity values.
//!
//! Snapshot entries pass through `serde_json::Value`, whose numbers stop at
//! 64 bits, so `u128` liquidity and `i128` liquidity deltas are written as
//! decimal strings. Plain JSON integers are still accepted on input.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum Wide {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl Wide {
    fn into_i128<E: de::Error>(self) -> Result<i128, E> {
        match self {
            Wide::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid integer: {text}"))),
            Wide::Signed(v) => Ok(i128::from(v)),
            Wide::Unsigned(v) => Ok(i128::from(v)),
        }
    }

    fn into_u128<E: de::Error>(self) -> Result<u128, E> {
        match self {
            Wide::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid unsigned integer: {text}"))),
            Wide::Signed(v) => u128::try_from(v).map_err(|_| E::custom("value must not be negative")),
            Wide::Unsigned(v) => Ok(u128::from(v)),
        }
    }
}

/// `u128` as a decimal string.
pub mod u128_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        Wide::deserialize(deserializer)?.into_u128()
    }
}

/// Tick map whose `i128` values are decimal strings.
pub mod liquidity_net {
    use super::*;

    pub fn serialize<S: Serializer>(
        ticks: &BTreeMap<i32, i128>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(ticks.iter().map(|(tick, net)| (tick, net.to_string())))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<i32, i128>, D::Error> {
        BTreeMap::<i32, Wide>::deserialize(deserializer)?
            .into_iter()
            .map(|(tick, net)| net.into_i128().map(|net| (tick, net)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ticks {
        #[serde(with = "crate::serde_wide::u128_string")]
        liquidity: u128,
        #[serde(with = "crate::serde_wide::liquidity_net")]
        ticks: BTreeMap<i32, i128>,
    }

    #[test]
    fn test_survives_json_value() {
        let original = Ticks {
            liquidity: 10u128.pow(30),
            ticks: BTreeMap::from([(-600, 10i128.pow(30)), (600, -(10i128.pow(30)))]),
        };
        let value = serde_json::to_value(&original).unwrap();
        assert_eq!(value["liquidity"], "1000000000000000000000000000000");
        assert_eq!(serde_json::from_value::<Ticks>(value).unwrap(), original);
    }

    #[test]
    fn test_accepts_plain_numbers() {
        let parsed: Ticks =
            serde_json::from_str(r#"{"liquidity": 5, "ticks": {"-60": 5, "60": -5}}"#).unwrap();
        assert_eq!(parsed.liquidity, 5);
        assert_eq!(parsed.ticks[&-60], 5);
        assert_eq!(parsed.ticks[&60], -5);
        assert!(serde_json::from_str::<Ticks>(r#"{"liquidity": -1, "ticks": {}}"#).is_err());
    }
}
