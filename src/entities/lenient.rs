//! Forgiving deserializers for values written by older versions of the bot,
//! which stored ids as strings or numbers and let bank interest go fractional.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Id {
    Int(u64),
    Text(String),
}

/// Integer from an int, a float (truncated) or a numeric string.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Number::deserialize(deserializer)? {
        Number::Int(v) => Ok(v),
        #[allow(clippy::cast_possible_truncation)]
        Number::Float(v) => Ok(v.trunc() as i64),
        Number::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Optional id from null, a number or a numeric string.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Id>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Id::Int(v)) => Ok(Some(v)),
        Some(Id::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}
