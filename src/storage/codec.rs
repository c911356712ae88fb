// Snapshot codec
//
// JSON has no map type and no exact big integers. Ordered maps travel as
// arrays of `[key, value]` pairs and amounts as decimal strings (see
// `Amount`'s serde impl). Counters are stored as bare decimal text.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode {key}: {reason}")]
    EncodeError { key: &'static str, reason: String },

    #[error("Failed to decode {key}: {reason}")]
    DecodeError { key: &'static str, reason: String },
}

/// Encode any sequence of key/value pairs as a JSON array of pairs
pub fn encode_entries<'a, K, V, I>(key: &'static str, entries: I) -> Result<String, CodecError>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let pairs: Vec<(&K, &V)> = entries.into_iter().collect();
    serde_json::to_string(&pairs).map_err(|e| CodecError::EncodeError {
        key,
        reason: e.to_string(),
    })
}

/// Decode a JSON array of pairs back into an ordered map
///
/// A repeated key keeps its last value.
pub fn decode_entries<K, V>(key: &'static str, text: &str) -> Result<BTreeMap<K, V>, CodecError>
where
    K: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    let pairs: Vec<(K, V)> = serde_json::from_str(text).map_err(|e| CodecError::DecodeError {
        key,
        reason: e.to_string(),
    })?;
    Ok(pairs.into_iter().collect())
}

/// Encode a counter or amount as bare decimal text
pub fn encode_decimal<T: ToString>(value: &T) -> String {
    value.to_string()
}

/// Decode bare decimal text
pub fn decode_decimal<T>(key: &'static str, text: &str) -> Result<T, CodecError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.trim().parse::<T>().map_err(|e| CodecError::DecodeError {
        key,
        reason: e.to_string(),
    })
}
