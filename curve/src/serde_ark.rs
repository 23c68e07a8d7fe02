//! Serde adapter storing arkworks values as the hex of their uncompressed
//! canonical encoding. Use with `#[serde(with = "curve::serde_ark")]`.
//!
//! Deserialization skips curve and subgroup validation so that any pair of
//! coordinates round-trips; callers that need valid points check them.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: CanonicalSerialize,
    S: Serializer,
{
    let mut bytes = Vec::with_capacity(value.uncompressed_size());
    value
        .serialize_uncompressed(&mut bytes)
        .map_err(S::Error::custom)?;
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: CanonicalDeserialize,
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    let bytes = hex::decode(encoded.trim()).map_err(D::Error::custom)?;
    T::deserialize_uncompressed_unchecked(bytes.as_slice()).map_err(D::Error::custom)
}
