//! Serde adapter that writes binary payloads as standard base64 strings.
//!
//! Use with `#[serde(with = "mosaify_core::base64_data")]` on a `Vec<u8>`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(data))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| serde::de::Error::custom(format!("invalid base64 payload: {e}")))
}
