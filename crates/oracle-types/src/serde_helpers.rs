//! Serde helpers for byte fields that travel as hex strings.

use serde::{Deserialize, Deserializer, Serializer};

/// Decodes a hex string, accepting an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
	hex::decode(value.strip_prefix("0x").unwrap_or(value))
}

/// Custom serializer for `Vec<u8>` that writes a `0x`-prefixed hex string
pub fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

/// Custom deserializer for `Vec<u8>` that reads a hex string
pub fn deserialize_hex<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;
	decode_hex(&value)
		.map_err(|e| serde::de::Error::custom(format!("Invalid hex string {}: {}", value, e)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::{Deserialize, Serialize};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Wrapper {
		#[serde(serialize_with = "serialize_hex", deserialize_with = "deserialize_hex")]
		bytes: Vec<u8>,
	}

	#[test]
	fn test_hex_prefix_is_optional() {
		let with_prefix: Wrapper = serde_json::from_str(r#"{"bytes":"0xdead"}"#).unwrap();
		let without_prefix: Wrapper = serde_json::from_str(r#"{"bytes":"dead"}"#).unwrap();
		assert_eq!(with_prefix, without_prefix);
		assert_eq!(
			serde_json::to_string(&with_prefix).unwrap(),
			r#"{"bytes":"0xdead"}"#
		);
	}

	#[test]
	fn test_invalid_hex_rejected() {
		let result = serde_json::from_str::<Wrapper>(r#"{"bytes":"0xzz"}"#);
		assert!(result.is_err());
	}
}
