//! Key and signature types for the oracle identity.
//!
//! Keys are secp256k1. Public keys travel as SEC1-compressed bytes and
//! signatures in the recoverable `(r, s, v)` layout.

use crate::serde_helpers::{deserialize_hex, serialize_hex};
use crate::transaction::SecureHash;
use alloy_primitives::{PrimitiveSignature, B256, U256};
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SEC1-compressed secp256k1 public key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(
	#[serde(serialize_with = "serialize_hex", deserialize_with = "deserialize_hex")] pub Vec<u8>,
);

impl PublicKey {
	pub fn from_verifying_key(key: &VerifyingKey) -> Self {
		Self(key.to_encoded_point(true).as_bytes().to_vec())
	}

	/// Parses the key bytes back into a curve point.
	pub fn to_verifying_key(&self) -> Option<VerifyingKey> {
		VerifyingKey::from_sec1_bytes(&self.0).ok()
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PublicKey({})", self)
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Cryptographic signature representation.
///
/// Stores signatures as raw bytes in the standard Ethereum format (r, s, v).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(
	#[serde(serialize_with = "serialize_hex", deserialize_with = "deserialize_hex")] pub Vec<u8>,
);

impl Signature {
	/// Rebuilds the recoverable signature, or `None` if the bytes are malformed.
	pub fn to_primitive(&self) -> Option<PrimitiveSignature> {
		if self.0.len() != 65 {
			return None;
		}
		let r = U256::from_be_slice(&self.0[..32]);
		let s = U256::from_be_slice(&self.0[32..64]);
		let y_parity = match self.0[64] {
			27 | 0 => false,
			28 | 1 => true,
			_ => return None,
		};
		Some(PrimitiveSignature::new(r, s, y_parity))
	}
}

impl From<PrimitiveSignature> for Signature {
	fn from(sig: PrimitiveSignature) -> Self {
		let mut bytes = Vec::with_capacity(65);
		bytes.extend_from_slice(&sig.r().to_be_bytes::<32>());
		bytes.extend_from_slice(&sig.s().to_be_bytes::<32>());
		let v = if sig.v() { 28 } else { 27 };
		bytes.push(v);
		Signature(bytes)
	}
}

/// A signature over a transaction id together with the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
	pub by: PublicKey,
	pub signature: Signature,
}

impl TransactionSignature {
	pub fn new(by: PublicKey, signature: Signature) -> Self {
		Self { by, signature }
	}

	/// Returns true if the signature was made over `id` by the key in `by`.
	pub fn verify(&self, id: &SecureHash) -> bool {
		let Some(signature) = self.signature.to_primitive() else {
			return false;
		};
		let Some(expected) = self.by.to_verifying_key() else {
			return false;
		};

		match signature.recover_from_prehash(&B256::from(id.0)) {
			Ok(recovered) => recovered == expected,
			Err(_) => false,
		}
	}
}
