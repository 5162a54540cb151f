//! Account provider implementations for the oracle service.
//!
//! This module provides a local private key wallet using the Alloy signer.

use crate::{AccountError, AccountInterface};
use alloy_primitives::B256;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use oracle_types::{PublicKey, SecureHash, Signature};

/// Local wallet implementation using Alloy's signer.
///
/// The key is held in process memory. Suitable for development and for
/// deployments where the key is injected through configuration.
pub struct LocalWallet {
	/// The underlying Alloy signer that handles cryptographic operations.
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a new LocalWallet from a hex-encoded private key.
	///
	/// The private key should be provided as a hex string (with or without 0x prefix).
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let key_without_prefix = private_key_hex
			.strip_prefix("0x")
			.unwrap_or(private_key_hex);

		if key_without_prefix.len() != 64 {
			return Err(AccountError::InvalidKey(
				"Private key must be 64 hex characters (32 bytes)".to_string(),
			));
		}

		if hex::decode(key_without_prefix).is_err() {
			return Err(AccountError::InvalidKey(
				"Private key must be valid hexadecimal".to_string(),
			));
		}

		let signer = key_without_prefix
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	/// Creates a wallet with a freshly generated key.
	pub fn random() -> Self {
		Self {
			signer: PrivateKeySigner::random(),
		}
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn public_key(&self) -> Result<PublicKey, AccountError> {
		Ok(PublicKey::from_verifying_key(
			self.signer.credential().verifying_key(),
		))
	}

	async fn sign_hash(&self, hash: &SecureHash) -> Result<Signature, AccountError> {
		let signature = self
			.signer
			.sign_hash(&B256::from(hash.0))
			.await
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign hash: {}", e)))?;

		Ok(signature.into())
	}
}

/// Factory function to create an account provider from configuration.
///
/// Configuration parameters:
/// - `private_key`: hex-encoded 32-byte secp256k1 key
pub fn create_account(config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.ok_or_else(|| AccountError::InvalidKey("private_key is required".to_string()))?;

	Ok(Box::new(LocalWallet::new(private_key)?))
}
