//! Signing identity of the oracle.
//!
//! The private key stays behind [`AccountInterface`]; callers only see the
//! public key and the signatures it produces.

use async_trait::async_trait;
use oracle_types::{PublicKey, SecureHash, Signature};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

#[async_trait]
pub trait AccountInterface: Send + Sync {
	async fn public_key(&self) -> Result<PublicKey, AccountError>;
	async fn sign_hash(&self, hash: &SecureHash) -> Result<Signature, AccountError>;
}

pub struct AccountService {
	provider: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(provider: Box<dyn AccountInterface>) -> Self {
		Self { provider }
	}

	pub async fn public_key(&self) -> Result<PublicKey, AccountError> {
		self.provider.public_key().await
	}

	pub async fn sign(&self, hash: &SecureHash) -> Result<Signature, AccountError> {
		self.provider.sign_hash(hash).await
	}
}
