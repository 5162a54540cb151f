//! Error types for the oracle core.

use oracle_account::AccountError;
use oracle_storage::StorageError;
use oracle_types::{FactKey, TransactionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
	/// A query referenced a fact the store does not hold.
	#[error("Fact not found: {0}")]
	NotFound(FactKey),

	/// A claimed fact did not match the store. Signing is refused.
	#[error("Invalid fact: {0}")]
	InvalidFact(String),

	/// The filtered transaction does not commit to its id.
	#[error("Invalid transaction: {0}")]
	InvalidTransaction(#[from] TransactionError),

	#[error("Signing error: {0}")]
	Signing(String),

	#[error("Storage error: {0}")]
	Storage(String),

	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<StorageError> for OracleError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound(key) => OracleError::NotFound(key),
			other => OracleError::Storage(other.to_string()),
		}
	}
}

impl From<AccountError> for OracleError {
	fn from(err: AccountError) -> Self {
		OracleError::Signing(err.to_string())
	}
}
