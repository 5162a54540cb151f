//! Error types for transaction construction and verification.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
	#[error("Serialization error: {0}")]
	Serialization(String),

	#[error("Component index {index} out of range for {len} components")]
	ComponentOutOfRange { index: usize, len: usize },

	#[error("Components must be listed in strictly increasing index order")]
	UnorderedComponents,

	#[error("Component {0} does not match its committed leaf hash")]
	ComponentMismatch(usize),

	#[error("Merkle root does not match transaction id")]
	RootMismatch,
}
