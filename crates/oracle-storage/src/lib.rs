//! Fact store for the market-fact oracle.
//!
//! This module provides the read-only store of facts the oracle attests to.
//! Backends implement [`StorageInterface`]; the in-memory backend is the
//! default and the file backend seeds one from a TOML or JSON file.

use async_trait::async_trait;
use oracle_types::{Fact, FactKey};
use thiserror::Error;
use tracing::debug;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// No fact is recorded for the requested key.
	#[error("Not found: {0}")]
	NotFound(FactKey),
	/// The same key was seeded twice.
	#[error("Duplicate fact: {0}")]
	Duplicate(FactKey),
	/// Error that occurs during deserialization of seed data.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the interface for fact store backends.
///
/// Lookups are exact-match on subject, date and kind. The interface is async
/// so that backends reading from disk or a remote source fit behind it.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves the fact recorded for `key`.
	async fn lookup(&self, key: &FactKey) -> Result<Fact, StorageError>;

	/// Number of facts held by the backend.
	async fn len(&self) -> Result<usize, StorageError>;
}

/// High-level fact store wrapping a storage backend.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Looks up a single fact.
	pub async fn lookup(&self, key: &FactKey) -> Result<Fact, StorageError> {
		let result = self.backend.lookup(key).await;
		if let Err(StorageError::NotFound(_)) = &result {
			debug!(%key, "fact not found");
		}
		result
	}

	/// Number of facts available, forcing any lazy backend to load.
	pub async fn fact_count(&self) -> Result<usize, StorageError> {
		self.backend.len().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;
	use chrono::NaiveDate;
	use oracle_types::FactKind;
	use rust_decimal::Decimal;

	#[tokio::test]
	async fn test_service_delegates_to_backend() {
		let date = NaiveDate::from_ymd_opt(2017, 7, 3).unwrap();
		let backend =
			MemoryStorage::new(vec![Fact::spot("GOOG", date, Decimal::new(3, 0))]).unwrap();
		let service = StorageService::new(Box::new(backend));

		assert_eq!(service.fact_count().await.unwrap(), 1);

		let key = FactKey::new("GOOG".into(), date, FactKind::Spot);
		assert_eq!(service.lookup(&key).await.unwrap().value, Decimal::new(3, 0));

		let missing = FactKey::new("GOOG".into(), date, FactKind::Volatility);
		assert!(matches!(
			service.lookup(&missing).await,
			Err(StorageError::NotFound(k)) if k == missing
		));
	}
}
