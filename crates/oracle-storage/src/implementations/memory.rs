//! In-memory fact store.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use oracle_types::{Fact, FactKey};
use std::collections::HashMap;

/// Fact store backed by a hash map that is fixed at construction.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	facts: HashMap<FactKey, Fact>,
}

impl MemoryStorage {
	/// Seeds the store. Two facts with the same key are rejected.
	pub fn new(facts: impl IntoIterator<Item = Fact>) -> Result<Self, StorageError> {
		let mut map = HashMap::new();
		for fact in facts {
			let key = fact.key();
			if map.contains_key(&key) {
				return Err(StorageError::Duplicate(key));
			}
			map.insert(key, fact);
		}
		Ok(Self { facts: map })
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn lookup(&self, key: &FactKey) -> Result<Fact, StorageError> {
		self.facts
			.get(key)
			.cloned()
			.ok_or_else(|| StorageError::NotFound(key.clone()))
	}

	async fn len(&self) -> Result<usize, StorageError> {
		Ok(self.facts.len())
	}
}

/// Factory function to create an in-memory store from configuration.
///
/// Configuration parameters:
/// - `facts`: array of fact tables (`subject`, `as_of`, `kind`, `value`)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let facts: Vec<Fact> = match config.get("facts") {
		Some(value) => value
			.clone()
			.try_into()
			.map_err(|e: toml::de::Error| StorageError::Serialization(e.to_string()))?,
		None => Vec::new(),
	};

	Ok(Box::new(MemoryStorage::new(facts)?))
}
