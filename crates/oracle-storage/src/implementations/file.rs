//! File-seeded fact store.
//!
//! Facts are read once from a TOML or JSON file on first use and served from
//! memory afterwards. The file holds a `facts` array of fact records.

use crate::implementations::memory::MemoryStorage;
use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use oracle_types::{Fact, FactKey};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::info;

#[derive(Debug, Deserialize)]
struct FactFile {
	#[serde(default)]
	facts: Vec<Fact>,
}

/// File-based fact store.
pub struct FileStorage {
	/// Seed file path.
	path: PathBuf,
	/// Facts, loaded on first access.
	facts: OnceCell<MemoryStorage>,
}

impl FileStorage {
	/// Creates a new FileStorage reading from the specified path.
	pub fn new(path: PathBuf) -> Self {
		Self {
			path,
			facts: OnceCell::new(),
		}
	}

	async fn load(&self) -> Result<MemoryStorage, StorageError> {
		let content = match fs::read_to_string(&self.path).await {
			Ok(content) => content,
			Err(e) => {
				return Err(StorageError::Backend(format!(
					"Failed to read {}: {}",
					self.path.display(),
					e
				)))
			}
		};

		let is_json = self
			.path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

		let file: FactFile = if is_json {
			serde_json::from_str(&content).map_err(|e| StorageError::Serialization(e.to_string()))?
		} else {
			toml::from_str(&content).map_err(|e| StorageError::Serialization(e.to_string()))?
		};

		info!(
			path = %self.path.display(),
			count = file.facts.len(),
			"Loaded fact seed file"
		);

		MemoryStorage::new(file.facts)
	}

	async fn facts(&self) -> Result<&MemoryStorage, StorageError> {
		self.facts.get_or_try_init(|| self.load()).await
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn lookup(&self, key: &FactKey) -> Result<Fact, StorageError> {
		self.facts().await?.lookup(key).await
	}

	async fn len(&self) -> Result<usize, StorageError> {
		self.facts().await?.len().await
	}
}

/// Factory function to create a file-backed store from configuration.
///
/// Configuration parameters:
/// - `path`: Seed file with the facts (default: "./config/facts.toml")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or("./config/facts.toml")
		.to_string();

	Ok(Box::new(FileStorage::new(PathBuf::from(path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use oracle_types::FactKind;
	use rust_decimal::Decimal;
	use tempfile::TempDir;

	fn key(kind: FactKind) -> FactKey {
		FactKey::new(
			"GOOG".into(),
			NaiveDate::from_ymd_opt(2017, 7, 3).unwrap(),
			kind,
		)
	}

	#[tokio::test]
	async fn test_load_toml_seed() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("facts.toml");
		std::fs::write(
			&path,
			r#"
[[facts]]
subject = "GOOG"
as_of = "2017-07-03"
kind = "spot"
value = "3.00"

[[facts]]
subject = "GOOG"
as_of = "2017-07-03"
kind = "volatility"
value = "0.4"
"#,
		)
		.unwrap();

		let store = FileStorage::new(path);
		assert_eq!(store.len().await.unwrap(), 2);
		assert_eq!(
			store.lookup(&key(FactKind::Spot)).await.unwrap().value,
			Decimal::new(3, 0)
		);
		assert_eq!(
			store.lookup(&key(FactKind::Volatility)).await.unwrap().value,
			Decimal::new(4, 1)
		);
	}

	#[tokio::test]
	async fn test_load_json_seed() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("facts.json");
		std::fs::write(
			&path,
			r#"{"facts":[{"subject":"GOOG","as_of":"2017-07-03","kind":"spot","value":"3"}]}"#,
		)
		.unwrap();

		let store = FileStorage::new(path);
		assert!(store.lookup(&key(FactKind::Spot)).await.is_ok());
		assert!(matches!(
			store.lookup(&key(FactKind::Volatility)).await,
			Err(StorageError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn test_shipped_seed_file_loads() {
		let path =
			PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/facts.toml");
		let store = FileStorage::new(path);
		assert_eq!(store.len().await.unwrap(), 6);
		assert_eq!(
			store.lookup(&key(FactKind::Spot)).await.unwrap().value,
			Decimal::new(300, 2)
		);
	}

	#[tokio::test]
	async fn test_missing_file_is_backend_error() {
		let dir = TempDir::new().unwrap();
		let store = FileStorage::new(dir.path().join("absent.toml"));
		assert!(matches!(store.len().await, Err(StorageError::Backend(_))));
	}

	#[tokio::test]
	async fn test_malformed_file_is_serialization_error() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("facts.toml");
		std::fs::write(&path, "[[facts]]\nsubject = 1\n").unwrap();

		let store = FileStorage::new(path);
		assert!(matches!(
			store.len().await,
			Err(StorageError::Serialization(_))
		));
	}
}
