//! Core of the market-fact oracle.
//!
//! [`Oracle`] answers spot and volatility queries from its fact store and
//! attests to filtered transactions whose oracle commands embed exactly the
//! facts it holds. [`OracleBuilder`] assembles one from configuration.

use chrono::NaiveDate;
use oracle_account::{AccountError, AccountInterface, AccountService};
use oracle_config::Config;
use oracle_storage::{StorageError, StorageInterface, StorageService};
use oracle_types::{Fact, FilteredTransaction, PublicKey, Subject, TransactionSignature};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub mod engine;
pub mod error;
pub mod extractor;
pub mod query;

#[cfg(test)]
mod fixtures;

pub use engine::AttestationEngine;
pub use error::OracleError;
pub use extractor::extract_commands;
pub use query::QueryService;

/// The oracle service: queries plus attestation behind one signing identity.
pub struct Oracle {
	name: String,
	storage: Arc<StorageService>,
	account: Arc<AccountService>,
	query: Arc<QueryService>,
	engine: AttestationEngine,
}

impl Oracle {
	pub fn new(name: impl Into<String>, storage: StorageService, account: AccountService) -> Self {
		let storage = Arc::new(storage);
		let account = Arc::new(account);
		let query = Arc::new(QueryService::new(storage.clone()));
		let engine = AttestationEngine::new(query.clone(), account.clone());

		Self {
			name: name.into(),
			storage,
			account,
			query,
			engine,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn public_key(&self) -> Result<PublicKey, OracleError> {
		Ok(self.account.public_key().await?)
	}

	pub async fn query_spot(
		&self,
		subject: &Subject,
		date: NaiveDate,
	) -> Result<Fact, OracleError> {
		self.query.query_spot(subject, date).await
	}

	pub async fn query_volatility(
		&self,
		subject: &Subject,
		date: NaiveDate,
	) -> Result<Fact, OracleError> {
		self.query.query_volatility(subject, date).await
	}

	pub async fn sign(
		&self,
		ftx: &FilteredTransaction,
	) -> Result<TransactionSignature, OracleError> {
		self.engine.sign(ftx).await
	}

	/// Number of facts in the store. Loads lazily seeded stores.
	pub async fn fact_count(&self) -> Result<usize, OracleError> {
		Ok(self.storage.fact_count().await?)
	}
}

// Type aliases for factory functions
type StorageFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> + Send>;
type AccountFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> + Send>;

// Factory pattern for creating services from config
pub struct OracleBuilder {
	config: Config,
	storage_factories: HashMap<String, StorageFactory>,
	account_factories: HashMap<String, AccountFactory>,
}

impl OracleBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			storage_factories: HashMap::new(),
			account_factories: HashMap::new(),
		}
	}

	/// Registers the backends shipped with the workspace:
	/// `memory` and `file` storage, `local` account.
	pub fn with_default_factories(self) -> Self {
		self.with_storage_factory(
			"memory",
			oracle_storage::implementations::memory::create_storage,
		)
		.with_storage_factory("file", oracle_storage::implementations::file::create_storage)
		.with_account_factory(
			"local",
			oracle_account::implementations::local::create_account,
		)
	}

	pub fn with_storage_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> + Send + 'static,
	{
		self.storage_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	pub fn with_account_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> + Send + 'static,
	{
		self.account_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	pub fn build(self) -> Result<Oracle, OracleError> {
		let storage_config = &self.config.storage;
		let storage_factory = self
			.storage_factories
			.get(&storage_config.backend)
			.ok_or_else(|| {
				OracleError::Config(format!(
					"Unknown storage backend: {}",
					storage_config.backend
				))
			})?;
		let storage_backend = storage_factory(&storage_config.config)?;

		let account_config = &self.config.account;
		let account_factory = self
			.account_factories
			.get(&account_config.backend)
			.ok_or_else(|| {
				OracleError::Config(format!(
					"Unknown account backend: {}",
					account_config.backend
				))
			})?;
		let account_provider = account_factory(&account_config.config)?;

		info!(
			name = %self.config.oracle.name,
			storage = %storage_config.backend,
			account = %account_config.backend,
			"Oracle assembled"
		);

		Ok(Oracle::new(
			self.config.oracle.name.clone(),
			StorageService::new(storage_backend),
			AccountService::new(account_provider),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use oracle_config::ConfigLoader;

	fn config(storage_backend: &str) -> Config {
		let toml = format!(
			r#"
[oracle]
name = "Test Oracle"

[storage]
backend = "{storage_backend}"

[[storage.config.facts]]
subject = "GOOG"
as_of = "2017-07-03"
kind = "spot"
value = "3"

[account.config]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#
		);
		ConfigLoader::new()
			.with_env_prefix("ORACLE_CORE_TEST_")
			.load_from_str(&toml)
			.unwrap()
	}

	#[tokio::test]
	async fn test_build_from_config() {
		let oracle = OracleBuilder::new(config("memory"))
			.with_default_factories()
			.build()
			.unwrap();

		assert_eq!(oracle.name(), "Test Oracle");
		assert_eq!(oracle.fact_count().await.unwrap(), 1);
		let fact = oracle
			.query_spot(&Subject::new("GOOG"), fixtures::current_date())
			.await
			.unwrap();
		assert_eq!(fact.value, fixtures::dollars(3));
	}

	#[test]
	fn test_unknown_backend_rejected() {
		let result = OracleBuilder::new(config("redis"))
			.with_default_factories()
			.build();
		assert!(matches!(result, Err(OracleError::Config(_))));
	}

	#[test]
	fn test_missing_factories_rejected() {
		let result = OracleBuilder::new(config("memory")).build();
		assert!(matches!(result, Err(OracleError::Config(_))));
	}

	#[tokio::test]
	async fn test_configured_key_is_used() {
		let first = OracleBuilder::new(config("memory"))
			.with_default_factories()
			.build()
			.unwrap();
		let second = OracleBuilder::new(config("memory"))
			.with_default_factories()
			.build()
			.unwrap();
		assert_eq!(
			first.public_key().await.unwrap(),
			second.public_key().await.unwrap()
		);
	}
}
