//! Configuration types for the oracle.

use serde::{Deserialize, Serialize};

/// Complete oracle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Oracle identity and logging
	pub oracle: OracleSettings,
	/// HTTP API settings
	#[serde(default)]
	pub api: ApiConfig,
	/// Fact store backend
	pub storage: StorageConfig,
	/// Signing key provider
	pub account: AccountConfig,
}

/// Oracle identity and logging
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleSettings {
	/// Human-readable oracle name, reported by the identity endpoint
	pub name: String,
	/// Default log filter when `RUST_LOG` is unset
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

/// Fact store selection. `config` is handed to the backend factory as-is.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	pub backend: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

/// Key provider selection. `config` is handed to the backend factory as-is.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	#[serde(default = "default_account_backend")]
	pub backend: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_host() -> String {
	"127.0.0.1".to_string()
}

fn default_port() -> u16 {
	8080
}

fn default_account_backend() -> String {
	"local".to_string()
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}
