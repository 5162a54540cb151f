use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oracle_config::{Config, ConfigLoader};
use oracle_core::{Oracle, OracleBuilder};
use oracle_service::api;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{
	layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "oracle-service")]
#[command(about = "Market fact oracle service", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", default_value = "config/oracle.toml")]
	config: PathBuf,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(long, env = "ORACLE_LOG_LEVEL")]
	log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the oracle service
	Start,
	/// Validate the configuration file and fact seed
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Initialize tracing
	let log_filter = setup_tracing(cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;

	info!("Loading configuration from: {:?}", cli.config);
	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

	log_filter.apply_configured(cli.log_level.as_deref(), &config.oracle.log_level)?;

	// Handle commands
	match cli.command {
		Some(Commands::Start) | None => start_service(config).await,
		Some(Commands::Validate) => validate_config(config).await,
	}
}

async fn build_oracle(config: &Config) -> Result<Oracle> {
	let oracle = OracleBuilder::new(config.clone())
		.with_default_factories()
		.build()
		.context("Failed to build oracle")?;

	// Seeds are loaded before the service accepts requests.
	let facts = oracle
		.fact_count()
		.await
		.context("Failed to load fact store")?;
	info!("Fact store holds {} facts", facts);

	Ok(oracle)
}

async fn start_service(config: Config) -> Result<()> {
	info!("Starting oracle service: {}", config.oracle.name);

	let oracle = Arc::new(build_oracle(&config).await?);
	let public_key = oracle
		.public_key()
		.await
		.context("Failed to read oracle key")?;
	info!("Oracle public key: {}", public_key);

	api::serve(
		oracle,
		&config.api.host,
		config.api.port,
		setup_shutdown_signal(),
	)
	.await
	.context("API server failed")?;

	info!("Oracle service stopped");
	Ok(())
}

async fn validate_config(config: Config) -> Result<()> {
	info!("Configuration is valid");
	info!("Oracle name: {}", config.oracle.name);
	info!("Storage backend: {}", config.storage.backend);
	info!("Account backend: {}", config.account.backend);

	let oracle = build_oracle(&config).await?;
	info!(
		"Oracle public key: {}",
		oracle.public_key().await.context("Failed to read oracle key")?
	);

	Ok(())
}

/// Log filter installed before the configuration is read.
struct LogFilter {
	handle: reload::Handle<EnvFilter, Registry>,
	/// Whether the filter came from RUST_LOG.
	from_env: bool,
}

impl LogFilter {
	fn new(log_level: &str) -> (reload::Layer<EnvFilter, Registry>, Self) {
		let (env_filter, from_env) = match EnvFilter::try_from_default_env() {
			Ok(filter) => (filter, true),
			Err(_) => (EnvFilter::new(log_level), false),
		};
		let (layer, handle) = reload::Layer::new(env_filter);
		(layer, Self { handle, from_env })
	}

	/// Switches to the configured level unless RUST_LOG or the CLI chose one.
	fn apply_configured(&self, cli_level: Option<&str>, configured: &str) -> Result<()> {
		if cli_level.is_some() || self.from_env {
			return Ok(());
		}
		self.handle
			.reload(EnvFilter::new(configured))
			.context("Failed to apply configured log level")
	}
}

fn setup_tracing(log_level: &str) -> Result<LogFilter> {
	let (filter_layer, log_filter) = LogFilter::new(log_level);

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(tracing_subscriber::fmt::layer())
		.try_init()
		.context("Failed to initialize tracing")?;

	Ok(log_filter)
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition() {
		Cli::command().debug_assert();
		assert_eq!(Cli::command().get_name(), "oracle-service");

		let cli = Cli::try_parse_from(["oracle-service", "validate"]).unwrap();
		assert!(matches!(cli.command, Some(Commands::Validate)));
		assert_eq!(cli.config, PathBuf::from("config/oracle.toml"));
	}

	fn current_filter(log_filter: &LogFilter) -> String {
		log_filter.handle.with_current(|f| f.to_string()).unwrap()
	}

	#[test]
	fn test_configured_level_replaces_default() {
		let (_layer, mut log_filter) = LogFilter::new(DEFAULT_LOG_LEVEL);
		log_filter.from_env = false;

		log_filter.apply_configured(None, "debug").unwrap();
		assert_eq!(current_filter(&log_filter), "debug");
	}

	#[test]
	fn test_cli_level_wins_over_config() {
		let (_layer, mut log_filter) = LogFilter::new("warn");
		log_filter.from_env = false;
		log_filter.handle.reload(EnvFilter::new("warn")).unwrap();

		log_filter.apply_configured(Some("warn"), "debug").unwrap();
		assert_eq!(current_filter(&log_filter), "warn");
	}
}
